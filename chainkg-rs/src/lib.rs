//! # chainkg-rs
//!
//! Builds an industry-chain knowledge graph (companies, industries, products
//! and the relationships between them) in Neo4j from newline-delimited JSON
//! record sources.
//!
//! ## Architecture
//!
//! - **Record store**: strict, fail-fast loading of typed records
//! - **Schema catalog**: node labels and per-kind relationship templates
//! - **Mutation builder**: records → parameterized Cypher statements
//! - **Write engine**: per-statement failure isolation and batch counters
//! - **Pipeline**: node phase, then relationship phase, with a structured report

pub mod edges;
pub mod errors;
pub mod nodes;
pub mod property;
pub mod schema;
pub mod types;

pub mod driver;
pub mod engine;
pub mod mutation;
pub mod records;

pub mod pipeline;

pub use driver::{GraphDriver, InMemoryDriver, Neo4jDriver};
pub use errors::{ChainGraphError, Result};
pub use pipeline::{Ingestor, RecordOutcome, RunReport};
pub use records::RecordStore;
pub use schema::SchemaCatalog;
pub use types::{DuplicatePolicy, IngestionConfig, LoaderConfig};
