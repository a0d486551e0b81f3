//! Graph database driver abstraction.
//!
//! Defines the [`GraphDriver`] trait that every store backend satisfies,
//! plus two implementations:
//! - [`neo4j::Neo4jDriver`]: Neo4j over Bolt via `neo4rs`
//! - [`memory::InMemoryDriver`]: an in-process property graph for tests

pub mod memory;
pub mod neo4j;

pub use memory::InMemoryDriver;
pub use neo4j::Neo4jDriver;

use crate::errors::Result;
use crate::mutation::Statement;

/// Trait representing a graph database backend.
///
/// The ingestion pipeline receives a driver as an injected collaborator and
/// submits one statement at a time.
#[allow(async_fn_in_trait)]
pub trait GraphDriver: Send + Sync {
    /// Health check, verifies connectivity to the database.
    async fn ping(&self) -> Result<()>;

    /// Execute one statement and return the value of its `count` column.
    async fn execute(&self, statement: &Statement) -> Result<i64>;

    /// Release the connection.
    async fn close(&self) -> Result<()>;
}

impl<T: GraphDriver + ?Sized> GraphDriver for &T {
    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }

    async fn execute(&self, statement: &Statement) -> Result<i64> {
        (**self).execute(statement).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
