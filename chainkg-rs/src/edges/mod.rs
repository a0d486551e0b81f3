//! Relationship records for the industry-chain graph.
//!
//! Four relation kinds share one record shape; the field names each kind's
//! source uses are declared by [`crate::schema::RelationTemplate`].

pub mod relationship;

pub use relationship::RelationshipRecord;
