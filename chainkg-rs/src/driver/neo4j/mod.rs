//! Neo4j graph driver implementation.
//!
//! Uses `neo4rs` 0.8 for async, pooled Bolt connections. Statements are
//! rendered to parameterized Cypher and every parameter is bound as a typed
//! [`BoltType`].

use std::collections::HashMap;

use neo4rs::{BoltType, Graph, Query};
use tracing::{debug, info};

use crate::driver::GraphDriver;
use crate::errors::{ChainGraphError, Result};
use crate::mutation::{CypherParam, CypherQuery, Statement, COUNT_COLUMN};
use crate::property::{PropertyMap, PropertyValue};

/// Neo4j backend. One long-lived handle is shared by a whole run.
pub struct Neo4jDriver {
    graph: Graph,
    uri: String,
}

impl Neo4jDriver {
    /// Connect with basic credentials.
    pub async fn connect(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let uri = uri.into();
        let graph = Graph::new(uri.as_str(), user, password).await?;
        info!(uri = %uri, "connected to neo4j");
        Ok(Self { graph, uri })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl GraphDriver for Neo4jDriver {
    async fn ping(&self) -> Result<()> {
        self.graph.run(neo4rs::query("RETURN 1")).await?;
        Ok(())
    }

    async fn execute(&self, statement: &Statement) -> Result<i64> {
        let cypher = statement.to_cypher();
        debug!(cypher = %cypher.text, "executing statement");

        let mut rows = self.graph.execute(to_query(&cypher)).await?;
        let row = rows.next().await?.ok_or_else(|| {
            ChainGraphError::Driver(format!("no rows returned for: {}", cypher.text))
        })?;
        row.get::<i64>(COUNT_COLUMN)
            .map_err(|e| ChainGraphError::Driver(format!("reading `{COUNT_COLUMN}`: {e}")))
    }

    async fn close(&self) -> Result<()> {
        // neo4rs releases pooled connections when the Graph is dropped.
        info!(uri = %self.uri, "neo4j driver closed");
        Ok(())
    }
}

/// Bind a rendered statement into a `neo4rs` query.
fn to_query(cypher: &CypherQuery) -> Query {
    cypher
        .params
        .iter()
        .fold(neo4rs::query(&cypher.text), |query, (key, param)| {
            query.param(key, to_bolt_param(param))
        })
}

fn to_bolt_param(param: &CypherParam) -> BoltType {
    match param {
        CypherParam::Value(value) => to_bolt(value),
        CypherParam::Map(map) => to_bolt_map(map),
    }
}

fn to_bolt_map(map: &PropertyMap) -> BoltType {
    let entries: HashMap<String, BoltType> = map
        .iter()
        .map(|(key, value)| (key.clone(), to_bolt(value)))
        .collect();
    BoltType::from(entries)
}

fn to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::Boolean(b) => BoltType::from(*b),
        PropertyValue::Integer(i) => BoltType::from(*i),
        PropertyValue::Float(f) => BoltType::from(*f),
        PropertyValue::Text(s) => BoltType::from(s.as_str()),
    }
}
