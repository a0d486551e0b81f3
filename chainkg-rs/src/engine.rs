//! Graph write engine.
//!
//! Submits statements to a [`GraphDriver`] one at a time. Every driver error
//! is caught here, logged, and reduced to `succeeded = false`; nothing a
//! single statement does can end a run. Mutations are counted per batch.

use tracing::{info, warn};

use crate::driver::GraphDriver;
use crate::mutation::Statement;

/// Result of submitting one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementOutcome {
    pub succeeded: bool,
    /// Value of the statement's `count` column (0 when it failed).
    pub count: i64,
    /// Driver error message when it failed.
    pub error: Option<String>,
}

impl StatementOutcome {
    fn ok(count: i64) -> Self {
        Self {
            succeeded: true,
            count,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            succeeded: false,
            count: 0,
            error: Some(error),
        }
    }
}

/// Attempt/success counters for one batch of mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub name: String,
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
}

/// Executes statements against a borrowed driver.
pub struct GraphWriteEngine<'a, D: GraphDriver> {
    driver: &'a D,
    tally: BatchTally,
}

impl<'a, D: GraphDriver> GraphWriteEngine<'a, D> {
    pub fn new(driver: &'a D) -> Self {
        Self {
            driver,
            tally: BatchTally::default(),
        }
    }

    /// Reset the counters for a batch of `total` records.
    pub fn begin_batch(&mut self, name: impl Into<String>, total: usize) {
        self.tally = BatchTally {
            name: name.into(),
            total,
            ..BatchTally::default()
        };
    }

    /// Counters of the current batch.
    pub fn tally(&self) -> &BatchTally {
        &self.tally
    }

    /// Close the current batch and return its counters.
    pub fn finish_batch(&mut self) -> BatchTally {
        let tally = std::mem::take(&mut self.tally);
        info!(
            batch = %tally.name,
            attempted = tally.attempted,
            succeeded = tally.succeeded,
            total = tally.total,
            "batch finished"
        );
        tally
    }

    /// Submit one mutation, counting it against the current batch.
    pub async fn execute(&mut self, statement: &Statement) -> StatementOutcome {
        self.tally.attempted += 1;
        let outcome = self.submit(statement).await;
        if outcome.succeeded {
            self.tally.succeeded += 1;
        }
        info!(
            batch = %self.tally.name,
            attempted = self.tally.attempted,
            total = self.tally.total,
            "progress"
        );
        outcome
    }

    /// Submit a lookup. Lookups are not counted as batch attempts.
    pub async fn lookup(&mut self, statement: &Statement) -> StatementOutcome {
        self.submit(statement).await
    }

    async fn submit(&self, statement: &Statement) -> StatementOutcome {
        match self.driver.execute(statement).await {
            Ok(count) => StatementOutcome::ok(count),
            Err(e) => {
                warn!(
                    batch = %self.tally.name,
                    statement = %statement.describe(),
                    error = %e,
                    "statement failed"
                );
                StatementOutcome::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::InMemoryDriver;
    use crate::mutation::NodeRef;
    use crate::property::{PropertyMap, PropertyValue};
    use crate::schema::NodeLabel;

    fn create(name: &str) -> Statement {
        let mut properties = PropertyMap::new();
        properties.insert("name".into(), PropertyValue::Text(name.into()));
        Statement::CreateNode {
            label: NodeLabel::Product,
            properties,
        }
    }

    #[tokio::test]
    async fn test_failures_are_absorbed_and_counted() {
        let driver = InMemoryDriver::new();
        driver.reject_name("bad");
        let mut engine = GraphWriteEngine::new(&driver);
        engine.begin_batch("product", 3);

        assert!(engine.execute(&create("a")).await.succeeded);
        let failed = engine.execute(&create("bad")).await;
        assert!(!failed.succeeded);
        assert!(failed.error.unwrap().contains("rejected"));
        assert!(engine.execute(&create("c")).await.succeeded);

        let tally = engine.finish_batch();
        assert_eq!(tally.name, "product");
        assert_eq!(tally.total, 3);
        assert_eq!(tally.attempted, 3);
        assert_eq!(tally.succeeded, 2);
    }

    #[tokio::test]
    async fn test_lookups_are_not_counted() {
        let driver = InMemoryDriver::new();
        let mut engine = GraphWriteEngine::new(&driver);
        engine.begin_batch("product", 1);

        engine.execute(&create("a")).await;
        let found = engine
            .lookup(&Statement::CountNodes {
                node: NodeRef::new(NodeLabel::Product, "a"),
            })
            .await;
        assert_eq!(found.count, 1);
        assert_eq!(engine.tally().attempted, 1);
    }

    #[tokio::test]
    async fn test_begin_batch_resets_counters() {
        let driver = InMemoryDriver::new();
        let mut engine = GraphWriteEngine::new(&driver);
        engine.begin_batch("first", 1);
        engine.execute(&create("a")).await;
        engine.begin_batch("second", 5);
        assert_eq!(engine.tally().attempted, 0);
        assert_eq!(engine.tally().total, 5);
    }
}
