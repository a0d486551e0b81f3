//! Ingestion pipeline.
//!
//! Runs two fixed phases against an injected [`GraphDriver`]:
//! 1. **Nodes** (company, product, industry): load, build, execute per record
//! 2. **Relationships**: company–industry, industry–industry,
//!    company–product (weighted), product–product
//!
//! Relationships can only bind to nodes written in the node phase. With
//! `verify_endpoints` on, both endpoints are looked up before each create and
//! a record whose endpoint matches zero nodes (or several) is reported as
//! [`RecordOutcome::Unresolved`] instead of being created.
//!
//! A source that fails to load aborts the run. Statements already executed
//! stay in the store.

pub mod report;

pub use report::{BatchReport, Phase, RecordOutcome, RecordResult, RunReport};

use tracing::{info, warn};

use crate::driver::GraphDriver;
use crate::edges::RelationshipRecord;
use crate::engine::GraphWriteEngine;
use crate::errors::Result;
use crate::mutation::{GraphMutationBuilder, NodeRef};
use crate::nodes::EntityRecord;
use crate::records::RecordStore;
use crate::schema::{NodeLabel, RelationTemplate, SchemaCatalog};
use crate::types::{DuplicatePolicy, IngestionConfig};

/// Drives a full ingestion run.
pub struct Ingestor<D: GraphDriver> {
    driver: D,
    catalog: SchemaCatalog,
    builder: GraphMutationBuilder,
    config: IngestionConfig,
}

impl<D: GraphDriver> Ingestor<D> {
    pub fn new(driver: D, catalog: SchemaCatalog, config: IngestionConfig) -> Self {
        let builder = GraphMutationBuilder::new(config.weight_property.clone());
        Self {
            driver,
            catalog,
            builder,
            config,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the node phase, then the relationship phase.
    pub async fn run(&self, store: &RecordStore) -> Result<RunReport> {
        let mut report = RunReport::start();
        info!(
            run_id = %report.run_id,
            data_dir = %store.data_dir().display(),
            "ingestion started"
        );

        for label in self.catalog.node_phase() {
            let records = store.load_entities(&self.catalog, label).await?;
            report.batches.push(self.ingest_entities(label, &records).await);
        }

        for template in self.catalog.relationship_phase() {
            let records = store.load_relationships(template).await?;
            report
                .batches
                .push(self.ingest_relationships(template, &records).await);
        }

        report.finish();
        info!(
            run_id = %report.run_id,
            created = report.created(),
            skipped = report.skipped(),
            unresolved = report.unresolved(),
            failed = report.failed(),
            "ingestion finished"
        );
        Ok(report)
    }

    /// Create one node per record of `label`.
    pub async fn ingest_entities(&self, label: NodeLabel, records: &[EntityRecord]) -> BatchReport {
        let mut engine = GraphWriteEngine::new(&self.driver);
        engine.begin_batch(label.as_str(), records.len());

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let outcome = self.ingest_entity(&mut engine, record).await;
            results.push(RecordResult {
                record: format!("{} '{}'", label, record.name()),
                outcome,
            });
        }

        let tally = engine.finish_batch();
        BatchReport {
            name: tally.name,
            phase: Phase::Nodes,
            total: tally.total,
            attempted: tally.attempted,
            succeeded: tally.succeeded,
            results,
        }
    }

    async fn ingest_entity(
        &self,
        engine: &mut GraphWriteEngine<'_, D>,
        record: &EntityRecord,
    ) -> RecordOutcome {
        let statement = match self.builder.build_node_creation(record) {
            Ok(statement) => statement,
            Err(e) => return failed(e.to_string()),
        };

        if self.config.duplicate_policy == DuplicatePolicy::SkipExisting {
            let lookup = engine
                .lookup(&self.builder.build_node_lookup(record.label(), record.name()))
                .await;
            if let Some(reason) = lookup.error {
                return failed(reason);
            }
            if lookup.count > 0 {
                return RecordOutcome::SkippedDuplicate;
            }
        }

        let outcome = engine.execute(&statement).await;
        match outcome.error {
            Some(reason) => failed(reason),
            None => RecordOutcome::Created,
        }
    }

    /// Create one relationship per record of `template`'s kind.
    pub async fn ingest_relationships(
        &self,
        template: &RelationTemplate,
        records: &[RelationshipRecord],
    ) -> BatchReport {
        let mut engine = GraphWriteEngine::new(&self.driver);
        engine.begin_batch(template.kind.as_str(), records.len());

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let outcome = self.ingest_relationship(&mut engine, template, record).await;
            if let RecordOutcome::Unresolved { .. } = &outcome {
                warn!(
                    kind = %template.kind,
                    from = %record.from_name,
                    to = %record.to_name,
                    "unresolved relationship endpoint"
                );
            }
            results.push(RecordResult {
                record: format!("'{}'-[{}]->'{}'", record.from_name, record.rel, record.to_name),
                outcome,
            });
        }

        let tally = engine.finish_batch();
        BatchReport {
            name: tally.name,
            phase: Phase::Relationships,
            total: tally.total,
            attempted: tally.attempted,
            succeeded: tally.succeeded,
            results,
        }
    }

    async fn ingest_relationship(
        &self,
        engine: &mut GraphWriteEngine<'_, D>,
        template: &RelationTemplate,
        record: &RelationshipRecord,
    ) -> RecordOutcome {
        let statement = match self.builder.build_edge_creation(template, record) {
            Ok(statement) => statement,
            Err(e) => return failed(e.to_string()),
        };

        if self.config.verify_endpoints {
            let from = NodeRef::new(template.from_label, record.from_name.as_str());
            let to = NodeRef::new(template.to_label, record.to_name.as_str());
            let from_matches = match self.count_nodes(engine, &from).await {
                Ok(n) => n,
                Err(reason) => return failed(reason),
            };
            let to_matches = match self.count_nodes(engine, &to).await {
                Ok(n) => n,
                Err(reason) => return failed(reason),
            };
            if from_matches != 1 || to_matches != 1 {
                return RecordOutcome::Unresolved {
                    from_matches: Some(from_matches),
                    to_matches: Some(to_matches),
                };
            }
        }

        if self.config.duplicate_policy == DuplicatePolicy::SkipExisting {
            let lookup = match self.builder.build_edge_lookup(template, record) {
                Ok(lookup) => engine.lookup(&lookup).await,
                Err(e) => return failed(e.to_string()),
            };
            if let Some(reason) = lookup.error {
                return failed(reason);
            }
            if lookup.count > 0 {
                return RecordOutcome::SkippedDuplicate;
            }
        }

        let outcome = engine.execute(&statement).await;
        match outcome.error {
            Some(reason) => failed(reason),
            // The MATCH found no endpoint pair, so nothing was created.
            None if outcome.count == 0 => RecordOutcome::Unresolved {
                from_matches: None,
                to_matches: None,
            },
            None => RecordOutcome::Created,
        }
    }

    async fn count_nodes(
        &self,
        engine: &mut GraphWriteEngine<'_, D>,
        node: &NodeRef,
    ) -> std::result::Result<i64, String> {
        let lookup = engine
            .lookup(&self.builder.build_node_lookup(node.label, &node.name))
            .await;
        match lookup.error {
            Some(reason) => Err(reason),
            None => Ok(lookup.count),
        }
    }
}

fn failed(reason: String) -> RecordOutcome {
    RecordOutcome::Failed { reason }
}
