//! Structured run report: one outcome per record, grouped by batch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Which phase a batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Nodes,
    Relationships,
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// The node or relationship was written.
    Created,
    /// An identical node or relationship already existed.
    SkippedDuplicate,
    /// An endpoint matched zero nodes or more than one. Match counts are
    /// `None` when endpoints were not looked up before the create.
    Unresolved {
        from_matches: Option<i64>,
        to_matches: Option<i64>,
    },
    /// The store rejected the statement, or no statement could be built.
    Failed { reason: String },
}

/// Outcome of one record, with a short description of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordResult {
    pub record: String,
    pub outcome: RecordOutcome,
}

/// Report of one batch (one label or one relation kind).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub name: String,
    pub phase: Phase,
    /// Records loaded from the source.
    pub total: usize,
    /// Mutations submitted to the store.
    pub attempted: usize,
    /// Mutations the store executed without error.
    pub succeeded: usize,
    pub results: Vec<RecordResult>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Created))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::SkippedDuplicate))
    }

    pub fn unresolved(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Unresolved { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Failed { .. }))
    }
}

/// Report of a whole ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub batches: Vec<BatchReport>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            batches: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Batch named `name` (a node label or relation kind).
    pub fn batch(&self, name: &str) -> Option<&BatchReport> {
        self.batches.iter().find(|b| b.name == name)
    }

    pub fn created(&self) -> usize {
        self.batches.iter().map(BatchReport::created).sum()
    }

    pub fn skipped(&self) -> usize {
        self.batches.iter().map(BatchReport::skipped).sum()
    }

    pub fn unresolved(&self) -> usize {
        self.batches.iter().map(BatchReport::unresolved).sum()
    }

    pub fn failed(&self) -> usize {
        self.batches.iter().map(BatchReport::failed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(outcomes: Vec<RecordOutcome>) -> BatchReport {
        BatchReport {
            name: "company".into(),
            phase: Phase::Nodes,
            total: outcomes.len(),
            attempted: outcomes.len(),
            succeeded: outcomes.len(),
            results: outcomes
                .into_iter()
                .map(|outcome| RecordResult {
                    record: "r".into(),
                    outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn test_batch_tallies_by_outcome() {
        let report = batch(vec![
            RecordOutcome::Created,
            RecordOutcome::Created,
            RecordOutcome::SkippedDuplicate,
            RecordOutcome::Unresolved {
                from_matches: Some(0),
                to_matches: Some(1),
            },
            RecordOutcome::Failed {
                reason: "boom".into(),
            },
        ]);
        assert_eq!(report.created(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.unresolved(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_run_report_sums_batches_and_serializes() {
        let mut run = RunReport::start();
        run.batches.push(batch(vec![RecordOutcome::Created]));
        run.finish();

        assert_eq!(run.created(), 1);
        assert!(run.finished_at.is_some());
        assert!(run.batch("company").is_some());

        let json = serde_json::to_value(&run).expect("serialize report");
        assert_eq!(json["batches"][0]["results"][0]["outcome"]["status"], "created");
    }
}
