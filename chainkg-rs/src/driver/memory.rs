//! In-memory graph driver.
//!
//! Interprets [`Statement`]s directly against an in-process property graph,
//! with the same matching semantics the rendered Cypher has in Neo4j: a
//! create-edge statement creates one relationship per matching endpoint
//! pair, and nothing at all when either endpoint is missing.
//!
//! Thread-safe via `DashMap`. Nothing is persisted.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};

use crate::driver::GraphDriver;
use crate::errors::{ChainGraphError, Result};
use crate::mutation::{NodeRef, Statement};
use crate::property::{PropertyMap, PropertyValue};
use crate::schema::NodeLabel;

/// A stored node.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    pub id: u64,
    pub label: NodeLabel,
    pub properties: PropertyMap,
}

impl MemoryNode {
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(PropertyValue::as_text)
    }

    fn matches(&self, node: &NodeRef) -> bool {
        self.label == node.label && self.name() == Some(node.name.as_str())
    }
}

/// A stored relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEdge {
    pub id: u64,
    pub from: u64,
    pub to: u64,
    pub rel_type: String,
    pub properties: PropertyMap,
}

/// In-process property graph implementing [`GraphDriver`].
#[derive(Debug, Default)]
pub struct InMemoryDriver {
    nodes: DashMap<u64, MemoryNode>,
    edges: DashMap<u64, MemoryEdge>,
    next_id: AtomicU64,
    executed: AtomicUsize,
    rejected_names: DashSet<String>,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every statement that references a node named `name`, the way a
    /// store rejection would.
    pub fn reject_name(&self, name: impl Into<String>) {
        self.rejected_names.insert(name.into());
    }

    /// Number of statements executed successfully.
    pub fn statements_executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes with `label`, in creation order.
    pub fn nodes(&self, label: NodeLabel) -> Vec<MemoryNode> {
        let mut nodes: Vec<MemoryNode> = self
            .nodes
            .iter()
            .filter(|n| n.label == label)
            .map(|n| n.value().clone())
            .collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    /// Nodes with `label` named `name`, in creation order.
    pub fn nodes_named(&self, label: NodeLabel, name: &str) -> Vec<MemoryNode> {
        self.find(&NodeRef::new(label, name))
    }

    /// Relationships from a node named `from` to a node named `to`, in creation order.
    pub fn edges_between(&self, from: &str, to: &str) -> Vec<MemoryEdge> {
        let mut edges: Vec<MemoryEdge> = self
            .edges
            .iter()
            .filter(|e| self.name_of(e.from).as_deref() == Some(from))
            .filter(|e| self.name_of(e.to).as_deref() == Some(to))
            .map(|e| e.value().clone())
            .collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    fn name_of(&self, id: u64) -> Option<String> {
        self.nodes
            .get(&id)
            .and_then(|n| n.name().map(str::to_string))
    }

    fn find(&self, node: &NodeRef) -> Vec<MemoryNode> {
        let mut found: Vec<MemoryNode> = self
            .nodes
            .iter()
            .filter(|n| n.matches(node))
            .map(|n| n.value().clone())
            .collect();
        found.sort_by_key(|n| n.id);
        found
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn check_rejected(&self, statement: &Statement) -> Result<()> {
        let names: Vec<&str> = match statement {
            Statement::CreateNode { properties, .. } => properties
                .get("name")
                .and_then(PropertyValue::as_text)
                .into_iter()
                .collect(),
            Statement::CreateEdge { from, to, .. } | Statement::CountEdges { from, to, .. } => {
                vec![from.name.as_str(), to.name.as_str()]
            }
            Statement::CountNodes { node } => vec![node.name.as_str()],
        };
        match names.into_iter().find(|n| self.rejected_names.contains(*n)) {
            Some(name) => Err(ChainGraphError::Driver(format!(
                "statement rejected by store: references '{name}'"
            ))),
            None => Ok(()),
        }
    }

    fn apply(&self, statement: &Statement) -> i64 {
        match statement {
            Statement::CreateNode { label, properties } => {
                let id = self.allocate_id();
                self.nodes.insert(
                    id,
                    MemoryNode {
                        id,
                        label: *label,
                        properties: properties.clone(),
                    },
                );
                1
            }
            Statement::CreateEdge {
                from,
                to,
                rel_type,
                properties,
            } => {
                let sources = self.find(from);
                let targets = self.find(to);
                let mut created = 0;
                for source in &sources {
                    for target in &targets {
                        let id = self.allocate_id();
                        self.edges.insert(
                            id,
                            MemoryEdge {
                                id,
                                from: source.id,
                                to: target.id,
                                rel_type: rel_type.clone(),
                                properties: properties.clone(),
                            },
                        );
                        created += 1;
                    }
                }
                created
            }
            Statement::CountNodes { node } => self.find(node).len() as i64,
            Statement::CountEdges { from, to, rel_type } => {
                let sources: Vec<u64> = self.find(from).iter().map(|n| n.id).collect();
                let targets: Vec<u64> = self.find(to).iter().map(|n| n.id).collect();
                self.edges
                    .iter()
                    .filter(|e| {
                        &e.rel_type == rel_type
                            && sources.contains(&e.from)
                            && targets.contains(&e.to)
                    })
                    .count() as i64
            }
        }
    }
}

impl GraphDriver for InMemoryDriver {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, statement: &Statement) -> Result<i64> {
        self.check_rejected(statement)?;
        let count = self.apply(statement);
        self.executed.fetch_add(1, Ordering::SeqCst);
        Ok(count)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
