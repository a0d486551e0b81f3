//! Graph mutation builder.
//!
//! Turns entity and relationship records into [`Statement`]s. A statement is
//! structured data; [`Statement::to_cypher`] renders it as parameterized
//! Cypher. Record values only ever travel as parameters. The relationship
//! type (which Cypher cannot parameterize) is backtick-quoted with embedded
//! backticks doubled.
//!
//! Every rendered statement returns a single integer column named
//! [`COUNT_COLUMN`]: nodes created, relationships created, or matches found.

use std::collections::BTreeMap;

use crate::edges::RelationshipRecord;
use crate::errors::{ChainGraphError, Result};
use crate::nodes::EntityRecord;
use crate::property::{PropertyMap, PropertyValue};
use crate::schema::{NodeLabel, RelationTemplate};

/// Name of the single column every rendered statement returns.
pub const COUNT_COLUMN: &str = "count";

/// Default relationship property holding the company–product weight.
pub const DEFAULT_WEIGHT_PROPERTY: &str = "weight";

/// A node located by label and `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub label: NodeLabel,
    pub name: String,
}

impl NodeRef {
    pub fn new(label: NodeLabel, name: impl Into<String>) -> Self {
        Self {
            label,
            name: name.into(),
        }
    }
}

/// One graph mutation or lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Create exactly one node carrying `properties`.
    CreateNode {
        label: NodeLabel,
        properties: PropertyMap,
    },
    /// Create `(from)-[rel_type]->(to)` for the matched endpoints.
    CreateEdge {
        from: NodeRef,
        to: NodeRef,
        rel_type: String,
        properties: PropertyMap,
    },
    /// Count nodes matching `node`.
    CountNodes { node: NodeRef },
    /// Count `rel_type` relationships from `from` to `to`.
    CountEdges {
        from: NodeRef,
        to: NodeRef,
        rel_type: String,
    },
}

/// A bound Cypher parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum CypherParam {
    Value(PropertyValue),
    Map(PropertyMap),
}

/// Parameterized Cypher text.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    pub text: String,
    pub params: BTreeMap<String, CypherParam>,
}

impl Statement {
    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Statement::CreateNode { label, properties } => {
                let name = properties.get("name").map(|v| v.to_string()).unwrap_or_default();
                format!("create {label} '{name}'")
            }
            Statement::CreateEdge {
                from, to, rel_type, ..
            } => format!("create '{}'-[{rel_type}]->'{}'", from.name, to.name),
            Statement::CountNodes { node } => format!("count {} '{}'", node.label, node.name),
            Statement::CountEdges {
                from, to, rel_type, ..
            } => format!("count '{}'-[{rel_type}]->'{}'", from.name, to.name),
        }
    }

    /// Render as parameterized Cypher.
    pub fn to_cypher(&self) -> CypherQuery {
        let mut params = BTreeMap::new();
        let text = match self {
            Statement::CreateNode { label, properties } => {
                params.insert("props".to_string(), CypherParam::Map(properties.clone()));
                format!(
                    "CREATE (n:{} $props) RETURN count(n) AS {COUNT_COLUMN}",
                    quote_identifier(label.as_str())
                )
            }
            Statement::CreateEdge {
                from,
                to,
                rel_type,
                properties,
            } => {
                bind_endpoints(&mut params, from, to);
                let set_clause = if properties.is_empty() {
                    String::new()
                } else {
                    params.insert("props".to_string(), CypherParam::Map(properties.clone()));
                    " SET r += $props".to_string()
                };
                format!(
                    "MATCH (p:{} {{name: $from_name}}), (q:{} {{name: $to_name}}) \
                     CREATE (p)-[r:{}]->(q){set_clause} RETURN count(r) AS {COUNT_COLUMN}",
                    quote_identifier(from.label.as_str()),
                    quote_identifier(to.label.as_str()),
                    quote_identifier(rel_type),
                )
            }
            Statement::CountNodes { node } => {
                params.insert(
                    "name".to_string(),
                    CypherParam::Value(PropertyValue::Text(node.name.clone())),
                );
                format!(
                    "MATCH (n:{} {{name: $name}}) RETURN count(n) AS {COUNT_COLUMN}",
                    quote_identifier(node.label.as_str())
                )
            }
            Statement::CountEdges { from, to, rel_type } => {
                bind_endpoints(&mut params, from, to);
                format!(
                    "MATCH (p:{} {{name: $from_name}})-[r:{}]->(q:{} {{name: $to_name}}) \
                     RETURN count(r) AS {COUNT_COLUMN}",
                    quote_identifier(from.label.as_str()),
                    quote_identifier(rel_type),
                    quote_identifier(to.label.as_str()),
                )
            }
        };
        CypherQuery { text, params }
    }
}

fn bind_endpoints(params: &mut BTreeMap<String, CypherParam>, from: &NodeRef, to: &NodeRef) {
    params.insert(
        "from_name".to_string(),
        CypherParam::Value(PropertyValue::Text(from.name.clone())),
    );
    params.insert(
        "to_name".to_string(),
        CypherParam::Value(PropertyValue::Text(to.name.clone())),
    );
}

/// Quote a label or relationship type as a Cypher identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Builds statements from records. Pure; performs no I/O.
#[derive(Debug, Clone)]
pub struct GraphMutationBuilder {
    weight_property: String,
}

impl Default for GraphMutationBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT_PROPERTY)
    }
}

impl GraphMutationBuilder {
    /// `weight_property` names the relationship property that carries
    /// `rel_weight` on weighted relationships.
    pub fn new(weight_property: impl Into<String>) -> Self {
        Self {
            weight_property: weight_property.into(),
        }
    }

    pub fn weight_property(&self) -> &str {
        &self.weight_property
    }

    /// One statement creating one node with every attribute of `record`.
    pub fn build_node_creation(&self, record: &EntityRecord) -> Result<Statement> {
        Ok(Statement::CreateNode {
            label: record.label(),
            properties: record.properties()?,
        })
    }

    /// One statement creating the relationship described by `record`.
    ///
    /// Weighted templates attach the record's weight as a float property.
    pub fn build_edge_creation(
        &self,
        template: &RelationTemplate,
        record: &RelationshipRecord,
    ) -> Result<Statement> {
        let (from, to) = endpoints(template, record)?;
        let rel_type = relationship_type(record)?;

        let mut properties = PropertyMap::new();
        if template.weighted() {
            let weight = record.weight.ok_or_else(|| {
                ChainGraphError::Validation(format!(
                    "{} record '{}'->'{}' has no weight",
                    template.kind, record.from_name, record.to_name
                ))
            })?;
            properties.insert(self.weight_property.clone(), PropertyValue::Float(weight));
        }

        Ok(Statement::CreateEdge {
            from,
            to,
            rel_type,
            properties,
        })
    }

    /// Count nodes of `label` named `name`.
    pub fn build_node_lookup(&self, label: NodeLabel, name: &str) -> Statement {
        Statement::CountNodes {
            node: NodeRef::new(label, name),
        }
    }

    /// Count relationships already matching `record`.
    pub fn build_edge_lookup(
        &self,
        template: &RelationTemplate,
        record: &RelationshipRecord,
    ) -> Result<Statement> {
        let (from, to) = endpoints(template, record)?;
        Ok(Statement::CountEdges {
            from,
            to,
            rel_type: relationship_type(record)?,
        })
    }
}

fn endpoints(template: &RelationTemplate, record: &RelationshipRecord) -> Result<(NodeRef, NodeRef)> {
    if record.kind != template.kind {
        return Err(ChainGraphError::Validation(format!(
            "{} record passed with {} template",
            record.kind, template.kind
        )));
    }
    Ok((
        NodeRef::new(template.from_label, record.from_name.as_str()),
        NodeRef::new(template.to_label, record.to_name.as_str()),
    ))
}

/// The relationship type is written as given, like endpoint names.
fn relationship_type(record: &RelationshipRecord) -> Result<String> {
    if record.rel.trim().is_empty() {
        return Err(ChainGraphError::Validation(
            "relationship type is empty".to_string(),
        ));
    }
    Ok(record.rel.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RelationKind, SchemaCatalog};
    use serde_json::json;

    fn company(value: serde_json::Value) -> EntityRecord {
        EntityRecord::from_json(NodeLabel::Company, value).unwrap()
    }

    fn relationship(kind: RelationKind, value: serde_json::Value) -> RelationshipRecord {
        let catalog = SchemaCatalog::standard();
        RelationshipRecord::from_json(catalog.template_for(kind), value).unwrap()
    }

    #[test]
    fn test_node_creation_binds_properties_as_map() {
        let builder = GraphMutationBuilder::default();
        let record = company(json!({"name": "Acme", "fullname": "Acme Corp", "code": "000001"}));
        let query = builder.build_node_creation(&record).unwrap().to_cypher();

        assert_eq!(query.text, "CREATE (n:`company` $props) RETURN count(n) AS count");
        match &query.params["props"] {
            CypherParam::Map(props) => {
                assert_eq!(props.len(), 3);
                assert_eq!(props["fullname"], PropertyValue::Text("Acme Corp".into()));
            }
            other => panic!("expected map param, got {other:?}"),
        }
    }

    #[test]
    fn test_quote_delimiters_never_reach_query_text() {
        let builder = GraphMutationBuilder::default();
        let record = company(json!({"name": "O'Brien \"Holdings\"", "fullname": "x'}) DETACH DELETE n //"}));
        let query = builder.build_node_creation(&record).unwrap().to_cypher();

        assert!(!query.text.contains("O'Brien"));
        assert!(!query.text.contains("DETACH"));
        match &query.params["props"] {
            CypherParam::Map(props) => {
                assert_eq!(props["name"], PropertyValue::Text("O'Brien \"Holdings\"".into()));
            }
            other => panic!("expected map param, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_creation_matches_by_name() {
        let builder = GraphMutationBuilder::default();
        let catalog = SchemaCatalog::standard();
        let record = relationship(
            RelationKind::CompanyIndustry,
            json!({"company_name": "Acme", "industry_name": "Semiconductors", "rel": "BELONGS_TO"}),
        );
        let statement = builder
            .build_edge_creation(catalog.template_for(RelationKind::CompanyIndustry), &record)
            .unwrap();
        let query = statement.to_cypher();

        assert_eq!(
            query.text,
            "MATCH (p:`company` {name: $from_name}), (q:`industry` {name: $to_name}) \
             CREATE (p)-[r:`BELONGS_TO`]->(q) RETURN count(r) AS count"
        );
        assert_eq!(
            query.params["from_name"],
            CypherParam::Value(PropertyValue::Text("Acme".into()))
        );
        assert_eq!(
            query.params["to_name"],
            CypherParam::Value(PropertyValue::Text("Semiconductors".into()))
        );
        assert!(!query.params.contains_key("props"));
    }

    #[test]
    fn test_weighted_edge_carries_float_weight() {
        let builder = GraphMutationBuilder::default();
        let catalog = SchemaCatalog::standard();
        let record = relationship(
            RelationKind::CompanyProduct,
            json!({"company_name": "Acme", "product_name": "wafer", "rel": "MAIN_PRODUCT", "rel_weight": "0.35"}),
        );
        let statement = builder
            .build_edge_creation(catalog.template_for(RelationKind::CompanyProduct), &record)
            .unwrap();

        match &statement {
            Statement::CreateEdge { properties, .. } => {
                assert_eq!(properties["weight"], PropertyValue::Float(0.35));
            }
            other => panic!("expected CreateEdge, got {other:?}"),
        }
        assert!(statement.to_cypher().text.contains("SET r += $props"));
    }

    #[test]
    fn test_custom_weight_property_name() {
        let builder = GraphMutationBuilder::new("share");
        let catalog = SchemaCatalog::standard();
        let record = relationship(
            RelationKind::CompanyProduct,
            json!({"company_name": "Acme", "product_name": "wafer", "rel": "MAIN_PRODUCT", "rel_weight": 1}),
        );
        let statement = builder
            .build_edge_creation(catalog.template_for(RelationKind::CompanyProduct), &record)
            .unwrap();
        match statement {
            Statement::CreateEdge { properties, .. } => {
                assert_eq!(properties.get("share"), Some(&PropertyValue::Float(1.0)));
            }
            other => panic!("expected CreateEdge, got {other:?}"),
        }
    }

    #[test]
    fn test_backticks_in_relationship_type_are_escaped() {
        let builder = GraphMutationBuilder::default();
        let catalog = SchemaCatalog::standard();
        let record = relationship(
            RelationKind::ProductProduct,
            json!({"from_entity": "a", "to_entity": "b", "rel": "UP`]->(q) DELETE q //"}),
        );
        let query = builder
            .build_edge_creation(catalog.template_for(RelationKind::ProductProduct), &record)
            .unwrap()
            .to_cypher();
        assert!(query.text.contains("[r:`UP``]->(q) DELETE q //`]"));
    }

    #[test]
    fn test_padded_names_and_type_are_written_as_given() {
        let builder = GraphMutationBuilder::default();
        let catalog = SchemaCatalog::standard();
        let record = relationship(
            RelationKind::CompanyIndustry,
            json!({"company_name": " Acme ", "industry_name": " B ", "rel": " BELONGS_TO "}),
        );
        let statement = builder
            .build_edge_creation(catalog.template_for(RelationKind::CompanyIndustry), &record)
            .unwrap();

        match &statement {
            Statement::CreateEdge { from, to, rel_type, .. } => {
                assert_eq!(from.name, " Acme ");
                assert_eq!(to.name, " B ");
                assert_eq!(rel_type, " BELONGS_TO ");
            }
            other => panic!("expected CreateEdge, got {other:?}"),
        }
        assert!(statement.to_cypher().text.contains("[r:` BELONGS_TO `]"));
    }

    #[test]
    fn test_mismatched_template_is_rejected() {
        let builder = GraphMutationBuilder::default();
        let catalog = SchemaCatalog::standard();
        let record = relationship(
            RelationKind::ProductProduct,
            json!({"from_entity": "a", "to_entity": "b", "rel": "UPSTREAM"}),
        );
        let result =
            builder.build_edge_creation(catalog.template_for(RelationKind::CompanyIndustry), &record);
        assert!(matches!(result, Err(ChainGraphError::Validation(_))));
    }

    #[test]
    fn test_lookups_render_count_queries() {
        let builder = GraphMutationBuilder::default();
        let node = builder.build_node_lookup(NodeLabel::Product, "wafer").to_cypher();
        assert_eq!(
            node.text,
            "MATCH (n:`product` {name: $name}) RETURN count(n) AS count"
        );

        let catalog = SchemaCatalog::standard();
        let record = relationship(
            RelationKind::IndustryIndustry,
            json!({"from_industry": "chips", "to_industry": "electronics", "rel": "PARENT"}),
        );
        let edge = builder
            .build_edge_lookup(catalog.template_for(RelationKind::IndustryIndustry), &record)
            .unwrap()
            .to_cypher();
        assert!(edge.text.starts_with("MATCH (p:`industry` {name: $from_name})-[r:`PARENT`]->"));
        assert!(edge.text.ends_with("RETURN count(r) AS count"));
    }

    #[test]
    fn test_describe_names_endpoints() {
        let statement = Statement::CountEdges {
            from: NodeRef::new(NodeLabel::Company, "Acme"),
            to: NodeRef::new(NodeLabel::Product, "wafer"),
            rel_type: "MAIN_PRODUCT".into(),
        };
        assert_eq!(statement.describe(), "count 'Acme'-[MAIN_PRODUCT]->'wafer'");
    }
}
