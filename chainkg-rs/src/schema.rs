//! Schema catalog: the recognized node labels and relationship templates.
//!
//! Entity labels carry no field constraints here (the typed records in
//! [`crate::nodes`] own that). Each relationship kind declares which record
//! fields name its two endpoints, the field holding the relationship type,
//! and whether a weight field is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field holding the relationship type in every relationship record.
pub const REL_FIELD: &str = "rel";

/// Field holding the revenue-share weight in weighted relationship records.
pub const WEIGHT_FIELD: &str = "rel_weight";

/// A node label in the industry-chain graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLabel {
    Company,
    Industry,
    Product,
}

impl NodeLabel {
    /// Label as written to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Company => "company",
            NodeLabel::Industry => "industry",
            NodeLabel::Product => "product",
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four declared endpoint-label pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    CompanyIndustry,
    IndustryIndustry,
    CompanyProduct,
    ProductProduct,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::CompanyIndustry => "company_industry",
            RelationKind::IndustryIndustry => "industry_industry",
            RelationKind::CompanyProduct => "company_product",
            RelationKind::ProductProduct => "product_product",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field layout of one relationship kind's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTemplate {
    pub kind: RelationKind,
    pub from_label: NodeLabel,
    pub to_label: NodeLabel,
    /// Record field naming the source endpoint.
    pub from_field: &'static str,
    /// Record field naming the target endpoint.
    pub to_field: &'static str,
    /// `Some(WEIGHT_FIELD)` for weighted kinds.
    pub weight_field: Option<&'static str>,
    /// Source file name, relative to the data directory.
    pub source: &'static str,
}

impl RelationTemplate {
    pub fn weighted(&self) -> bool {
        self.weight_field.is_some()
    }

    /// Whether `key` is a field this template recognizes.
    pub fn accepts_field(&self, key: &str) -> bool {
        key == self.from_field
            || key == self.to_field
            || key == REL_FIELD
            || self.weight_field == Some(key)
    }
}

/// Declares labels, relation templates and the fixed phase ordering.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    templates: [RelationTemplate; 4],
}

impl SchemaCatalog {
    /// The industry-chain schema: companies, industries and products.
    pub fn standard() -> Self {
        let templates = [
            RelationTemplate {
                kind: RelationKind::CompanyIndustry,
                from_label: NodeLabel::Company,
                to_label: NodeLabel::Industry,
                from_field: "company_name",
                to_field: "industry_name",
                weight_field: None,
                source: "company_industry.json",
            },
            RelationTemplate {
                kind: RelationKind::IndustryIndustry,
                from_label: NodeLabel::Industry,
                to_label: NodeLabel::Industry,
                from_field: "from_industry",
                to_field: "to_industry",
                weight_field: None,
                source: "industry_industry.json",
            },
            RelationTemplate {
                kind: RelationKind::CompanyProduct,
                from_label: NodeLabel::Company,
                to_label: NodeLabel::Product,
                from_field: "company_name",
                to_field: "product_name",
                weight_field: Some(WEIGHT_FIELD),
                source: "company_product.json",
            },
            RelationTemplate {
                kind: RelationKind::ProductProduct,
                from_label: NodeLabel::Product,
                to_label: NodeLabel::Product,
                from_field: "from_entity",
                to_field: "to_entity",
                weight_field: None,
                source: "product_product.json",
            },
        ];
        Self { templates }
    }

    /// Template for `kind`.
    pub fn template_for(&self, kind: RelationKind) -> &RelationTemplate {
        let index = match kind {
            RelationKind::CompanyIndustry => 0,
            RelationKind::IndustryIndustry => 1,
            RelationKind::CompanyProduct => 2,
            RelationKind::ProductProduct => 3,
        };
        &self.templates[index]
    }

    /// Node labels in node-phase order.
    pub fn node_phase(&self) -> [NodeLabel; 3] {
        [NodeLabel::Company, NodeLabel::Product, NodeLabel::Industry]
    }

    /// Relation templates in relationship-phase order.
    pub fn relationship_phase(&self) -> impl Iterator<Item = &RelationTemplate> {
        [
            RelationKind::CompanyIndustry,
            RelationKind::IndustryIndustry,
            RelationKind::CompanyProduct,
            RelationKind::ProductProduct,
        ]
        .into_iter()
        .map(move |kind| self.template_for(kind))
    }

    /// Source file name for an entity label.
    pub fn entity_source(&self, label: NodeLabel) -> &'static str {
        match label {
            NodeLabel::Company => "company.json",
            NodeLabel::Industry => "industry.json",
            NodeLabel::Product => "product.json",
        }
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_phase_order() {
        let catalog = SchemaCatalog::standard();
        assert_eq!(
            catalog.node_phase(),
            [NodeLabel::Company, NodeLabel::Product, NodeLabel::Industry]
        );
    }

    #[test]
    fn test_relationship_phase_order() {
        let catalog = SchemaCatalog::standard();
        let kinds: Vec<RelationKind> = catalog.relationship_phase().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RelationKind::CompanyIndustry,
                RelationKind::IndustryIndustry,
                RelationKind::CompanyProduct,
                RelationKind::ProductProduct,
            ]
        );
    }

    #[test]
    fn test_only_company_product_is_weighted() {
        let catalog = SchemaCatalog::standard();
        for template in catalog.relationship_phase() {
            assert_eq!(
                template.weighted(),
                template.kind == RelationKind::CompanyProduct,
                "{}",
                template.kind
            );
        }
    }

    #[test]
    fn test_template_fields() {
        let catalog = SchemaCatalog::standard();
        let t = catalog.template_for(RelationKind::IndustryIndustry);
        assert_eq!(t.from_field, "from_industry");
        assert_eq!(t.to_field, "to_industry");
        assert_eq!(t.from_label, NodeLabel::Industry);
        assert!(t.accepts_field("rel"));
        assert!(!t.accepts_field("rel_weight"));

        let t = catalog.template_for(RelationKind::CompanyProduct);
        assert_eq!(t.to_label, NodeLabel::Product);
        assert!(t.accepts_field("rel_weight"));
    }

    #[test]
    fn test_label_serde_is_lowercase() {
        let json = serde_json::to_string(&NodeLabel::Industry).unwrap();
        assert_eq!(json, "\"industry\"");
        let kind: RelationKind = serde_json::from_str("\"company_product\"").unwrap();
        assert_eq!(kind, RelationKind::CompanyProduct);
    }
}
