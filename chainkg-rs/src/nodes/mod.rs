//! Entity records for the industry-chain graph.
//!
//! Three node types:
//! - [`Company`]: listed companies
//! - [`Industry`]: industry classifications
//! - [`Product`]: main business products
//!
//! Each source line decodes into exactly one [`EntityRecord`], which becomes
//! exactly one node.

pub mod company;
pub mod industry;
pub mod product;

pub use company::Company;
pub use industry::Industry;
pub use product::Product;

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::property::{to_property_map, PropertyMap};
use crate::schema::NodeLabel;

/// A typed entity record, one per node.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRecord {
    Company(Company),
    Industry(Industry),
    Product(Product),
}

impl EntityRecord {
    /// Decode a JSON object as a record of `label`.
    ///
    /// Unknown fields, a missing `name` and an empty `name` are all rejected.
    pub fn from_json(label: NodeLabel, value: serde_json::Value) -> Result<Self, String> {
        match label {
            NodeLabel::Company => decode::<Company>(value).map(EntityRecord::Company),
            NodeLabel::Industry => decode::<Industry>(value).map(EntityRecord::Industry),
            NodeLabel::Product => decode::<Product>(value).map(EntityRecord::Product),
        }
    }

    pub fn label(&self) -> NodeLabel {
        match self {
            EntityRecord::Company(_) => NodeLabel::Company,
            EntityRecord::Industry(_) => NodeLabel::Industry,
            EntityRecord::Product(_) => NodeLabel::Product,
        }
    }

    /// Identity key used when relationships look this node up.
    pub fn name(&self) -> &str {
        match self {
            EntityRecord::Company(c) => &c.name,
            EntityRecord::Industry(i) => &i.name,
            EntityRecord::Product(p) => &p.name,
        }
    }

    /// Every present attribute as a node property.
    pub fn properties(&self) -> crate::Result<PropertyMap> {
        match self {
            EntityRecord::Company(c) => to_property_map(c),
            EntityRecord::Industry(i) => to_property_map(i),
            EntityRecord::Product(p) => to_property_map(p),
        }
    }
}

fn decode<T>(value: serde_json::Value) -> Result<T, String>
where
    T: DeserializeOwned + Validate,
{
    let record: T = serde_json::from_value(value).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}
