//! Company: a listed company, the base entity of the industry chain.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::property::PropertyValue;

/// A listed company.
///
/// Attributes other than `name` are scalars of any JSON type and reach the
/// store with that type (a numeric `code` stays an integer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Company {
    /// Short name, used as the identity key for relationship lookup.
    #[validate(length(min = 1))]
    pub name: String,
    /// Registered full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<PropertyValue>,
    /// Stock code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<PropertyValue>,
}
