//! Industry: an industry classification node.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// An industry classification. Finer industries point at their parent via
/// industry–industry relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Industry {
    #[validate(length(min = 1))]
    pub name: String,
}
