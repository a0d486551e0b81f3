//! Product: a main business product of one or more companies.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Product {
    #[validate(length(min = 1))]
    pub name: String,
}
