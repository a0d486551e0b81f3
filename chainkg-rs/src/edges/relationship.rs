//! RelationshipRecord: a directed, optionally weighted edge between two named nodes.

use serde::{Deserialize, Serialize};

use crate::schema::{RelationKind, RelationTemplate, REL_FIELD};

/// A relationship record decoded through its kind's [`RelationTemplate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub kind: RelationKind,
    /// `name` of the source node.
    pub from_name: String,
    /// `name` of the target node.
    pub to_name: String,
    /// Relationship type written to the store.
    pub rel: String,
    /// Share of the company's business attributable to the product
    /// (company–product only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl RelationshipRecord {
    /// Decode a raw JSON object using `template`'s field names.
    ///
    /// Endpoint fields and `rel` must be non-empty strings. For weighted
    /// templates the weight field is required and may be a JSON number or a
    /// numeric string. Fields the template does not declare are rejected.
    pub fn from_json(template: &RelationTemplate, value: serde_json::Value) -> Result<Self, String> {
        let object = match value {
            serde_json::Value::Object(object) => object,
            other => return Err(format!("expected a JSON object, got {other}")),
        };

        if let Some(unknown) = object.keys().find(|k| !template.accepts_field(k)) {
            return Err(format!("unknown field `{unknown}` for {}", template.kind));
        }

        let from_name = required_text(&object, template.from_field)?;
        let to_name = required_text(&object, template.to_field)?;
        let rel = required_text(&object, REL_FIELD)?;

        let weight = match template.weight_field {
            Some(field) => {
                let raw = object
                    .get(field)
                    .ok_or_else(|| format!("missing field `{field}`"))?;
                Some(parse_weight(field, raw)?)
            }
            None => None,
        };

        Ok(Self {
            kind: template.kind,
            from_name,
            to_name,
            rel,
            weight,
        })
    }
}

fn required_text(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<String, String> {
    match object.get(field) {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(serde_json::Value::String(_)) => Err(format!("field `{field}` is empty")),
        Some(other) => Err(format!("field `{field}` must be a string, got {other}")),
        None => Err(format!("missing field `{field}`")),
    }
}

fn parse_weight(field: &str, raw: &serde_json::Value) -> Result<f64, String> {
    let weight = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match weight {
        Some(w) if w.is_finite() => Ok(w),
        _ => Err(format!("field `{field}` must be a finite number, got {raw}")),
    }
}
