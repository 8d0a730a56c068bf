//! Observation coercion: raw JSON object → typed record matching the manifest.
//!
//! Pure and stateless. Fields are processed in manifest order so the first
//! offending field is the one reported; unknown fields in the input are
//! dropped; there is no partial success.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::{FieldKind, Manifest};

/// Coercion failure, naming the first offending field in manifest order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("field '{field}': expected {expected}, got {got}")]
    InvalidType {
        field: String,
        expected: FieldKind,
        got: Value,
    },
}

/// A single coerced feature value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

/// An observation coerced onto the manifest: every manifest field, in manifest
/// order, at its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRecord {
    fields: Vec<(String, FieldValue)>,
}

impl TypedRecord {
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Render the record as a JSON object for storage.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| {
                let json = match value {
                    FieldValue::Integer(i) => Value::from(*i),
                    FieldValue::Real(f) => Value::from(*f),
                    FieldValue::Text(s) => Value::from(s.clone()),
                };
                (name.clone(), json)
            })
            .collect();
        Value::Object(map)
    }
}

/// Coerce a raw observation onto the manifest, or fail on the first field (in
/// manifest order) that is missing or does not convert.
pub fn coerce(raw: &Map<String, Value>, manifest: &Manifest) -> Result<TypedRecord, CoercionError> {
    let mut fields = Vec::with_capacity(manifest.len());

    for (name, kind) in manifest.fields() {
        let value = raw
            .get(name)
            .ok_or_else(|| CoercionError::MissingField(name.clone()))?;

        let coerced = match kind {
            FieldKind::Integer => coerce_integer(value).map(FieldValue::Integer),
            FieldKind::Real => coerce_real(value).map(FieldValue::Real),
            FieldKind::Text => Some(FieldValue::Text(coerce_text(value))),
        };

        match coerced {
            Some(v) => fields.push((name.clone(), v)),
            None => {
                return Err(CoercionError::InvalidType {
                    field: name.clone(),
                    expected: *kind,
                    got: value.clone(),
                })
            }
        }
    }

    Ok(TypedRecord { fields })
}

/// Whole numbers only: JSON integers, floats with zero fractional part, and
/// strings parsing as base-10 integers.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| (i64::MIN as f64..=i64::MAX as f64).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_real(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Never fails: strings pass through, everything else renders as compact JSON.
fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
