//! HTTP API handlers.

pub mod health;
pub mod list;
pub mod predict;
pub mod update;

pub use health::health_routes;
pub use list::list;
pub use predict::predict;
pub use update::update;

use serde::Serialize;
use serde_json::Value;

use crate::db::StoredPrediction;
use crate::error::ApiError;

/// Full stored record, as returned by update and list.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub id: String,
    pub observation: Value,
    pub probability: f64,
    pub true_class: Option<String>,
}

impl From<StoredPrediction> for PredictionResponse {
    fn from(p: StoredPrediction) -> Self {
        Self {
            id: p.observation_id,
            observation: p.observation,
            probability: p.proba,
            true_class: p.true_class,
        }
    }
}

/// Canonicalize a caller-supplied key to its text form.
///
/// Strings pass through, JSON integers become their decimal text; anything
/// else is rejected.
fn canonical_key(field: &str, value: &Value) -> Result<String, ApiError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.as_i64().is_some() || n.as_u64().is_some() => Ok(n.to_string()),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be a string or integer",
            field
        ))),
    }
}
