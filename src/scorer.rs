//! Scoring backend: trained classifier producing a probability.
//!
//! The service only depends on the `Scorer` trait; `LogisticModel` is the
//! concrete backend, loaded once at startup from a JSON artifact:
//!
//! ```json
//! {
//!     "intercept": -1.2,
//!     "weights": {
//!         "age": 0.031,
//!         "country": { "PT": 0.4, "ES": 0.1 }
//!     }
//! }
//! ```
//!
//! Numeric weights multiply the field value; categorical weight maps look up
//! the text value (unseen categories contribute 0). Deterministic for a fixed
//! artifact, no side effects.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::coerce::{FieldValue, TypedRecord};

/// Scoring failure. Defensive only: a record that passed coercion against the
/// same manifest the model was trained on should always score. Never retried.
#[derive(Debug, Clone, Error)]
#[error("scoring failed: {0}")]
pub struct ScoringError(pub String);

/// A trained classifier: typed record in, probability in [0,1] out.
pub trait Scorer: Send + Sync {
    fn predict_probability(&self, record: &TypedRecord) -> Result<f64, ScoringError>;
}

/// Per-field model term.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    /// Coefficient for a numeric field
    Numeric(f64),
    /// Category → coefficient map for a text field
    Categorical(HashMap<String, f64>),
}

/// Logistic regression over the manifest fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    intercept: f64,
    weights: HashMap<String, Weight>,
}

impl LogisticModel {
    pub fn new(intercept: f64, weights: HashMap<String, Weight>) -> Self {
        Self { intercept, weights }
    }

    /// Load the model artifact.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        let model = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model artifact: {}", path.display()))?;
        Ok(model)
    }
}

impl Scorer for LogisticModel {
    fn predict_probability(&self, record: &TypedRecord) -> Result<f64, ScoringError> {
        let mut z = self.intercept;

        for (name, value) in record.fields() {
            let weight = self.weights.get(name).ok_or_else(|| {
                ScoringError(format!("model has no weights for field '{}'", name))
            })?;

            match (weight, value) {
                (Weight::Numeric(w), FieldValue::Integer(i)) => z += w * *i as f64,
                (Weight::Numeric(w), FieldValue::Real(f)) => z += w * f,
                (Weight::Categorical(map), FieldValue::Text(s)) => {
                    z += map.get(s).copied().unwrap_or(0.0);
                }
                (Weight::Numeric(_), FieldValue::Text(_)) => {
                    return Err(ScoringError(format!(
                        "field '{}' is text but the model weight is numeric",
                        name
                    )));
                }
                (Weight::Categorical(map), FieldValue::Integer(i)) => {
                    z += map.get(&i.to_string()).copied().unwrap_or(0.0);
                }
                (Weight::Categorical(_), FieldValue::Real(_)) => {
                    return Err(ScoringError(format!(
                        "field '{}' is real but the model weight is categorical",
                        name
                    )));
                }
            }
        }

        Ok(sigmoid(z))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
