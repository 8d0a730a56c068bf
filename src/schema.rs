//! Schema manifest: the ordered feature columns the model expects.
//!
//! Loaded once at startup from a JSON artifact and never mutated afterwards.
//! The artifact carries the column order separately from the column kinds:
//!
//! ```json
//! {
//!     "columns": ["age", "country"],
//!     "kinds": { "age": "integer", "country": "text" }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Value kind a manifest field coerces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Base-10 whole number
    Integer,
    /// Floating-point number
    Real,
    /// Free text (any value renders to text)
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Real => write!(f, "real"),
            FieldKind::Text => write!(f, "text"),
        }
    }
}

/// On-disk shape of the manifest artifact.
#[derive(Debug, Deserialize)]
struct ManifestFile {
    columns: Vec<String>,
    kinds: HashMap<String, FieldKind>,
}

/// Ordered sequence of (field name, kind) pairs. Immutable after load.
#[derive(Debug, Clone)]
pub struct Manifest {
    fields: Vec<(String, FieldKind)>,
}

impl Manifest {
    /// Build a manifest directly from (name, kind) pairs.
    pub fn new(fields: Vec<(String, FieldKind)>) -> Self {
        Self { fields }
    }

    /// Load and validate the manifest artifact.
    ///
    /// Every listed column must have a kind; kinds for columns not listed are
    /// ignored with a warning.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema manifest: {}", path.display()))?;
        let file: ManifestFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse schema manifest: {}", path.display()))?;

        let mut fields = Vec::with_capacity(file.columns.len());
        for name in &file.columns {
            let kind = file
                .kinds
                .get(name)
                .copied()
                .with_context(|| format!("Schema manifest has no kind for column '{}'", name))?;
            fields.push((name.clone(), kind));
        }

        for name in file.kinds.keys() {
            if !file.columns.iter().any(|c| c == name) {
                warn!("Schema manifest kind for '{}' has no matching column, ignoring", name);
            }
        }

        Ok(Self { fields })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(String, FieldKind)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
