//! Prediction store: SQLite persistence for scored observations.
//!
//! Identifier uniqueness is enforced by the `observation_id` primary key, not
//! by an application-level existence check. `insert_if_absent` is one atomic
//! `INSERT ... ON CONFLICT DO NOTHING`; two concurrent inserts of the same
//! identifier cannot both succeed, and the loser is handed the stored row.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// One scored observation, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPrediction {
    /// Caller-supplied identifier; unique across the store
    pub observation_id: String,
    /// Coerced observation, decoded from its stored JSON form
    pub observation: Value,
    /// Model probability in [0,1]
    pub proba: f64,
    /// Ground-truth label, absent until reported via update
    pub true_class: Option<String>,
}

/// Outcome of an idempotent insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// No prior row existed; this row is now durable
    Created(StoredPrediction),
    /// The identifier was already present; carries the stored row untouched
    Exists(StoredPrediction),
}

/// Open (creating if needed) the database and ensure the predictions table.
pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    init_tables(&pool).await?;

    Ok(pool)
}

async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            observation_id TEXT PRIMARY KEY,
            observation TEXT NOT NULL,
            proba REAL NOT NULL,
            true_class TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create predictions table")?;

    Ok(())
}

/// Insert a prediction unless the identifier already exists.
///
/// The existence check and the insert are a single statement, so concurrent
/// calls with the same identifier resolve to exactly one `Created` and the
/// rest `Exists`, each carrying the row the winner stored.
pub async fn insert_if_absent(
    pool: &SqlitePool,
    observation_id: &str,
    observation: &Value,
    proba: f64,
) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO predictions (observation_id, observation, proba, true_class)
        VALUES (?, ?, ?, NULL)
        ON CONFLICT(observation_id) DO NOTHING
        "#,
    )
    .bind(observation_id)
    .bind(observation.to_string())
    .bind(proba)
    .execute(pool)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(InsertOutcome::Created(StoredPrediction {
            observation_id: observation_id.to_string(),
            observation: observation.clone(),
            proba,
            true_class: None,
        }));
    }

    // Conflict path: the row exists and rows are never deleted, so the fetch
    // must find it.
    let existing = get_prediction(pool, observation_id)
        .await?
        .with_context(|| format!("Conflicting row vanished for id '{}'", observation_id))?;

    Ok(InsertOutcome::Exists(existing))
}

/// Fetch one prediction by identifier.
pub async fn get_prediction(
    pool: &SqlitePool,
    observation_id: &str,
) -> Result<Option<StoredPrediction>> {
    let row = sqlx::query(
        r#"
        SELECT observation_id, observation, proba, true_class
        FROM predictions
        WHERE observation_id = ?
        "#,
    )
    .bind(observation_id)
    .fetch_optional(pool)
    .await?;

    row.map(from_row).transpose()
}

/// Record the ground-truth label for an identifier.
///
/// Returns the updated row, or `None` when the identifier is unknown.
/// Re-labeling overwrites the previous label.
pub async fn set_true_class(
    pool: &SqlitePool,
    observation_id: &str,
    true_class: &str,
) -> Result<Option<StoredPrediction>> {
    let result = sqlx::query(
        r#"
        UPDATE predictions
        SET true_class = ?
        WHERE observation_id = ?
        "#,
    )
    .bind(true_class)
    .bind(observation_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_prediction(pool, observation_id).await
}

/// All predictions in insertion order. Callers must not depend on the order.
pub async fn list_predictions(pool: &SqlitePool) -> Result<Vec<StoredPrediction>> {
    let rows = sqlx::query(
        r#"
        SELECT observation_id, observation, proba, true_class
        FROM predictions
        ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(from_row).collect()
}

fn from_row(row: SqliteRow) -> Result<StoredPrediction> {
    let observation_id: String = row.get("observation_id");
    let observation_json: String = row.get("observation");
    let observation = serde_json::from_str(&observation_json)
        .with_context(|| format!("Corrupt stored observation for id '{}'", observation_id))?;

    Ok(StoredPrediction {
        observation_id,
        observation,
        proba: row.get("proba"),
        true_class: row.get("true_class"),
    })
}
