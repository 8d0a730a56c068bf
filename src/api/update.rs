//! POST /update: attach a ground-truth label to a stored prediction.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<Value>,
    pub true_class: Option<Value>,
}

/// POST /update
///
/// Sets `true_class` for an existing prediction and returns the full updated
/// record. Unknown identifiers are a 404 and never create a record.
/// Re-labeling overwrites the previous label.
pub async fn update(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<super::PredictionResponse>> {
    let (Some(id), Some(true_class)) = (payload.id, payload.true_class) else {
        return Err(ApiError::BadRequest(
            "missing required fields (id, true_class)".to_string(),
        ));
    };

    let id = super::canonical_key("id", &id)?;
    let true_class = super::canonical_key("true_class", &true_class)?;

    match db::set_true_class(&state.db, &id, &true_class).await? {
        Some(updated) => {
            info!("Labeled prediction {} as '{}'", id, true_class);
            Ok(Json(updated.into()))
        }
        None => Err(ApiError::NotFound { id }),
    }
}
