//! GET /list: enumerate stored predictions for audit/inspection.

use axum::{extract::State, Json};

use crate::db;
use crate::error::ApiResult;
use crate::AppState;

/// GET /list
///
/// Returns every stored prediction with its observation decoded back into an
/// object. Ordering is the store's insertion order; clients must not rely on
/// it.
pub async fn list(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<super::PredictionResponse>>> {
    let predictions = db::list_predictions(&state.db).await?;
    Ok(Json(predictions.into_iter().map(Into::into).collect()))
}
