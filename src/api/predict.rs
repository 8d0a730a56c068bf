//! POST /predict: coerce, score, and idempotently persist an observation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::coerce::coerce;
use crate::db::{self, InsertOutcome};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Request payload. Fields are optional so that missing ones surface as our
/// own 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub id: Option<Value>,
    pub observation: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub id: String,
    pub probability: f64,
}

/// POST /predict
///
/// Pipeline: validate payload → coerce onto the manifest → score → atomic
/// insert-if-absent. A duplicate identifier is a 409 carrying the stored
/// probability; the stored row is never overwritten. No failure before the
/// insert leaves any trace in the store.
pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<PredictRequest>,
) -> ApiResult<Response> {
    let (Some(id), Some(observation)) = (payload.id, payload.observation) else {
        return Err(ApiError::BadRequest(
            "missing required fields (id, observation)".to_string(),
        ));
    };

    let id = super::canonical_key("id", &id)?;

    let raw = observation
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("observation must be an object".to_string()))?;

    let record = coerce(raw, &state.manifest).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let proba = state
        .scorer
        .predict_probability(&record)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !(0.0..=1.0).contains(&proba) {
        return Err(ApiError::Internal(format!(
            "model produced probability outside [0,1]: {}",
            proba
        )));
    }
    debug!("Scored observation {}: p = {:.6}", id, proba);

    match db::insert_if_absent(&state.db, &id, &record.to_json(), proba).await? {
        InsertOutcome::Created(stored) => {
            info!("Stored prediction {} (p = {:.6})", stored.observation_id, stored.proba);
            Ok(Json(PredictResponse {
                id: stored.observation_id,
                probability: stored.proba,
            })
            .into_response())
        }
        InsertOutcome::Exists(stored) => {
            // Report the probability stored by the original call, not the one
            // just computed.
            debug!("Duplicate prediction id {}", stored.observation_id);
            Ok((
                StatusCode::CONFLICT,
                Json(json!({
                    "id": stored.observation_id,
                    "probability": stored.proba,
                    "error": "id already exists",
                })),
            )
                .into_response())
        }
    }
}
