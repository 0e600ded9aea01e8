//! Rating and team generation route handlers

use crate::api::error::ApiError;
use crate::service::app::AppState;
use crate::types::{BalancedTeams, GenerateTeamsRequest, MatchRequest, MatchResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Rating routes answer 503 outside of start/stop
async fn ensure_running(state: &AppState) -> Result<(), ApiError> {
    if state.is_running().await {
        Ok(())
    } else {
        warn!("Rejecting request: service is not running");
        Err(ApiError::Unavailable)
    }
}

/// POST /api/v1/mmr-calculation
pub async fn calculate_mmr(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResult>, ApiError> {
    ensure_running(&state).await?;
    let Json(request) = body?;
    debug!("Single MMR calculation requested");

    let result = state.mmr_service().submit_single_match(&request).await?;
    Ok(Json(result))
}

/// POST /api/v1/mmr-calculation/batch
pub async fn calculate_mmr_batch(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<MatchRequest>>, JsonRejection>,
) -> Result<Json<Vec<MatchResult>>, ApiError> {
    ensure_running(&state).await?;
    let Json(requests) = body?;
    debug!("Batch MMR calculation requested ({} matches)", requests.len());

    let results = state.mmr_service().submit_batch(&requests).await?;
    Ok(Json(results))
}

/// POST /api/v1/generate-teams
pub async fn generate_teams(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateTeamsRequest>, JsonRejection>,
) -> Result<Json<BalancedTeams>, ApiError> {
    ensure_running(&state).await?;
    let Json(request) = body?;
    debug!("Team generation requested for {} players", request.players.len());

    let teams = state.mmr_service().balance_teams(&request.players).await?;
    Ok(Json(teams))
}
