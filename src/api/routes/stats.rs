use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::auth::EDITOR_ROLES;
use crate::models::{
    BattingId, BattingPerformance, BattingRequest, BowlingId, BowlingPerformance, BowlingRequest,
    PlayerId,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stats/batting", post(add_batting))
        .route("/api/stats/batting/player/:player_id", get(batting_for_player))
        .route(
            "/api/stats/batting/:id",
            get(get_batting).put(update_batting).delete(delete_batting),
        )
        .route("/api/stats/bowling", post(add_bowling))
        .route("/api/stats/bowling/player/:player_id", get(bowling_for_player))
        .route(
            "/api/stats/bowling/:id",
            get(get_bowling).put(update_bowling).delete(delete_bowling),
        )
}

// ── Batting ─────────────────────────────────────────────────────

pub async fn add_batting(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<BattingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BattingPerformance>), ApiError> {
    state.access.authorize(&headers, EDITOR_ROLES)?;
    let Json(request) = payload?;
    let record = state.store.write().await.add_batting(request)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn batting_for_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<BattingPerformance>>, ApiError> {
    let records = state
        .store
        .read()
        .await
        .batting_for_player(&PlayerId::from(player_id))?;
    Ok(Json(records))
}

pub async fn get_batting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BattingPerformance>, ApiError> {
    let record = state.store.read().await.get_batting(&BattingId::from(id))?;
    Ok(Json(record))
}

pub async fn update_batting(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BattingRequest>, JsonRejection>,
) -> Result<Json<BattingPerformance>, ApiError> {
    state.access.authorize(&headers, EDITOR_ROLES)?;
    let Json(request) = payload?;
    let record = state
        .store
        .write()
        .await
        .update_batting(&BattingId::from(id), request)?;
    Ok(Json(record))
}

pub async fn delete_batting(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.access.authorize(&headers, EDITOR_ROLES)?;
    state.store.write().await.delete_batting(&BattingId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Bowling ─────────────────────────────────────────────────────

pub async fn add_bowling(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<BowlingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BowlingPerformance>), ApiError> {
    state.access.authorize(&headers, EDITOR_ROLES)?;
    let Json(request) = payload?;
    let record = state.store.write().await.add_bowling(request)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn bowling_for_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<BowlingPerformance>>, ApiError> {
    let records = state
        .store
        .read()
        .await
        .bowling_for_player(&PlayerId::from(player_id))?;
    Ok(Json(records))
}

pub async fn get_bowling(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BowlingPerformance>, ApiError> {
    let record = state.store.read().await.get_bowling(&BowlingId::from(id))?;
    Ok(Json(record))
}

pub async fn update_bowling(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BowlingRequest>, JsonRejection>,
) -> Result<Json<BowlingPerformance>, ApiError> {
    state.access.authorize(&headers, EDITOR_ROLES)?;
    let Json(request) = payload?;
    let record = state
        .store
        .write()
        .await
        .update_bowling(&BowlingId::from(id), request)?;
    Ok(Json(record))
}

pub async fn delete_bowling(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.access.authorize(&headers, EDITOR_ROLES)?;
    state.store.write().await.delete_bowling(&BowlingId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}
