use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::auth::EDITOR_ROLES;
use crate::models::{Player, PlayerId, PlayerRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/players", get(list_players).post(create_player))
        .route("/api/players/countries", get(list_countries))
        .route("/api/players/country/:country", get(players_by_country))
        .route(
            "/api/players/:id",
            get(get_player).put(update_player).delete(delete_player),
        )
}

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    pub name: Option<String>,
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<PlayerQuery>,
) -> Json<Vec<Player>> {
    Json(state.store.read().await.list_players(params.name.as_deref()))
}

pub async fn list_countries(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.read().await.distinct_countries())
}

/// `All` returns every player.
pub async fn players_by_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Json<Vec<Player>> {
    Json(state.store.read().await.players_by_country(&country))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let player = state.store.read().await.get_player(&PlayerId::from(id))?;
    Ok(Json(player))
}

pub async fn create_player(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<PlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let caller = state.access.authorize(&headers, EDITOR_ROLES)?;
    let Json(request) = payload?;
    let player = state.store.write().await.create_player(request)?;
    info!("{} created player {}", caller.label, player.id);
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn update_player(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PlayerRequest>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    state.access.authorize(&headers, EDITOR_ROLES)?;
    let Json(request) = payload?;
    let player = state
        .store
        .write()
        .await
        .update_player(&PlayerId::from(id), request)?;
    Ok(Json(player))
}

/// Removes the player and every performance recorded against them.
pub async fn delete_player(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let caller = state.access.authorize(&headers, EDITOR_ROLES)?;
    let id = PlayerId::from(id);
    state.store.write().await.delete_player(&id)?;
    info!("{} deleted player {}", caller.label, id);
    Ok(StatusCode::NO_CONTENT)
}
