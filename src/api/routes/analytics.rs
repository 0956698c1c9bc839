use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::analytics::AnalyticsSummary;
use crate::api::state::AppState;
use crate::api::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/analytics/summary", get(summary))
}

/// Leaderboard summary, recomputed from current data on every request.
pub async fn summary(State(state): State<AppState>) -> Result<Json<AnalyticsSummary>, ApiError> {
    let summary = state.engine.compute_summary().await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::analytics::{
        AnalyticsEngine, BattingRow, BowlingRow, PerformanceRepository, RepositoryError,
    };
    use crate::api::build_router;
    use crate::api::test_support::*;

    struct UnreachableStore;

    #[async_trait]
    impl PerformanceRepository for UnreachableStore {
        async fn all_batting_performances(&self) -> Result<Vec<BattingRow>, RepositoryError> {
            Err(RepositoryError("connection refused".to_string()))
        }

        async fn all_bowling_performances(&self) -> Result<Vec<BowlingRow>, RepositoryError> {
            Err(RepositoryError("connection refused".to_string()))
        }
    }

    async fn create_player(app: axum::Router, name: &str) -> String {
        let body = json!({
            "playerName": name,
            "country": "England",
            "startYear": 2004,
            "gender": "MALE",
            "role": "ALL_ROUNDER"
        });
        let (_, json) = send(app, "POST", "/api/players", Some(ADMIN_TOKEN), Some(body)).await;
        json["playerId"].as_str().unwrap().to_string()
    }

    async fn add_batting(app: axum::Router, player_id: &str, runs: u32, date: &str) {
        let body = json!({
            "playerId": player_id,
            "runs": runs,
            "ballsFaced": 120,
            "sixes": 1,
            "fours": 9,
            "opponent": "India",
            "matchDate": date
        });
        let (status, _) =
            send(app, "POST", "/api/stats/batting", Some(ADMIN_TOKEN), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    async fn add_bowling(app: axum::Router, player_id: &str, wickets: u32, overs: f64, runs: u32) {
        let body = json!({
            "playerId": player_id,
            "overs": overs,
            "maidens": 1,
            "runsConceded": runs,
            "wicketsTaken": wickets,
            "opponent": "India",
            "matchDate": "2024-03-01"
        });
        let (status, _) =
            send(app, "POST", "/api/stats/bowling", Some(ADMIN_TOKEN), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_summary_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/analytics/summary").await;
        assert_eq!(status, StatusCode::OK);

        let fields = json.as_object().unwrap();
        assert_eq!(fields.len(), 22);
        assert!(fields.values().all(Value::is_null));
    }

    #[tokio::test]
    async fn test_summary_reflects_stored_performances() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let root = create_player(app.clone(), "Joe Root").await;
        let stokes = create_player(app.clone(), "Ben Stokes").await;

        add_batting(app.clone(), &root, 150, "2024-01-10").await;
        add_batting(app.clone(), &root, 40, "2024-01-20").await;
        add_batting(app.clone(), &stokes, 101, "2024-02-05").await;
        add_bowling(app.clone(), &stokes, 5, 10.0, 40).await;
        add_bowling(app.clone(), &root, 1, 4.0, 12).await;

        let (status, json) = get_json(app, "/api/analytics/summary").await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(json["highestRunsPlayer"], "Joe Root");
        assert_eq!(json["highestRuns"], 190);
        assert_eq!(json["bestBattingAveragePlayer"], "Ben Stokes");
        assert_eq!(json["bestBattingAverage"], 101.0);
        assert_eq!(json["highestWicketsPlayer"], "Ben Stokes");
        assert_eq!(json["bestBowlingEconomyPlayer"], "Joe Root");
        assert_eq!(json["bestBowlingEconomy"], 3.0);
        assert_eq!(json["mostRecentCenturyPlayer"], "Ben Stokes");
        assert_eq!(json["mostRecentCenturyDate"], "2024-02-05");
        assert_eq!(json["totalFiveWicketHaulsPlayer"], "Ben Stokes");
        assert_eq!(json["totalFiveWicketHauls"], 1);
    }

    #[tokio::test]
    async fn test_summary_drops_deleted_player() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let root = create_player(app.clone(), "Joe Root").await;
        add_batting(app.clone(), &root, 150, "2024-01-10").await;

        let (status, _) = send(
            app.clone(),
            "DELETE",
            &format!("/api/players/{}", root),
            Some(ADMIN_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = get_json(app, "/api/analytics/summary").await;
        assert!(json["highestRunsPlayer"].is_null());
    }

    #[tokio::test]
    async fn test_summary_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path())
            .with_engine(AnalyticsEngine::new(Arc::new(UnreachableStore)));
        let app = build_router(state);

        let (status, json) = get_json(app, "/api/analytics/summary").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"]["code"], "ANALYTICS_UNAVAILABLE");
    }
}
