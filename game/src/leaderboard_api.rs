use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::leaderboard::{
    self, InMemoryScoreRepository, LeaderboardError, ScoreRecord, ScoreRepository,
    TOP_SCORES_LIMIT,
};

pub const SAVED_MESSAGE: &str = "Score saved successfully";
pub const DELETED_MESSAGE: &str = "Score deleted successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub top_scores: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    repo: Arc<Mutex<dyn ScoreRepository>>,
}

impl AppState {
    pub fn new(repo: impl ScoreRepository + 'static) -> Self {
        Self {
            repo: Arc::new(Mutex::new(repo)),
        }
    }

    /// A fresh server's state: the demo leaderboard.
    pub fn with_seed_scores() -> Self {
        Self::new(InMemoryScoreRepository::with_seed_scores())
    }

    // Mutations keep the list sorted even if a handler panics mid-request.
    fn repo(&self) -> MutexGuard<'_, dyn ScoreRepository + 'static> {
        self.repo.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IntoResponse for LeaderboardError {
    fn into_response(self) -> Response {
        let status = match self {
            LeaderboardError::InvalidInput => StatusCode::BAD_REQUEST,
            LeaderboardError::NotFound => StatusCode::NOT_FOUND,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn list_scores(State(state): State<AppState>) -> Json<Vec<ScoreRecord>> {
    let top = state.repo().top(TOP_SCORES_LIMIT);
    Json(top)
}

async fn create_score(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, LeaderboardError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!(%rejection, "rejected score submission");
        LeaderboardError::InvalidInput
    })?;

    let result = {
        let mut repo = state.repo();
        leaderboard::submit_score(&mut *repo, &body, leaderboard::today_utc())
    };

    match result {
        Ok((record, top_scores)) => {
            tracing::info!(
                id = record.id,
                nickname = %record.nickname,
                score = record.score,
                "score saved"
            );
            Ok(Json(SaveResponse {
                success: true,
                message: SAVED_MESSAGE.to_string(),
                top_scores,
            }))
        }
        Err(err) => {
            tracing::warn!(%body, "rejected score submission");
            Err(err)
        }
    }
}

async fn remove_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaveResponse>, LeaderboardError> {
    let id = leading_id(&id).ok_or(LeaderboardError::NotFound)?;

    let top_scores = {
        let mut repo = state.repo();
        leaderboard::delete_score(&mut *repo, id)?
    };
    tracing::info!(id, "score deleted");

    Ok(Json(SaveResponse {
        success: true,
        message: DELETED_MESSAGE.to_string(),
        top_scores,
    }))
}

/// Reads the leading decimal digits of a path id, so `5abc` names record 5.
fn leading_id(raw: &str) -> Option<u64> {
    let raw = raw.trim_start();
    let digits = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    raw[..digits].parse().ok()
}

/// The leaderboard HTTP service. When `static_dir` is given, unmatched paths
/// are served from it, so `/` returns its `index.html`.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/api/scores", get(list_scores).post(create_score))
        .route("/api/scores/:id", delete(remove_score))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_use_leading_digits() {
        assert_eq!(leading_id("5"), Some(5));
        assert_eq!(leading_id("5abc"), Some(5));
        assert_eq!(leading_id("12.7"), Some(12));
        assert_eq!(leading_id("abc"), None);
        assert_eq!(leading_id(""), None);
        assert_eq!(leading_id("-3"), None);
    }
}
