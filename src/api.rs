use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::history::{ArticleStore, StoredArticle};
use crate::ingest::{run_and_store, Orchestrator};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<ArticleStore>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, store: ArticleStore) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/refresh", post(refresh))
        .route("/articles", get(articles))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RefreshResp {
    pub fetched: usize,
    pub saved: usize,
    pub duplicate: usize,
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub titles: Vec<String>,
}

async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResp>, (StatusCode, String)> {
    let store = state.store.as_ref();
    match run_and_store(&state.orchestrator, store, store).await {
        Ok((batch, report)) => Ok(Json(RefreshResp {
            fetched: batch.len(),
            saved: report.saved,
            duplicate: report.duplicate,
            sources_ok: batch.sources_ok,
            sources_failed: batch.sources_failed,
            titles: batch.items.into_iter().map(|c| c.title).collect(),
        })),
        Err(e) => {
            tracing::error!(error = ?e, "refresh cycle failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, format!("refresh failed: {e:#}")))
        }
    }
}

const DEFAULT_ARTICLES_LIMIT: usize = 50;

/// Most recent stored articles, oldest first. `?limit=N` (default 50).
async fn articles(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<Vec<StoredArticle>>, (StatusCode, String)> {
    let limit = q
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ARTICLES_LIMIT);
    state
        .store
        .snapshot_last_n(limit)
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))
}
