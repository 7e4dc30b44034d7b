// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod history;
pub mod ingest;
pub mod metrics;
pub mod sentiment;

use std::sync::Arc;

use axum::Router;

pub use crate::api::router;
pub use crate::config::AggregatorConfig;
pub use crate::history::{ArticleStore, BatchSink, HistoryProvider, InsertReport};
pub use crate::ingest::types::{Candidate, FetchError, FetchResult, SourceId, SourceProvider};
pub use crate::ingest::{run_and_store, Batch, Orchestrator};

use crate::ingest::fetcher::SourceFetcher;
use crate::ingest::providers::{default_providers, http_client};
use crate::sentiment::LexiconScorer;

/// Orchestrator over the built-in live outlets, with inline sentiment scoring.
pub fn live_orchestrator(cfg: &AggregatorConfig) -> anyhow::Result<Orchestrator> {
    let client = http_client(cfg)?;
    let providers = default_providers(cfg, client);
    tracing::info!(
        sources = ?providers.iter().map(|p| p.id().as_str()).collect::<Vec<_>>(),
        max_workers = cfg.max_workers,
        timeout_secs = cfg.per_source_timeout_secs,
        batch_cap = cfg.batch_cap,
        "aggregator configured"
    );
    let fetcher = SourceFetcher::new().with_scorer(Arc::new(LexiconScorer::new()));
    Ok(Orchestrator::new(providers, cfg).with_fetcher(fetcher))
}

/// Full application router (without `/metrics`, which needs the global recorder).
pub fn app(cfg: &AggregatorConfig) -> anyhow::Result<Router> {
    let orchestrator = live_orchestrator(cfg)?;
    let state = api::AppState::new(orchestrator, ArticleStore::default());
    Ok(api::router(state))
}
