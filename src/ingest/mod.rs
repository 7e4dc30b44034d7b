// src/ingest/mod.rs
pub mod dedup;
pub mod fetcher;
pub mod merge;
pub mod providers;
pub mod rotation;
pub mod types;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::config::AggregatorConfig;
use crate::history::{BatchSink, HistoryProvider, InsertReport};
use crate::ingest::dedup::{filter_against_history, PerSource};
use crate::ingest::fetcher::SourceFetcher;
use crate::ingest::merge::merge;
use crate::ingest::rotation::RotationState;
use crate::ingest::types::{Candidate, FetchError, FetchResult, SourceProvider};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "aggregator_fetch_total",
            "Source fetches by outcome (ok/http/status/parse/timeout/task)."
        );
        describe_histogram!("aggregator_fetch_ms", "Source fetch + extraction time in milliseconds.");
        describe_counter!(
            "aggregator_candidates_total",
            "Candidates accepted after title validation."
        );
        describe_counter!(
            "aggregator_dedup_removed_total",
            "Candidates removed because the title was already recorded today."
        );
        describe_counter!(
            "aggregator_starvation_kept_total",
            "Sources kept alive by retaining one already-seen title."
        );
        describe_counter!("aggregator_cycles_total", "Completed orchestration cycles.");
        describe_gauge!("aggregator_batch_size", "Size of the last produced batch.");
        describe_gauge!(
            "aggregator_last_cycle_ts",
            "Unix ts when the last cycle finished."
        );
    });
}

/// Normalize extracted headline text: fold typographic quotes, collapse whitespace.
///
/// Input is DOM text, already entity-decoded by the parser, so `<`, `>` and
/// `&` are literal characters of the headline and are kept as-is.
pub fn normalize_title(s: &str) -> String {
    let folded = s
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("ws regex"));
    re_ws.replace_all(&folded, " ").trim().to_string()
}

/// Final, capped output of one cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Batch {
    pub items: Vec<Candidate>,
    /// Items before this index come from the deterministic guaranteed phase.
    pub guaranteed_len: usize,
    pub sources_ok: usize,
    pub sources_failed: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.title.as_str()).collect()
    }
}

/// Drives rotation → parallel fetch → dedup → fair merge.
pub struct Orchestrator {
    providers: Vec<Arc<dyn SourceProvider>>,
    rotation: RotationState,
    fetcher: SourceFetcher,
    max_workers: usize,
    per_source_timeout: Duration,
    batch_cap: usize,
    rng: Mutex<StdRng>,
}

impl Orchestrator {
    /// Providers are kept in the given order; that order is the stable
    /// source order used by dedup and merge.
    pub fn new(providers: Vec<Arc<dyn SourceProvider>>, cfg: &AggregatorConfig) -> Self {
        let mut rotation = RotationState::new();
        for p in &providers {
            let cats = cfg
                .source(p.id().as_str())
                .categories
                .unwrap_or_else(|| p.categories());
            rotation.register(p.id(), cats);
        }

        Self {
            providers,
            rotation,
            fetcher: SourceFetcher::new(),
            max_workers: cfg.max_workers.max(1),
            per_source_timeout: cfg.per_source_timeout(),
            batch_cap: cfg.batch_cap,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic shuffle of the round-robin tail.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_fetcher(mut self, fetcher: SourceFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replace rotation state (e.g. with injected starting cursors).
    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub async fn run_cycle<H>(&self, history: &H) -> Result<Batch>
    where
        H: HistoryProvider + ?Sized,
    {
        ensure_metrics_described();

        let results = self.fetch_all().await;
        let sources_ok = results.iter().filter(|r| r.succeeded).count();
        let sources_failed = results.len() - sources_ok;

        let per_source: PerSource = results
            .into_iter()
            .filter(|r| r.succeeded)
            .map(|r| (r.source, r.candidates))
            .collect();

        let mut batch = Batch {
            sources_ok,
            sources_failed,
            ..Batch::default()
        };

        if per_source.iter().all(|(_, c)| c.is_empty()) {
            tracing::info!(sources_ok, sources_failed, "cycle produced no candidates");
            self.record_cycle(&batch);
            return Ok(batch);
        }

        let seen = history
            .titles_for_today()
            .await
            .context("loading today's recorded titles")?;
        let (filtered, stats) = filter_against_history(per_source, &seen);
        counter!("aggregator_dedup_removed_total").increment(stats.removed as u64);
        counter!("aggregator_starvation_kept_total").increment(stats.starvation_kept as u64);
        tracing::debug!(
            history = seen.len(),
            removed = stats.removed,
            starvation_kept = stats.starvation_kept,
            "dedup against today's history"
        );

        let merged = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| anyhow!("merge rng mutex poisoned"))?;
            merge(&filtered, self.batch_cap, &mut *rng)
        };
        batch.items = merged.items;
        batch.guaranteed_len = merged.guaranteed_len;

        tracing::info!(
            size = batch.len(),
            guaranteed = batch.guaranteed_len,
            sources_ok,
            sources_failed,
            cap = self.batch_cap,
            "cycle finished"
        );
        self.record_cycle(&batch);
        Ok(batch)
    }

    /// One task per source, at most `max_workers` in flight, each under its
    /// own deadline. Results come back in registration order.
    async fn fetch_all(&self) -> Vec<FetchResult> {
        let permits = Arc::new(Semaphore::new(self.max_workers));

        let mut ids = Vec::with_capacity(self.providers.len());
        let mut handles = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let id = provider.id();
            let category = self.rotation.next(id);
            let provider = Arc::clone(provider);
            let fetcher = self.fetcher.clone();
            let permits = Arc::clone(&permits);
            let timeout = self.per_source_timeout;

            ids.push(id);
            handles.push(tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| FetchError::Task(e.to_string()))?;
                fetcher
                    .fetch(provider.as_ref(), category.as_deref(), timeout)
                    .await
            }));
        }

        let joined = futures::future::join_all(handles).await;

        ids.into_iter()
            .zip(joined)
            .map(|(id, joined)| {
                let res = joined.unwrap_or_else(|e| Err(FetchError::Task(e.to_string())));
                match res {
                    Ok(r) => {
                        counter!("aggregator_fetch_total", "source" => id.as_str(), "outcome" => "ok")
                            .increment(1);
                        tracing::info!(source = %id, count = r.candidates.len(), "source fetched");
                        r
                    }
                    Err(e) => {
                        counter!("aggregator_fetch_total", "source" => id.as_str(), "outcome" => e.kind())
                            .increment(1);
                        tracing::warn!(source = %id, error = %e, "source contributed nothing this cycle");
                        FetchResult::failed(id)
                    }
                }
            })
            .collect()
    }

    fn record_cycle(&self, batch: &Batch) {
        let now = chrono::Utc::now().timestamp().max(0);
        counter!("aggregator_cycles_total").increment(1);
        gauge!("aggregator_batch_size").set(batch.len() as f64);
        gauge!("aggregator_last_cycle_ts").set(now as f64);
    }
}

/// Run one cycle and hand the batch to `sink`.
pub async fn run_and_store<H, S>(
    orchestrator: &Orchestrator,
    history: &H,
    sink: &S,
) -> Result<(Batch, InsertReport)>
where
    H: HistoryProvider + ?Sized,
    S: BatchSink + ?Sized,
{
    let batch = orchestrator.run_cycle(history).await?;
    let report = sink
        .insert_bulk(&batch.items)
        .await
        .context("storing batch")?;
    tracing::info!(
        fetched = batch.len(),
        saved = report.saved,
        duplicate = report.duplicate,
        "batch stored"
    );
    Ok((batch, report))
}
