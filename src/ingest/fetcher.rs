// src/ingest/fetcher.rs
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use metrics::{counter, histogram};

use crate::ingest::normalize_title;
use crate::ingest::types::{
    Candidate, FetchError, FetchResult, RawItem, SourceId, SourceProvider, TitleBounds,
};
use crate::sentiment::TextScorer;

/// Runs one provider's extraction under a deadline and turns raw items into
/// validated, in-call unique candidates.
#[derive(Clone, Default)]
pub struct SourceFetcher {
    scorer: Option<Arc<dyn TextScorer>>,
}

impl SourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an affect scorer; candidates then carry `sentiment`.
    pub fn with_scorer(mut self, scorer: Arc<dyn TextScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub async fn fetch(
        &self,
        provider: &dyn SourceProvider,
        category: Option<&str>,
        timeout: Duration,
    ) -> Result<FetchResult, FetchError> {
        let source = provider.id();
        let t0 = Instant::now();

        let raw = match tokio::time::timeout(timeout, provider.fetch_raw(category)).await {
            Ok(res) => res?,
            Err(_) => return Err(FetchError::Timeout(timeout)),
        };

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("aggregator_fetch_ms", "source" => source.as_str()).record(ms);

        let raw_len = raw.len();
        let candidates = build_candidates(
            source,
            provider.title_bounds(),
            provider.max_candidates(),
            raw,
            self.scorer.as_deref(),
        );
        counter!("aggregator_candidates_total", "source" => source.as_str())
            .increment(candidates.len() as u64);

        tracing::debug!(
            source = %source,
            category = category.unwrap_or("-"),
            raw = raw_len,
            kept = candidates.len(),
            "source extracted"
        );

        Ok(FetchResult::ok(source, candidates))
    }
}

/// Normalize, bound-check and de-duplicate (exact title) raw items,
/// preserving extraction order. Stops at `max` accepted candidates.
pub fn build_candidates(
    source: SourceId,
    bounds: TitleBounds,
    max: Option<usize>,
    raw: Vec<RawItem>,
    scorer: Option<&dyn TextScorer>,
) -> Vec<Candidate> {
    let fetched_at = Utc::now();
    let limit = max.unwrap_or(usize::MAX);
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for item in raw {
        if out.len() >= limit {
            break;
        }
        let title = normalize_title(&item.title);
        if !bounds.accepts(&title) {
            continue;
        }
        if !seen.insert(title.clone()) {
            continue;
        }
        let sentiment = scorer.map(|s| s.score(&title));
        out.push(Candidate {
            title,
            url: item.url.trim().to_string(),
            source,
            fetched_at,
            sentiment,
        });
    }

    out
}
