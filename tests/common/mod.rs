// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use headline_aggregator::ingest::types::{FetchError, RawItem, SourceId, SourceProvider, TitleBounds};
use headline_aggregator::{AggregatorConfig, HistoryProvider, Orchestrator};

/// Scripted outlet: fixed titles, optional delay/failure, records categories.
pub struct MockProvider {
    id: SourceId,
    categories: Vec<String>,
    titles: Vec<String>,
    delay: Option<Duration>,
    fail: bool,
    calls: Mutex<Vec<Option<String>>>,
}

impl MockProvider {
    pub fn new(id: &'static str, titles: &[&str]) -> Self {
        Self {
            id: SourceId(id),
            categories: vec!["main".to_string()],
            titles: titles.iter().map(|t| t.to_string()).collect(),
            delay: None,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_categories(mut self, cats: &[&str]) -> Self {
        self.categories = cats.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn seen_categories(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceProvider for MockProvider {
    fn id(&self) -> SourceId {
        self.id
    }

    fn categories(&self) -> Vec<String> {
        self.categories.clone()
    }

    fn title_bounds(&self) -> TitleBounds {
        TitleBounds::new(1, 500)
    }

    async fn fetch_raw(&self, category: Option<&str>) -> Result<Vec<RawItem>, FetchError> {
        self.calls.lock().unwrap().push(category.map(str::to_string));
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.fail {
            return Err(FetchError::Status(503));
        }
        Ok(self
            .titles
            .iter()
            .enumerate()
            .map(|(i, t)| RawItem::new(t.clone(), format!("https://example.test/{}/{}", self.id, i)))
            .collect())
    }
}

pub struct FixedHistory(pub HashSet<String>);

impl FixedHistory {
    pub fn empty() -> Self {
        Self(HashSet::new())
    }

    pub fn of(titles: &[&str]) -> Self {
        Self(titles.iter().map(|t| t.to_string()).collect())
    }
}

#[async_trait]
impl HistoryProvider for FixedHistory {
    async fn titles_for_today(&self) -> Result<HashSet<String>> {
        Ok(self.0.clone())
    }
}

pub struct BrokenHistory;

#[async_trait]
impl HistoryProvider for BrokenHistory {
    async fn titles_for_today(&self) -> Result<HashSet<String>> {
        Err(anyhow!("database unavailable"))
    }
}

pub fn cfg(max_workers: usize, timeout_secs: u64, cap: usize) -> AggregatorConfig {
    AggregatorConfig {
        max_workers,
        per_source_timeout_secs: timeout_secs,
        batch_cap: cap,
        ..AggregatorConfig::default()
    }
}

pub fn orchestrator(providers: Vec<Arc<dyn SourceProvider>>, cfg: &AggregatorConfig) -> Orchestrator {
    Orchestrator::new(providers, cfg).with_seed(7)
}
