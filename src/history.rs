//! history.rs: in-memory article store: same-day title history for dedup and
//! a URL-unique bulk sink for finished batches.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::ingest::types::Candidate;
use crate::sentiment::SentimentLabel;

/// Titles already recorded for the current local calendar day.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn titles_for_today(&self) -> Result<HashSet<String>>;
}

/// Durable destination for a finished batch.
#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn insert_bulk(&self, items: &[Candidate]) -> Result<InsertReport>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertReport {
    pub saved: usize,
    pub duplicate: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredArticle {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub source: String,
    pub sentiment: Option<f32>,
    pub sentiment_label: Option<SentimentLabel>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: VecDeque<StoredArticle>,
    by_url: HashMap<String, u64>,
    next_id: u64,
}

/// Capped in-memory article log. Oldest rows are evicted first, and URL
/// uniqueness only holds within that retention window.
#[derive(Debug)]
pub struct ArticleStore {
    inner: Mutex<Inner>,
    cap: usize,
}

impl ArticleStore {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, 100_000);
        Self {
            inner: Mutex::new(Inner {
                rows: VecDeque::with_capacity(cap.min(1_000)),
                by_url: HashMap::new(),
                next_id: 1,
            }),
            cap,
        }
    }

    /// Insert one record. `None` when a record with the same non-empty URL is
    /// still retained; URLs of evicted rows may be saved again.
    pub fn insert(&self, c: &Candidate) -> Result<Option<u64>> {
        let mut g = self.lock()?;
        if !c.url.is_empty() && g.by_url.contains_key(&c.url) {
            return Ok(None);
        }

        let id = g.next_id;
        g.next_id += 1;
        if !c.url.is_empty() {
            g.by_url.insert(c.url.clone(), id);
        }
        g.rows.push_back(StoredArticle {
            id,
            title: c.title.clone(),
            url: c.url.clone(),
            source: c.source.display_name().to_string(),
            sentiment: c.sentiment,
            sentiment_label: c.sentiment.map(SentimentLabel::from_score),
            fetched_at: c.fetched_at,
        });

        while g.rows.len() > self.cap {
            let Some(old) = g.rows.pop_front() else {
                break;
            };
            if !old.url.is_empty() {
                g.by_url.remove(&old.url);
            }
        }

        Ok(Some(id))
    }

    /// Titles of records fetched on `day` in the local time zone.
    pub fn titles_for_day(&self, day: NaiveDate) -> Result<HashSet<String>> {
        let g = self.lock()?;
        Ok(g.rows
            .iter()
            .filter(|r| r.fetched_at.with_timezone(&Local).date_naive() == day)
            .map(|r| r.title.clone())
            .collect())
    }

    pub fn snapshot_last_n(&self, n: usize) -> Result<Vec<StoredArticle>> {
        let g = self.lock()?;
        let start = g.rows.len().saturating_sub(n);
        Ok(g.rows.iter().skip(start).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|g| g.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) -> Result<()> {
        let mut g = self.lock()?;
        g.rows.clear();
        g.by_url.clear();
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("article store mutex poisoned"))
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::with_capacity(10_000)
    }
}

#[async_trait]
impl HistoryProvider for ArticleStore {
    async fn titles_for_today(&self) -> Result<HashSet<String>> {
        self.titles_for_day(Local::now().date_naive())
    }
}

#[async_trait]
impl BatchSink for ArticleStore {
    async fn insert_bulk(&self, items: &[Candidate]) -> Result<InsertReport> {
        let mut report = InsertReport::default();
        for c in items {
            match self.insert(c)? {
                Some(_) => report.saved += 1,
                None => report.duplicate += 1,
            }
        }
        Ok(report)
    }
}
