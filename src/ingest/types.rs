// src/ingest/types.rs
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Stable identifier of one upstream outlet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub &'static str);

impl SourceId {
    pub const BBC: SourceId = SourceId("bbc");
    pub const CNN: SourceId = SourceId("cnn");
    pub const ALJAZEERA: SourceId = SourceId("aljazeera");
    pub const NPR: SourceId = SourceId("npr");

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Human-readable outlet name used for stored records.
    pub fn display_name(&self) -> &'static str {
        match self.0 {
            "bbc" => "BBC News",
            "cnn" => "CNN",
            "aljazeera" => "Al Jazeera",
            "npr" => "NPR",
            other => other,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for SourceId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.0)
    }
}

/// One validated headline produced by a fetch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub title: String,
    /// Empty when the extractor could not resolve a link.
    pub url: String,
    pub source: SourceId,
    pub fetched_at: DateTime<Utc>,
    /// Polarity in [-1, 1], present when the fetcher has a scorer attached.
    pub sentiment: Option<f32>,
}

impl Candidate {
    pub fn new(source: SourceId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source,
            fetched_at: Utc::now(),
            sentiment: None,
        }
    }
}

/// Raw extractor output, before normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub url: String,
}

impl RawItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Inclusive character-count bounds a title must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleBounds {
    pub min: usize,
    pub max: usize,
}

impl TitleBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepts(&self, title: &str) -> bool {
        let n = title.chars().count();
        n >= self.min && n <= self.max
    }
}

impl Default for TitleBounds {
    fn default() -> Self {
        Self::new(20, 200)
    }
}

/// Outcome of one source's fetch within a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub source: SourceId,
    pub candidates: Vec<Candidate>,
    pub succeeded: bool,
}

impl FetchResult {
    pub fn ok(source: SourceId, candidates: Vec<Candidate>) -> Self {
        Self {
            source,
            candidates,
            succeeded: true,
        }
    }

    pub fn failed(source: SourceId) -> Self {
        Self {
            source,
            candidates: Vec::new(),
            succeeded: false,
        }
    }
}

/// Why a source contributed nothing this cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream answered with status {0}")]
    Status(u16),

    #[error("extraction failed: {0}")]
    Parse(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("fetch task aborted: {0}")]
    Task(String),
}

impl FetchError {
    /// Short label used as a metrics/log dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http(_) => "http",
            FetchError::Status(_) => "status",
            FetchError::Parse(_) => "parse",
            FetchError::Timeout(_) => "timeout",
            FetchError::Task(_) => "task",
        }
    }
}

/// An upstream outlet: knows its categories and how to extract raw headlines.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    fn id(&self) -> SourceId;

    /// Topical sections rotated cycle-to-cycle. May be empty.
    fn categories(&self) -> Vec<String>;

    fn title_bounds(&self) -> TitleBounds {
        TitleBounds::default()
    }

    /// Upper bound on accepted candidates per fetch, if the outlet has one.
    fn max_candidates(&self) -> Option<usize> {
        None
    }

    async fn fetch_raw(&self, category: Option<&str>) -> Result<Vec<RawItem>, FetchError>;
}
