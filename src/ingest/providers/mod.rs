// src/ingest/providers/mod.rs
//! HTML headline extractors for the built-in outlets.
//!
//! Every provider runs either against a live page (`reqwest`) or a fixture
//! string. Parsing is synchronous so `scraper::Html` never crosses an await.

pub mod aljazeera;
pub mod bbc;
pub mod cnn;
pub mod npr;

use std::sync::Arc;

use anyhow::Context;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::config::AggregatorConfig;
use crate::ingest::types::{FetchError, SourceProvider};

pub use aljazeera::AlJazeeraProvider;
pub use bbc::BbcProvider;
pub use cnn::CnnProvider;
pub use npr::NprProvider;

/// Where a provider gets its page body from.
#[derive(Clone, Debug)]
pub enum PageLoader {
    Fixture(String),
    Http(reqwest::Client),
}

impl PageLoader {
    pub fn fixture(html: &str) -> Self {
        PageLoader::Fixture(html.to_string())
    }

    pub async fn load(&self, url: &str, source: &'static str) -> Result<String, FetchError> {
        match self {
            PageLoader::Fixture(s) => Ok(s.clone()),
            PageLoader::Http(client) => {
                let resp = client.get(url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    tracing::warn!(provider = source, %url, status = status.as_u16(), "upstream not responding");
                    return Err(FetchError::Status(status.as_u16()));
                }
                Ok(resp.text().await?)
            }
        }
    }
}

/// Shared HTTP client with the configured User-Agent and request timeout.
pub fn http_client(cfg: &AggregatorConfig) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(cfg.request_timeout())
        .build()
        .context("building http client")
}

/// All built-in outlets in registration order, filtered by config.
pub fn default_providers(
    cfg: &AggregatorConfig,
    client: reqwest::Client,
) -> Vec<Arc<dyn SourceProvider>> {
    let all: Vec<Arc<dyn SourceProvider>> = vec![
        Arc::new(BbcProvider::new(client.clone())),
        Arc::new(CnnProvider::new(client.clone())),
        Arc::new(AlJazeeraProvider::new(client.clone())),
        Arc::new(NprProvider::new(client)),
    ];
    all.into_iter()
        .filter(|p| cfg.is_enabled(p.id().as_str()))
        .collect()
}

pub(crate) fn selector(css: &'static str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("selector `{css}`: {e:?}")))
}

pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

/// `href` of the nearest enclosing `<a>`, if any.
pub(crate) fn ancestor_href(el: ElementRef<'_>) -> Option<String> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Absolute http(s) link, or empty when the href cannot be resolved.
pub(crate) fn resolve_link(base: &Url, href: Option<&str>) -> String {
    let Some(href) = href.map(str::trim).filter(|h| !h.is_empty()) else {
        return String::new();
    };
    match base.join(href) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn base_url(s: &str) -> Result<Url, FetchError> {
    Url::parse(s).map_err(|e| FetchError::Parse(format!("base url {s}: {e}")))
}
