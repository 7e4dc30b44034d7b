// src/ingest/providers/cnn.rs
use async_trait::async_trait;

use super::{ancestor_href, base_url, element_text, resolve_link, selector, PageLoader};
use crate::ingest::types::{FetchError, RawItem, SourceId, SourceProvider, TitleBounds};

const BASE: &str = "https://edition.cnn.com";
const MAX_HEADLINES: usize = 50;

pub const CATEGORIES: [&str; 8] = [
    "world",
    "business",
    "africa",
    "asia",
    "europe",
    "middle-east",
    "us",
    "americas",
];

pub struct CnnProvider {
    loader: PageLoader,
}

impl CnnProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            loader: PageLoader::Http(client),
        }
    }

    pub fn from_fixture(html: &str) -> Self {
        Self {
            loader: PageLoader::fixture(html),
        }
    }

    pub fn page_url(category: Option<&str>) -> String {
        format!("{BASE}/{}", category.unwrap_or("world"))
    }

    pub fn extract(html: &str) -> Result<Vec<RawItem>, FetchError> {
        let doc = scraper::Html::parse_document(html);
        let spans = selector("span.container__headline-text")?;
        let base = base_url(BASE)?;

        Ok(doc
            .select(&spans)
            .take(MAX_HEADLINES)
            .map(|s| {
                let href = ancestor_href(s);
                RawItem::new(element_text(s), resolve_link(&base, href.as_deref()))
            })
            .collect())
    }
}

#[async_trait]
impl SourceProvider for CnnProvider {
    fn id(&self) -> SourceId {
        SourceId::CNN
    }

    fn categories(&self) -> Vec<String> {
        CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    /// Minimum length only; long-form CNN headlines are kept whole.
    fn title_bounds(&self) -> TitleBounds {
        TitleBounds::new(20, usize::MAX)
    }

    async fn fetch_raw(&self, category: Option<&str>) -> Result<Vec<RawItem>, FetchError> {
        let url = Self::page_url(category);
        tracing::info!(provider = "cnn", category = category.unwrap_or("-"), "fetching headlines");
        let html = self.loader.load(&url, "cnn").await?;
        Self::extract(&html)
    }
}
