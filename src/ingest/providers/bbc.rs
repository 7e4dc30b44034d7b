// src/ingest/providers/bbc.rs
use async_trait::async_trait;

use super::{ancestor_href, base_url, element_text, resolve_link, selector, PageLoader};
use crate::ingest::types::{FetchError, RawItem, SourceId, SourceProvider, TitleBounds};

const BASE: &str = "https://www.bbc.com";
const MAX_TAGS: usize = 150;

pub const CATEGORIES: [&str; 5] = [
    "world",
    "business",
    "technology",
    "health",
    "science_and_environment",
];

/// BBC News section pages: headlines are `h2`/`h3`, links on the wrapping `<a>`.
pub struct BbcProvider {
    loader: PageLoader,
}

impl BbcProvider {
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
        match category {
            Some(c) => format!("{BASE}/news/{c}"),
            None => format!("{BASE}/news"),
        }
    }

    pub fn extract(html: &str) -> Result<Vec<RawItem>, FetchError> {
        let doc = scraper::Html::parse_document(html);
        let headings = selector("h2, h3")?;
        let base = base_url(BASE)?;

        Ok(doc
            .select(&headings)
            .take(MAX_TAGS)
            .map(|h| {
                let href = ancestor_href(h);
                RawItem::new(element_text(h), resolve_link(&base, href.as_deref()))
            })
            .collect())
    }
}

#[async_trait]
impl SourceProvider for BbcProvider {
    fn id(&self) -> SourceId {
        SourceId::BBC
    }

    fn categories(&self) -> Vec<String> {
        CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    fn title_bounds(&self) -> TitleBounds {
        TitleBounds::new(20, 200)
    }

    async fn fetch_raw(&self, category: Option<&str>) -> Result<Vec<RawItem>, FetchError> {
        let url = Self::page_url(category);
        tracing::info!(provider = "bbc", category = category.unwrap_or("-"), "fetching headlines");
        let html = self.loader.load(&url, "bbc").await?;
        Self::extract(&html)
    }
}
