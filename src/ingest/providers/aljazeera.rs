// src/ingest/providers/aljazeera.rs
use async_trait::async_trait;

use super::{base_url, element_text, resolve_link, selector, PageLoader};
use crate::ingest::types::{FetchError, RawItem, SourceId, SourceProvider, TitleBounds};

const BASE: &str = "https://www.aljazeera.com";
const MAX_ACCEPTED: usize = 25;

/// Link texts that belong to site chrome, not stories.
const NAV_LABELS: [&str; 4] = ["skip to", "home page", "search", "menu"];

pub const CATEGORIES: [&str; 5] = [
    "news",
    "economy",
    "opinion",
    "human-rights",
    "science-and-technology",
];

pub struct AlJazeeraProvider {
    loader: PageLoader,
}

impl AlJazeeraProvider {
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
            Some(c) => format!("{BASE}/{c}/"),
            None => format!("{BASE}/"),
        }
    }

    pub fn extract(html: &str) -> Result<Vec<RawItem>, FetchError> {
        let doc = scraper::Html::parse_document(html);
        let links = selector("a[href]")?;
        let base = base_url(BASE)?;

        Ok(doc
            .select(&links)
            .map(|a| (element_text(a), a.value().attr("href")))
            .filter(|(title, _)| {
                let lower = title.to_lowercase();
                !NAV_LABELS.iter().any(|skip| lower.contains(skip))
            })
            .map(|(title, href)| RawItem::new(title, resolve_link(&base, href)))
            .collect())
    }
}

#[async_trait]
impl SourceProvider for AlJazeeraProvider {
    fn id(&self) -> SourceId {
        SourceId::ALJAZEERA
    }

    fn categories(&self) -> Vec<String> {
        CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    fn title_bounds(&self) -> TitleBounds {
        TitleBounds::new(20, 200)
    }

    fn max_candidates(&self) -> Option<usize> {
        Some(MAX_ACCEPTED)
    }

    async fn fetch_raw(&self, category: Option<&str>) -> Result<Vec<RawItem>, FetchError> {
        let url = Self::page_url(category);
        tracing::info!(provider = "aljazeera", category = category.unwrap_or("-"), "fetching headlines");
        let html = self.loader.load(&url, "aljazeera").await?;
        Self::extract(&html)
    }
}
