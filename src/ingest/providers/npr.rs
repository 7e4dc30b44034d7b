// src/ingest/providers/npr.rs
use async_trait::async_trait;

use super::{ancestor_href, base_url, element_text, resolve_link, selector, PageLoader};
use crate::ingest::types::{FetchError, RawItem, SourceId, SourceProvider, TitleBounds};

const BASE: &str = "https://www.npr.org";
const MAX_ITEMS: usize = 50;

pub const CATEGORIES: [&str; 5] = ["world", "business", "science", "technology", "health"];

/// NPR section pages. Primary shape: `<a href=".../article/...">` wrapping a
/// heading; older layouts only expose bare `h2` headings.
pub struct NprProvider {
    loader: PageLoader,
}

impl NprProvider {
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
        format!("{BASE}/sections/{}/", category.unwrap_or("world"))
    }

    pub fn extract(html: &str) -> Result<Vec<RawItem>, FetchError> {
        let doc = scraper::Html::parse_document(html);
        let article_links = selector(r#"a[href*="/article/"]"#)?;
        let inner_title = selector("h2, h3, span")?;
        let base = base_url(BASE)?;

        let links: Vec<_> = doc.select(&article_links).take(MAX_ITEMS).collect();
        if !links.is_empty() {
            return Ok(links
                .into_iter()
                .map(|a| {
                    let title = a
                        .select(&inner_title)
                        .next()
                        .map(element_text)
                        .unwrap_or_else(|| element_text(a));
                    RawItem::new(title, resolve_link(&base, a.value().attr("href")))
                })
                .collect());
        }

        let headings = selector("h2")?;
        Ok(doc
            .select(&headings)
            .take(MAX_ITEMS)
            .map(|h| {
                let href = ancestor_href(h);
                RawItem::new(element_text(h), resolve_link(&base, href.as_deref()))
            })
            .collect())
    }
}

#[async_trait]
impl SourceProvider for NprProvider {
    fn id(&self) -> SourceId {
        SourceId::NPR
    }

    fn categories(&self) -> Vec<String> {
        CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    fn title_bounds(&self) -> TitleBounds {
        TitleBounds::new(15, 250)
    }

    async fn fetch_raw(&self, category: Option<&str>) -> Result<Vec<RawItem>, FetchError> {
        let url = Self::page_url(category);
        tracing::info!(provider = "npr", category = category.unwrap_or("-"), "fetching headlines");
        let html = self.loader.load(&url, "npr").await?;
        Self::extract(&html)
    }
}
