// tests/providers_html.rs
use std::time::Duration;

use headline_aggregator::ingest::fetcher::SourceFetcher;
use headline_aggregator::ingest::providers::{
    AlJazeeraProvider, BbcProvider, CnnProvider, NprProvider,
};
use headline_aggregator::{SourceId, SourceProvider};

const BBC_HTML: &str = include_str!("fixtures/bbc_world.html");
const CNN_HTML: &str = include_str!("fixtures/cnn_world.html");
const ALJ_HTML: &str = include_str!("fixtures/aljazeera_news.html");
const NPR_HTML: &str = include_str!("fixtures/npr_world.html");
const NPR_FALLBACK_HTML: &str = include_str!("fixtures/npr_fallback.html");

async fn fetch(p: &dyn SourceProvider) -> Vec<(String, String)> {
    let r = SourceFetcher::new()
        .fetch(p, Some("world"), Duration::from_secs(5))
        .await
        .expect("fixture fetch ok");
    assert!(r.succeeded);
    assert!(r.candidates.iter().all(|c| c.source == p.id()));
    r.candidates.into_iter().map(|c| (c.title, c.url)).collect()
}

#[tokio::test]
async fn bbc_headings_with_wrapping_links() {
    let got = fetch(&BbcProvider::from_fixture(BBC_HTML)).await;
    assert_eq!(
        got,
        vec![
            (
                "Leaders gather for emergency climate summit in Geneva".to_string(),
                "https://www.bbc.com/news/articles/c1".to_string()
            ),
            (
                "Historic peace deal signed after decade of talks".to_string(),
                "https://www.bbc.com/news/articles/c2".to_string()
            ),
            (
                "Markets steady as central banks hold interest rates".to_string(),
                String::new()
            ),
        ]
    );
}

#[tokio::test]
async fn cnn_headline_spans() {
    let got = fetch(&CnnProvider::from_fixture(CNN_HTML)).await;
    let titles: Vec<_> = got.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Flood relief convoys reach stranded villages",
            "Chip exports & tariffs dominate trade talks",
            "Opinion: What the election means for the region",
        ]
    );
    assert_eq!(
        got[0].1,
        "https://edition.cnn.com/2025/01/10/world/flood-relief/index.html"
    );
    assert_eq!(got[2].1, "");
}

#[tokio::test]
async fn aljazeera_skips_navigation_links() {
    let got = fetch(&AlJazeeraProvider::from_fixture(ALJ_HTML)).await;
    assert_eq!(
        got,
        vec![
            (
                "Ceasefire talks resume as aid trucks wait at border".to_string(),
                "https://www.aljazeera.com/news/2025/1/10/ceasefire-talks-resume".to_string()
            ),
            (
                "Oil prices climb after supply cut announcement".to_string(),
                "https://www.aljazeera.com/economy/2025/1/10/oil".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn aljazeera_caps_accepted_candidates() {
    let mut html = String::from("<html><body>");
    for i in 0..40 {
        html.push_str(&format!(
            r#"<a href="/news/{i}">Story number {i} about regional developments</a>"#
        ));
    }
    html.push_str("</body></html>");
    let got = fetch(&AlJazeeraProvider::from_fixture(&html)).await;
    assert_eq!(got.len(), 25);
}

#[tokio::test]
async fn npr_article_links_prefer_inner_heading() {
    let got = fetch(&NprProvider::from_fixture(NPR_HTML)).await;
    let titles: Vec<_> = got.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Rescue teams search rubble after quake",
            "New vaccine trial shows strong results",
            "Scientists map deep ocean currents",
        ]
    );
    assert_eq!(
        got[0].1,
        "https://www.npr.org/2025/01/10/article/nx-s1-1/rescue-teams"
    );
}

#[tokio::test]
async fn npr_falls_back_to_headings() {
    let got = fetch(&NprProvider::from_fixture(NPR_FALLBACK_HTML)).await;
    assert_eq!(
        got,
        vec![
            (
                "Glaciers retreat faster than forecast".to_string(),
                "https://www.npr.org/sections/world/story-one".to_string()
            ),
            ("Heading without any link at all here".to_string(), String::new()),
        ]
    );
}

#[test]
fn page_urls_follow_category() {
    assert_eq!(
        BbcProvider::page_url(Some("technology")),
        "https://www.bbc.com/news/technology"
    );
    assert_eq!(CnnProvider::page_url(Some("asia")), "https://edition.cnn.com/asia");
    assert_eq!(
        AlJazeeraProvider::page_url(Some("economy")),
        "https://www.aljazeera.com/economy/"
    );
    assert_eq!(
        NprProvider::page_url(Some("science")),
        "https://www.npr.org/sections/science/"
    );
}

#[test]
fn builtin_ids_and_rotation_lists() {
    let client = reqwest::Client::new();
    let bbc = BbcProvider::new(client.clone());
    let cnn = CnnProvider::new(client);
    assert_eq!(bbc.id(), SourceId::BBC);
    assert_eq!(bbc.categories().len(), 5);
    assert_eq!(cnn.categories().len(), 8);
    assert_eq!(cnn.categories()[0], "world");
}

#[tokio::test]
async fn escaped_markup_in_headlines_is_kept_literally() {
    let html = r#"<html><body>
      <a href="/news/articles/c9"><h2>Inflation &lt;2% for the first time &gt; in a decade</h2></a>
      <h3>AT&amp;amp;T &amp; Verizon &#8220;split&#8221; the spectrum auction</h3>
    </body></html>"#;
    let got = fetch(&BbcProvider::from_fixture(html)).await;
    let titles: Vec<_> = got.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Inflation <2% for the first time > in a decade",
            "AT&amp;T & Verizon \"split\" the spectrum auction",
        ]
    );
    assert_eq!(got[0].1, "https://www.bbc.com/news/articles/c9");
}

#[tokio::test]
async fn cnn_keeps_long_headlines() {
    let long = format!("Live updates: {}", "negotiators return to the table ".repeat(10));
    let html = format!(
        r#"<html><body><span class="container__headline-text">{long}</span><span class="container__headline-text">Too short</span></body></html>"#
    );
    let got = fetch(&CnnProvider::from_fixture(&html)).await;
    assert_eq!(got.len(), 1);
    assert!(got[0].0.chars().count() > 300);
}
