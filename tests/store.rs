// tests/store.rs
use chrono::{Duration as ChronoDuration, Local, Utc};

use headline_aggregator::sentiment::SentimentLabel;
use headline_aggregator::{ArticleStore, BatchSink, Candidate, HistoryProvider, SourceId};

fn c(t: &str, url: &str) -> Candidate {
    Candidate::new(SourceId::NPR, t, url)
}

#[tokio::test]
async fn bulk_insert_enforces_url_uniqueness() {
    let store = ArticleStore::default();
    let first = vec![c("One", "https://x/1"), c("Two", "https://x/2")];
    let r1 = store.insert_bulk(&first).await.unwrap();
    assert_eq!((r1.saved, r1.duplicate), (2, 0));

    // Different title, same URL: still a duplicate for the sink.
    let second = vec![c("One (updated)", "https://x/1"), c("Three", "https://x/3")];
    let r2 = store.insert_bulk(&second).await.unwrap();
    assert_eq!((r2.saved, r2.duplicate), (1, 1));
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn history_is_scoped_to_today() {
    let store = ArticleStore::default();
    let mut old = c("Yesterday's story", "https://x/old");
    old.fetched_at = Utc::now() - ChronoDuration::days(2);
    store.insert_bulk(&[old, c("Today's story", "https://x/new")]).await.unwrap();

    let today = store.titles_for_today().await.unwrap();
    assert!(today.contains("Today's story"));
    assert!(!today.contains("Yesterday's story"));

    let two_days_ago = (Local::now() - ChronoDuration::days(2)).date_naive();
    let then = store.titles_for_day(two_days_ago).unwrap();
    assert!(then.contains("Yesterday's story"));
}

#[tokio::test]
async fn fresh_store_has_empty_history() {
    let store = ArticleStore::default();
    assert!(store.is_empty());
    assert!(store.titles_for_today().await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_drops_rows_and_urls() {
    let store = ArticleStore::default();
    store.insert_bulk(&[c("One", "https://x/1")]).await.unwrap();
    store.clear().unwrap();
    assert!(store.is_empty());
    let r = store.insert_bulk(&[c("One", "https://x/1")]).await.unwrap();
    assert_eq!(r.saved, 1);
}

#[tokio::test]
async fn stored_rows_carry_sentiment_label() {
    let store = ArticleStore::default();
    let scored = |t: &str, url: &str, v: f32| {
        let mut x = c(t, url);
        x.sentiment = Some(v);
        x
    };
    let batch = vec![
        scored("Deadly flood kills dozens", "https://x/a", -0.8),
        scored("Markets open flat", "https://x/b", 0.05),
        scored("Rescue brings joy to town", "https://x/c", 0.4),
    ];
    store.insert_bulk(&batch).await.unwrap();

    let labels: Vec<_> = store
        .snapshot_last_n(3)
        .unwrap()
        .into_iter()
        .map(|r| r.sentiment_label)
        .collect();
    assert_eq!(
        labels,
        vec![
            Some(SentimentLabel::Negative),
            Some(SentimentLabel::Neutral),
            Some(SentimentLabel::Positive),
        ]
    );
}

#[tokio::test]
async fn evicted_urls_can_be_saved_again() {
    let store = ArticleStore::with_capacity(2);
    store
        .insert_bulk(&[c("One", "https://x/1"), c("Two", "https://x/2"), c("Three", "https://x/3")])
        .await
        .unwrap();
    assert_eq!(store.len(), 2);

    let r = store.insert_bulk(&[c("One", "https://x/1"), c("Three", "https://x/3")]).await.unwrap();
    assert_eq!((r.saved, r.duplicate), (1, 1));
}
