//! Enrichment pass against the in-memory store.

use chrono::{Duration, Utc};

use cybernews_core::{ArticleStore, MemoryArticleStore, NewArticle, Severity};
use cybernews_enrich::{enrich_window, Classifier, ExtractiveSummarizer};

fn new_article(url: &str, title: &str, content: &str, hours_ago: Option<i64>) -> NewArticle {
    NewArticle {
        source: "Test".to_string(),
        domain: "news.example.com".to_string(),
        title: title.to_string(),
        url: url.to_string(),
        published_at: hours_ago.map(|h| Utc::now() - Duration::hours(h)),
        content: Some(content.to_string()),
        dedupe_key: url.to_string(),
    }
}

async fn seeded_store() -> MemoryArticleStore {
    let store = MemoryArticleStore::new();
    let rows = [
        new_article(
            "https://news.example.com/1",
            "CVE-2024-3400 actively exploited",
            "Attackers exploit the firewall bug. Vendors shipped a hotfix.",
            Some(2),
        ),
        new_article(
            "https://news.example.com/2",
            "Phishing kit targets banks",
            "Credential theft through fake login pages.",
            None,
        ),
        new_article(
            "https://news.example.com/3",
            "Old ransomware story",
            "Encryption everywhere.",
            Some(72),
        ),
        new_article("https://news.example.com/4", "   ", "No usable title.", Some(1)),
    ];
    for row in rows {
        store.insert(row).await.expect("insert");
    }
    store
}

#[tokio::test]
async fn enriches_window_and_skips_old_articles() {
    let store = seeded_store().await;
    let since = Utc::now() - Duration::hours(24);

    let report = enrich_window(
        &store,
        &Classifier::default(),
        &ExtractiveSummarizer::default(),
        since,
        4,
    )
    .await
    .expect("enrich_window");

    assert_eq!(report.considered, 3);
    assert_eq!(report.enriched, 2);
    assert_eq!(report.failed, 1);

    let all = store.all();
    assert_eq!(all[0].severity, Some(Severity::Alta));
    assert_eq!(all[0].category.as_deref(), Some("vulnerabilidades"));
    assert_eq!(all[1].category.as_deref(), Some("phishing"));
    assert!(all[2].summary.is_none(), "out-of-window article untouched");
    assert!(all[3].category.is_none(), "blank title left unenriched");
}

#[tokio::test]
async fn rerun_keeps_summaries_and_recomputes_classification() {
    let store = seeded_store().await;
    let since = Utc::now() - Duration::hours(24);
    let classifier = Classifier::default();
    let summarizer = ExtractiveSummarizer::default();

    enrich_window(&store, &classifier, &summarizer, since, 1)
        .await
        .expect("first pass");
    let first = store.all();

    let mut edited = first[1].clone();
    edited.summary = Some("hand-written".to_string());
    edited.category = Some("stale".to_string());
    store.update(&edited).await.expect("update");

    enrich_window(&store, &classifier, &summarizer, since, 1)
        .await
        .expect("second pass");
    let second = store.all();

    assert_eq!(second[0].summary, first[0].summary);
    assert_eq!(second[1].summary.as_deref(), Some("hand-written"));
    assert_eq!(second[1].category.as_deref(), Some("phishing"));
}
