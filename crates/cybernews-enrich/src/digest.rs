//! Digest preparation: window ordering, top-5 ranking, and trending terms.
//!
//! Renderers receive a [`Digest`] and perform no selection of their own.

use std::collections::HashMap;

use cybernews_core::text::clean_whitespace;
use cybernews_core::{Article, Severity};

pub const DEFAULT_REPORT_LIMIT: usize = 25;
pub const MAX_REPORT_LIMIT: usize = 200;
pub const TOP_ARTICLES: usize = 5;
pub const TRENDING_TERMS: usize = 10;
pub const MIN_TERM_CHARS: usize = 4;

const TERM_PUNCTUATION: &[char] = &[
    '.', ',', ':', ';', '(', ')', '[', ']', '{', '}', '\'', '"', '!', '?',
];

const STOPWORDS: &[&str] = &[
    "with", "this", "that", "from", "have", "will", "their", "they", "into", "over", "more",
    "after", "than", "your", "what", "when", "been", "using", "says", "said", "report",
    "reports", "today", "para", "como", "esta", "este", "sobre", "entre", "pero", "porque",
];

/// Order by `published_at` descending with undated articles last, then by id
/// descending, and keep the first `limit`.
#[must_use]
pub fn select_window(mut articles: Vec<Article>, limit: usize) -> Vec<Article> {
    articles.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x).then(b.id.cmp(&a.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    });
    articles.truncate(limit);
    articles
}

/// The five highest-severity articles, most recent first within a tier.
/// Undated articles rank as the oldest.
#[must_use]
pub fn top_five(articles: &[Article]) -> Vec<Article> {
    let mut ranked: Vec<&Article> = articles.iter().collect();
    ranked.sort_by(|a, b| {
        Severity::rank(b.severity)
            .cmp(&Severity::rank(a.severity))
            .then(b.published_at.cmp(&a.published_at))
    });
    ranked.into_iter().take(TOP_ARTICLES).cloned().collect()
}

/// Most frequent title words of at least four characters, stopwords removed,
/// with counts. Ties keep first-seen order.
#[must_use]
pub fn trending_terms<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for title in titles {
        let lowered = clean_whitespace(title).to_lowercase();
        for raw in lowered.split_whitespace() {
            let term = raw.trim_matches(TERM_PUNCTUATION);
            if term.chars().count() < MIN_TERM_CHARS || STOPWORDS.contains(&term) {
                continue;
            }
            match index.get(term) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(term.to_string(), counts.len());
                    counts.push((term.to_string(), 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TRENDING_TERMS);
    counts
}

/// Everything a report renderer needs.
#[derive(Debug, Clone)]
pub struct Digest {
    pub articles: Vec<Article>,
    pub top: Vec<Article>,
    pub trending: Vec<(String, usize)>,
}

impl Digest {
    /// Select and rank the windowed articles. `limit` is clamped to
    /// `1..=MAX_REPORT_LIMIT`.
    #[must_use]
    pub fn build(articles: Vec<Article>, limit: usize) -> Self {
        let articles = select_window(articles, limit.clamp(1, MAX_REPORT_LIMIT));
        let top = top_five(&articles);
        let trending = trending_terms(articles.iter().map(|a| a.title.as_str()));
        Self {
            articles,
            top,
            trending,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn article(id: i64, hours_ago: Option<i64>, severity: Option<Severity>) -> Article {
        Article {
            id,
            source: "s".to_string(),
            domain: "example.com".to_string(),
            title: format!("Article {id}"),
            url: format!("https://example.com/{id}"),
            published_at: hours_ago.map(|h| base() - Duration::hours(h)),
            content: None,
            summary: None,
            category: None,
            severity,
            soc_action: None,
            dedupe_key: id.to_string(),
        }
    }

    fn ids(articles: &[Article]) -> Vec<i64> {
        articles.iter().map(|a| a.id).collect()
    }

    #[test]
    fn window_orders_newest_first_with_undated_last() {
        let articles = vec![
            article(1, None, None),
            article(2, Some(5), None),
            article(3, Some(1), None),
            article(4, None, None),
            article(5, Some(5), None),
        ];
        assert_eq!(ids(&select_window(articles, 25)), vec![3, 5, 2, 4, 1]);
    }

    #[test]
    fn window_respects_limit() {
        let articles = (1..=30).map(|i| article(i, Some(i), None)).collect();
        let selected = select_window(articles, 25);
        assert_eq!(selected.len(), 25);
        assert_eq!(selected[0].id, 1);
    }

    #[test]
    fn top_five_ranks_severity_then_recency() {
        let articles = vec![
            article(1, Some(1), Some(Severity::Baja)),
            article(2, Some(10), Some(Severity::Alta)),
            article(3, Some(2), Some(Severity::Alta)),
            article(4, None, Some(Severity::Alta)),
            article(5, Some(1), None),
            article(6, Some(3), Some(Severity::Media)),
            article(7, Some(0), Some(Severity::Baja)),
        ];
        assert_eq!(ids(&top_five(&articles)), vec![3, 2, 4, 6, 7]);
    }

    #[test]
    fn trending_terms_filter_and_count() {
        let titles = [
            "Ransomware hits hospital (again)",
            "New ransomware strain: LockBit?",
            "Report says hospital breach was ransomware",
            "What the CVE means",
        ];
        let terms = trending_terms(titles);
        assert_eq!(terms[0], ("ransomware".to_string(), 3));
        assert_eq!(terms[1], ("hospital".to_string(), 2));
        assert!(terms.iter().all(|(t, _)| t.chars().count() >= MIN_TERM_CHARS));
        assert!(!terms.iter().any(|(t, _)| t == "says" || t == "report" || t == "what"));
        assert!(terms.iter().any(|(t, _)| t == "again"));
        assert!(terms.iter().any(|(t, _)| t == "lockbit"));
    }

    #[test]
    fn trending_terms_keep_at_most_ten() {
        let title = "alpha bravo charlie delta echo foxtrot hotel india juliet kilo lima mike";
        assert_eq!(trending_terms([title]).len(), TRENDING_TERMS);
    }

    #[test]
    fn digest_clamps_limit() {
        let articles: Vec<Article> = (1..=3).map(|i| article(i, Some(i), None)).collect();
        let digest = Digest::build(articles, 0);
        assert_eq!(digest.articles.len(), 1);
        assert_eq!(digest.top.len(), 1);
    }
}
