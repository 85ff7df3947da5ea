use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a source's body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
    Html,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Rss => write!(f, "rss"),
            SourceKind::Html => write!(f, "html"),
        }
    }
}

/// One configured source. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
    #[serde(default)]
    pub link_selector: Option<String>,
}

impl SourceConfig {
    /// Selector applied to HTML listing pages when none is configured.
    pub const DEFAULT_LINK_SELECTOR: &'static str = "a";

    #[must_use]
    pub fn link_selector_or_default(&self) -> &str {
        self.link_selector
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(Self::DEFAULT_LINK_SELECTOR)
    }
}

/// A candidate item produced by the feed parser or the HTML link extractor.
///
/// Lives only for the duration of one ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawFeedItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub body: String,
}

/// Coarse triage tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Alta,
    Media,
    Baja,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Alta => "alta",
            Severity::Media => "media",
            Severity::Baja => "baja",
        }
    }

    /// Ranking weight used for digest ordering. Absent severity ranks `0`.
    #[must_use]
    pub fn rank(severity: Option<Self>) -> u8 {
        match severity {
            Some(Severity::Alta) => 3,
            Some(Severity::Media) => 2,
            Some(Severity::Baja) => 1,
            None => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alta" => Ok(Severity::Alta),
            "media" => Ok(Severity::Media),
            "baja" => Ok(Severity::Baja),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// A persisted article.
///
/// `url` is the canonical URL and is unique across the store. The enrichment
/// fields start out `None` and are filled by the enrichment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub source: String,
    pub domain: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub soc_action: Option<String>,
    pub dedupe_key: String,
}

/// An article ready for insertion; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub source: String,
    pub domain: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub dedupe_key: String,
}

impl NewArticle {
    /// Materialize as a stored [`Article`] with empty enrichment fields.
    #[must_use]
    pub fn into_article(self, id: i64) -> Article {
        Article {
            id,
            source: self.source,
            domain: self.domain,
            title: self.title,
            url: self.url,
            published_at: self.published_at,
            content: self.content,
            summary: None,
            category: None,
            severity: None,
            soc_action: None,
            dedupe_key: self.dedupe_key,
        }
    }
}
