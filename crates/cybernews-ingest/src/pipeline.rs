//! Ingestion pass orchestration.
//!
//! Each source goes through rate limiting, a robots.txt check, one fetch, and
//! parsing; every resulting item that survives normalization is inserted
//! unless its canonical URL is already stored. A failing source is logged and
//! reported, never propagated.

use cybernews_core::text::{html_to_text, truncate_chars};
use cybernews_core::{
    ArticleStore, NewArticle, RawFeedItem, SourceConfig, SourceKind, StoreError,
    MAX_CONTENT_CHARS, MAX_TITLE_CHARS,
};
use cybernews_fetch::{
    canonicalize, dedupe_key, domain_of, DomainRateLimiter, FetchClient, RobotsCache,
};
use futures::stream::{self, StreamExt};

use crate::error::IngestError;
use crate::feed::parse_feed;
use crate::html::extract_links;

/// Collaborators shared by every source in one run.
pub struct IngestContext<'a, S> {
    pub client: &'a FetchClient,
    pub limiter: &'a DomainRateLimiter,
    pub robots: &'a RobotsCache,
    pub store: &'a S,
}

/// What happened to one source.
#[derive(Debug)]
pub enum SourceOutcome {
    Ingested { items: usize, inserted: usize },
    /// robots.txt disallows the source URL; nothing was fetched.
    Blocked,
    Failed(IngestError),
}

/// Per-source outcomes in configuration order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub sources: Vec<(SourceConfig, SourceOutcome)>,
}

impl IngestReport {
    /// Articles inserted across all sources.
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.sources
            .iter()
            .map(|(_, outcome)| match outcome {
                SourceOutcome::Ingested { inserted, .. } => *inserted,
                _ => 0,
            })
            .sum()
    }

    /// Articles inserted from sources of `kind`.
    #[must_use]
    pub fn inserted_for(&self, kind: SourceKind) -> usize {
        self.sources
            .iter()
            .filter(|(source, _)| source.kind == kind)
            .map(|(_, outcome)| match outcome {
                SourceOutcome::Ingested { inserted, .. } => *inserted,
                _ => 0,
            })
            .sum()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SourceOutcome::Failed(_)))
    }

    #[must_use]
    pub fn blocked(&self) -> usize {
        self.count(|o| matches!(o, SourceOutcome::Blocked))
    }

    fn count(&self, pred: impl Fn(&SourceOutcome) -> bool) -> usize {
        self.sources.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Normalize one raw item into an insertable article.
///
/// Returns `None` when the title or link is empty after cleanup. The dedupe
/// key is derived from the full cleaned title before truncation.
#[must_use]
pub fn prepare_article(source: &SourceConfig, item: &RawFeedItem) -> Option<NewArticle> {
    let title = html_to_text(&item.title);
    let link = item.link.trim();
    if title.is_empty() || link.is_empty() {
        return None;
    }

    let url = canonicalize(link);
    let domain = domain_of(&url);
    let date_iso = item
        .published_at
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string());
    let key = dedupe_key(&title, &domain, date_iso.as_deref());

    let content = truncate_chars(&html_to_text(&item.body), MAX_CONTENT_CHARS);

    Some(NewArticle {
        source: source.name.clone(),
        domain,
        title: truncate_chars(&title, MAX_TITLE_CHARS),
        url,
        published_at: item.published_at,
        content: (!content.is_empty()).then_some(content),
        dedupe_key: key,
    })
}

/// Returns `true` when the article was newly inserted.
async fn store_if_absent<S: ArticleStore>(
    store: &S,
    article: NewArticle,
) -> Result<bool, StoreError> {
    if store.find_by_url(&article.url).await?.is_some() {
        return Ok(false);
    }
    Ok(store.insert(article).await?.is_some())
}

/// Ingest a single source.
///
/// Per-item store failures are logged and skipped so one bad row cannot sink
/// the rest of the feed.
///
/// # Errors
///
/// Returns [`IngestError::Fetch`] when the source cannot be retrieved and
/// [`IngestError::Parse`] when its body cannot be parsed.
pub async fn ingest_source<S: ArticleStore>(
    ctx: &IngestContext<'_, S>,
    source: &SourceConfig,
) -> Result<SourceOutcome, IngestError> {
    ctx.limiter.wait_for(&source.url).await;

    if !ctx.robots.is_allowed(&source.url).await {
        tracing::warn!(source = %source.name, url = %source.url, "blocked by robots.txt, skipping");
        return Ok(SourceOutcome::Blocked);
    }

    let response = ctx.client.get(&source.url).await?;
    if response.final_url != source.url {
        tracing::debug!(source = %source.name, final_url = %response.final_url, "followed redirect");
    }
    let raw_items = match source.kind {
        SourceKind::Rss => parse_feed(&response.body)?,
        SourceKind::Html => extract_links(
            &response.body,
            &source.url,
            source.link_selector_or_default(),
        )?,
    };

    let mut inserted = 0usize;
    for article in raw_items.iter().filter_map(|item| prepare_article(source, item)) {
        let url = article.url.clone();
        match store_if_absent(ctx.store, article).await {
            Ok(true) => inserted += 1,
            Ok(false) => tracing::trace!(url = %url, "already stored"),
            Err(e) => tracing::warn!(source = %source.name, url = %url, error = %e, "store failed"),
        }
    }

    tracing::info!(
        source = %source.name,
        kind = %source.kind,
        items = raw_items.len(),
        inserted,
        "source ingested"
    );

    Ok(SourceOutcome::Ingested {
        items: raw_items.len(),
        inserted,
    })
}

/// Ingest every source with at most `max_concurrent` in flight.
///
/// Outcomes are reported in the order of `sources` regardless of completion
/// order. Failures are logged and recorded, never returned.
pub async fn ingest_sources<S: ArticleStore>(
    ctx: &IngestContext<'_, S>,
    sources: &[SourceConfig],
    max_concurrent: usize,
) -> IngestReport {
    let outcomes: Vec<SourceOutcome> = stream::iter(sources)
        .map(|source| async move {
            match ingest_source(ctx, source).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(source = %source.name, url = %source.url, error = %e, "source failed");
                    SourceOutcome::Failed(e)
                }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    IngestReport {
        sources: sources.iter().cloned().zip(outcomes).collect(),
    }
}
