//! Enrichment pass over the active window.

use chrono::{DateTime, Utc};
use cybernews_core::{Article, ArticleStore};
use futures::stream::{self, StreamExt};

use crate::classifier::Classifier;
use crate::error::EnrichError;
use crate::summarizer::Summarizer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Articles returned by the window query.
    pub considered: usize,
    pub enriched: usize,
    pub failed: usize,
}

/// Compute the enriched form of `article`.
///
/// Category, severity, and SOC action are always recomputed. The summary is
/// only generated when absent, from the content or, lacking content, the
/// title.
///
/// # Errors
///
/// Returns [`EnrichError::BlankTitle`] when the title is empty or whitespace.
pub fn enrich_article<Z: Summarizer + ?Sized>(
    classifier: &Classifier,
    summarizer: &Z,
    article: &Article,
) -> Result<Article, EnrichError> {
    if article.title.trim().is_empty() {
        return Err(EnrichError::BlankTitle { id: article.id });
    }

    let content = article.content.as_deref().filter(|c| !c.trim().is_empty());
    let body = content.or(article.summary.as_deref()).unwrap_or_default();
    let classification = classifier.classify(&article.title, body);

    let mut enriched = article.clone();
    if enriched.summary.is_none() {
        let summary = summarizer.summarize(content.unwrap_or(&article.title));
        enriched.summary = (!summary.is_empty()).then_some(summary);
    }
    enriched.category = Some(classification.category.to_string());
    enriched.severity = Some(classification.severity);
    enriched.soc_action = Some(classification.soc_action);
    Ok(enriched)
}

/// Enrich every article in the window starting at `since`, writing each back
/// with one update. At most `max_concurrent` articles are in flight.
///
/// # Errors
///
/// Only the window query itself is fatal. Per-article failures are logged
/// and counted in [`EnrichReport::failed`].
pub async fn enrich_window<S, Z>(
    store: &S,
    classifier: &Classifier,
    summarizer: &Z,
    since: DateTime<Utc>,
    max_concurrent: usize,
) -> Result<EnrichReport, EnrichError>
where
    S: ArticleStore,
    Z: Summarizer + ?Sized,
{
    let articles = store.query_window(since).await?;
    let considered = articles.len();

    let outcomes: Vec<bool> = stream::iter(articles)
        .map(|article| async move {
            let result = match enrich_article(classifier, summarizer, &article) {
                Ok(enriched) => store.update(&enriched).await.map_err(EnrichError::from),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(id = article.id, url = %article.url, error = %e, "enrichment failed");
                    false
                }
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let enriched = outcomes.iter().filter(|ok| **ok).count();
    let report = EnrichReport {
        considered,
        enriched,
        failed: considered - enriched,
    };
    tracing::info!(
        considered = report.considered,
        enriched = report.enriched,
        failed = report.failed,
        "enrichment pass complete"
    );
    Ok(report)
}
