//! Storage collaborator interface and an in-memory implementation.

use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{Article, NewArticle};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("article {id} not found")]
    NotFound { id: i64 },

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Repository over persisted articles.
///
/// `url` is the uniqueness key: `insert` must not create a second row for a
/// URL already present, and returns `None` in that case.
pub trait ArticleStore: Send + Sync {
    fn find_by_url(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Option<Article>, StoreError>> + Send;

    fn insert(
        &self,
        article: NewArticle,
    ) -> impl Future<Output = Result<Option<i64>, StoreError>> + Send;

    /// Articles published at or after `since`, plus every article without a
    /// publication timestamp.
    fn query_window(
        &self,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Article>, StoreError>> + Send;

    /// Overwrite the enrichment fields of an existing article.
    fn update(&self, article: &Article) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Process-local store backed by a `Vec`. Ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: Mutex<Vec<Article>>,
}

impl MemoryArticleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored article in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Article> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Article>> {
        // A poisoned lock only means another test thread panicked mid-write;
        // the Vec itself is still usable.
        self.articles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ArticleStore for MemoryArticleStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, StoreError> {
        Ok(self.lock().iter().find(|a| a.url == url).cloned())
    }

    async fn insert(&self, article: NewArticle) -> Result<Option<i64>, StoreError> {
        let mut articles = self.lock();
        if articles.iter().any(|a| a.url == article.url) {
            return Ok(None);
        }
        let id = i64::try_from(articles.len())
            .map_err(|e| StoreError::Backend(Box::new(e)))?
            + 1;
        articles.push(article.into_article(id));
        Ok(Some(id))
    }

    async fn query_window(&self, since: DateTime<Utc>) -> Result<Vec<Article>, StoreError> {
        Ok(self
            .lock()
            .iter()
            .filter(|a| a.published_at.is_none_or(|p| p >= since))
            .cloned()
            .collect())
    }

    async fn update(&self, article: &Article) -> Result<(), StoreError> {
        let mut articles = self.lock();
        let stored = articles
            .iter_mut()
            .find(|a| a.id == article.id)
            .ok_or(StoreError::NotFound { id: article.id })?;
        stored.summary.clone_from(&article.summary);
        stored.category.clone_from(&article.category);
        stored.severity = article.severity;
        stored.soc_action.clone_from(&article.soc_action);
        Ok(())
    }
}
