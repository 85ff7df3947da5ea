//! `articles` table access and the Postgres [`ArticleStore`].

use chrono::{DateTime, Utc};
use cybernews_core::{Article, ArticleStore, NewArticle, Severity, StoreError};
use sqlx::PgPool;

use crate::DbError;

const SELECT_COLUMNS: &str = "SELECT id, source, domain, title, url, published_at, content, \
                              summary, category, severity, soc_action, dedupe_key \
                              FROM articles";

/// A row from the `articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub source: String,
    pub domain: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub soc_action: Option<String>,
    pub dedupe_key: String,
}

impl TryFrom<ArticleRow> for Article {
    type Error = StoreError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let severity = row
            .severity
            .as_deref()
            .map(str::parse::<Severity>)
            .transpose()
            .map_err(|e| StoreError::Backend(e.into()))?;
        Ok(Article {
            id: row.id,
            source: row.source,
            domain: row.domain,
            title: row.title,
            url: row.url,
            published_at: row.published_at,
            content: row.content,
            summary: row.summary,
            category: row.category,
            severity,
            soc_action: row.soc_action,
            dedupe_key: row.dedupe_key,
        })
    }
}

fn backend(e: impl Into<DbError>) -> StoreError {
    StoreError::Backend(Box::new(e.into()))
}

fn into_articles(rows: Vec<ArticleRow>) -> Result<Vec<Article>, StoreError> {
    rows.into_iter().map(Article::try_from).collect()
}

/// [`ArticleStore`] over a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ArticleStore for PgArticleStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, StoreError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!("{SELECT_COLUMNS} WHERE url = $1"))
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.map(Article::try_from).transpose()
    }

    async fn insert(&self, article: NewArticle) -> Result<Option<i64>, StoreError> {
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO articles \
                 (source, domain, title, url, published_at, content, dedupe_key) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (url) DO NOTHING \
             RETURNING id",
        )
        .bind(&article.source)
        .bind(&article.domain)
        .bind(&article.title)
        .bind(&article.url)
        .bind(article.published_at)
        .bind(&article.content)
        .bind(&article.dedupe_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(id)
    }

    async fn query_window(&self, since: DateTime<Utc>) -> Result<Vec<Article>, StoreError> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "{SELECT_COLUMNS} WHERE published_at IS NULL OR published_at >= $1 \
             ORDER BY published_at DESC NULLS LAST, id DESC"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        into_articles(rows)
    }

    async fn update(&self, article: &Article) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE articles \
             SET summary = $2, category = $3, severity = $4, soc_action = $5, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(article.id)
        .bind(&article.summary)
        .bind(&article.category)
        .bind(article.severity.map(Severity::as_str))
        .bind(&article.soc_action)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id: article.id });
        }
        Ok(())
    }
}
