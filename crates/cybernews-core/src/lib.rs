//! Shared domain types, configuration, and collaborator interfaces for the
//! security-news aggregator.

pub mod app_config;
pub mod config;
pub mod sources;
pub mod store;
pub mod text;
pub mod types;
pub mod window;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use sources::{load_sources, SourcesFile};
pub use store::{ArticleStore, MemoryArticleStore, StoreError};
pub use types::{Article, NewArticle, RawFeedItem, Severity, SourceConfig, SourceKind};
pub use window::parse_since_to_hours;

/// Maximum stored title length, in characters.
pub const MAX_TITLE_CHARS: usize = 400;

/// Maximum stored content length, in characters.
pub const MAX_CONTENT_CHARS: usize = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),

    #[error("invalid window \"{0}\": expected a value such as 24h or 7d")]
    InvalidWindow(String),
}
