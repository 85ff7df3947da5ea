//! Enrichment of stored articles (category, severity, SOC action, summary)
//! and preparation of the digest handed to report rendering.

pub mod classifier;
pub mod digest;
pub mod error;
pub mod pipeline;
pub mod summarizer;

pub use classifier::{categorize, soc_action, Classification, Classifier, SeverityRules};
pub use digest::{select_window, top_five, trending_terms, Digest};
pub use error::EnrichError;
pub use pipeline::{enrich_article, enrich_window, EnrichReport};
pub use summarizer::{ExtractiveSummarizer, Summarizer};
