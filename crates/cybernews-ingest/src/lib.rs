//! Ingestion pass: fetch each configured source politely, turn its body into
//! candidate items, and insert new articles keyed by canonical URL.

pub mod error;
pub mod feed;
pub mod html;
pub mod pipeline;

pub use error::{IngestError, ParseError};
pub use feed::{detect_format, parse_feed, FeedFormat};
pub use html::extract_links;
pub use pipeline::{
    ingest_source, ingest_sources, prepare_article, IngestContext, IngestReport, SourceOutcome,
};
