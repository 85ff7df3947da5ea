use cybernews_core::StoreError;
use cybernews_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unrecognized feed root element <{0}>")]
    UnrecognizedRoot(String),

    #[error("document contains no elements")]
    Empty,

    #[error("invalid link selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },
}

/// Failure of one source; never aborts the run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}
