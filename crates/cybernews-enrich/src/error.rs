use cybernews_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    /// The article has nothing to classify.
    #[error("article {id} has a blank title")]
    BlankTitle { id: i64 },

    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}
