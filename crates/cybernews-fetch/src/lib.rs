//! Polite HTTP fetching for configured news sources.
//!
//! Provides the fetch client, the per-domain rate limiter, the per-origin
//! robots.txt cache, and URL canonicalization used for deduplication.

pub mod client;
pub mod error;
pub mod normalize;
pub mod rate_limit;
pub mod robots;

pub use client::{FetchClient, FetchResponse};
pub use error::FetchError;
pub use normalize::{canonicalize, dedupe_key, domain_of, origin_of};
pub use rate_limit::DomainRateLimiter;
pub use robots::RobotsCache;
