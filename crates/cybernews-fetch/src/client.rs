//! HTTP client used for feeds, listing pages, and robots.txt.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Client;

use crate::error::FetchError;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// A successful response with its body already read.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    /// URL after following redirects.
    pub final_url: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// Thin wrapper over `reqwest::Client` that sends a fixed `User-Agent`,
/// applies a request timeout, follows redirects, and turns 4xx/5xx responses
/// into [`FetchError::UnexpectedStatus`].
///
/// Cloning is cheap and shares the underlying connection pool. No retries
/// happen here; a failed request is reported to the caller once.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    user_agent: String,
}

impl FetchClient {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_owned(),
        })
    }

    /// The identity string sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Issues a GET request and reads the body as text.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `url` is not an absolute URL.
    /// - [`FetchError::UnexpectedStatus`] if the final response is 4xx or 5xx.
    /// - [`FetchError::Http`] on connection, TLS, timeout, or body read failure.
    pub async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        tracing::debug!(url, "GET");
        let response = self.client.get(parsed).send().await?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(FetchResponse {
            status: status.as_u16(),
            final_url,
            headers,
            body,
        })
    }
}
