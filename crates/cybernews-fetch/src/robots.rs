//! Per-origin robots.txt cache.
//!
//! The first lookup for an origin fetches `<origin>/robots.txt` and compiles
//! it for the client's product token; concurrent lookups for the same origin
//! wait on that single fetch. A fetch or parse failure caches an allow-all
//! entry, leaving the rate limiter as the remaining politeness guard.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use texting_robots::Robot;
use tokio::sync::OnceCell;

use crate::client::FetchClient;
use crate::normalize::origin_of;

/// Compiled robots.txt for one origin.
enum RobotsRules {
    AllowAll,
    Parsed(Robot),
}

impl RobotsRules {
    fn from_parse<E: fmt::Display>(origin: &str, parsed: Result<Robot, E>) -> Self {
        match parsed {
            Ok(robot) => Self::Parsed(robot),
            Err(e) => {
                tracing::warn!(
                    origin = %origin,
                    error = %e,
                    "unparseable robots.txt, allowing all paths"
                );
                Self::AllowAll
            }
        }
    }

    fn allows(&self, url: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::Parsed(robot) => robot.allowed(&path_and_query(url)),
        }
    }
}

impl fmt::Debug for RobotsRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowAll => f.write_str("AllowAll"),
            Self::Parsed(_) => f.write_str("Parsed"),
        }
    }
}

type Entry = Arc<OnceCell<Arc<RobotsRules>>>;

#[derive(Debug)]
pub struct RobotsCache {
    client: FetchClient,
    entries: Mutex<HashMap<String, Entry>>,
}

impl RobotsCache {
    #[must_use]
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, origin: &str) -> Entry {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(origin.to_owned()).or_default())
    }

    /// Number of origins looked up so far.
    #[must_use]
    pub fn cached_origins(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether the client's User-Agent may fetch `url` under the
    /// origin's robots.txt. URLs without an http(s) origin are allowed.
    pub async fn is_allowed(&self, url: &str) -> bool {
        let Some(origin) = origin_of(url) else {
            return true;
        };

        let entry = self.entry(&origin);
        let rules = entry
            .get_or_init(|| async { Arc::new(self.load(&origin).await) })
            .await;

        rules.allows(url)
    }

    async fn load(&self, origin: &str) -> RobotsRules {
        let robots_url = format!("{origin}/robots.txt");
        match self.client.get(&robots_url).await {
            Ok(response) => {
                tracing::debug!(url = %robots_url, "robots.txt loaded");
                let agent = product_token(self.client.user_agent());
                RobotsRules::from_parse(origin, Robot::new(agent, response.body.as_bytes()))
            }
            Err(e) => {
                tracing::warn!(
                    url = %robots_url,
                    error = %e,
                    "robots.txt unavailable, allowing all paths"
                );
                RobotsRules::AllowAll
            }
        }
    }
}

/// Leading product token of a User-Agent (`Name/1.0 (+info)` becomes `Name`),
/// which is what robots.txt groups name.
fn product_token(user_agent: &str) -> &str {
    user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .find(|s| !s.is_empty())
        .unwrap_or("*")
}

fn path_and_query(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(q) => format!("{}?{q}", parsed.path()),
            None => parsed.path().to_owned(),
        },
        Err(_) => "/".to_owned(),
    }
}
