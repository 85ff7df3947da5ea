use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub log_level: String,
    pub sources_path: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub per_domain_rps: f64,
    pub max_concurrent_sources: usize,
    pub summary_sentences: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("per_domain_rps", &self.per_domain_rps)
            .field("max_concurrent_sources", &self.max_concurrent_sources)
            .field("summary_sentences", &self.summary_sentences)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
