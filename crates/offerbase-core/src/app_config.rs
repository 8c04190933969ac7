use std::path::PathBuf;

/// Application configuration, loaded from environment variables by
/// [`crate::config::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    /// Connection string for the document store. Optional because the
    /// enrichment path runs without a database.
    pub database_url: Option<String>,
    pub log_level: String,
    /// Base directory searched for `*.json` / `*.csv` sample files.
    pub data_dir: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// API key for the chat-completion provider; required only by `enrich`.
    pub groq_api_key: Option<String>,
    pub enrich_base_url: String,
    /// Models tried in order; rotation advances on rate-limit errors.
    pub enrich_models: Vec<String>,
    pub enrich_max_retries: u32,
    pub enrich_retry_delay_ms: u64,
    /// Pause between consecutive records in a batch.
    pub enrich_pause_ms: u64,
    pub enrich_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "groq_api_key",
                &self.groq_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("enrich_base_url", &self.enrich_base_url)
            .field("enrich_models", &self.enrich_models)
            .field("enrich_max_retries", &self.enrich_max_retries)
            .field("enrich_retry_delay_ms", &self.enrich_retry_delay_ms)
            .field("enrich_pause_ms", &self.enrich_pause_ms)
            .field("enrich_timeout_secs", &self.enrich_timeout_secs)
            .finish()
    }
}
