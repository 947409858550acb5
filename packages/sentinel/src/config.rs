use anyhow::{Context, Result};
use discovery::{DiscoveryConfig, RetryPolicy, SecretString};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub tavily_api_key: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub db_path: String,
    pub max_results: usize,
    pub verify_open_status: bool,
    pub cooldown: Duration,
    pub politeness_delay: Duration,
    pub schedule: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any key/value source.
    ///
    /// Credentials are optional here; commands that reach the providers
    /// check them with [`Config::discovery_config`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };

        Ok(Self {
            tavily_api_key: secret("TAVILY_API_KEY"),
            openai_api_key: secret("OPENAI_API_KEY"),
            openai_base_url: lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()),
            model: lookup("SENTINEL_MODEL")
                .unwrap_or_else(|| discovery::ai::DEFAULT_MODEL.to_string()),
            db_path: lookup("SENTINEL_DB_PATH")
                .unwrap_or_else(|| "foodie_memory.db".to_string()),
            max_results: lookup("SENTINEL_MAX_RESULTS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("SENTINEL_MAX_RESULTS must be a valid number")?,
            verify_open_status: parse_bool(
                lookup("SENTINEL_VERIFY").as_deref().unwrap_or("true"),
            )
            .context("SENTINEL_VERIFY must be true or false")?,
            cooldown: Duration::from_secs(
                lookup("SENTINEL_COOLDOWN_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse()
                    .context("SENTINEL_COOLDOWN_SECS must be a valid number")?,
            ),
            politeness_delay: Duration::from_secs(
                lookup("SENTINEL_POLITENESS_SECS")
                    .unwrap_or_else(|| "2".to_string())
                    .parse()
                    .context("SENTINEL_POLITENESS_SECS must be a valid number")?,
            ),
            schedule: lookup("SENTINEL_SCHEDULE").unwrap_or_else(|| "0 0 19 * * *".to_string()),
        })
    }

    /// Pipeline settings derived from this configuration.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        let mut config = DiscoveryConfig::builder()
            .max_results(self.max_results)
            .verify_open_status(self.verify_open_status)
            .retry(RetryPolicy {
                cooldown: self.cooldown,
                ..RetryPolicy::default()
            })
            .build();
        config.search_api_key = self.tavily_api_key.clone();
        config.llm_api_key = self.openai_api_key.clone();
        config
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
