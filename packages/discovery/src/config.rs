//! Pipeline configuration.
//!
//! Built explicitly by the caller and handed to the pipeline; nothing here
//! reads the process environment.

use typed_builder::TypedBuilder;

use crate::error::{DiscoveryError, Result};
use crate::retry::RetryPolicy;
use crate::security::SecretString;

/// Settings for one [`DiscoveryPipeline`](crate::pipeline::DiscoveryPipeline).
#[derive(Debug, Clone, TypedBuilder)]
pub struct DiscoveryConfig {
    /// Search provider credential
    #[builder(default, setter(strip_option, into))]
    pub search_api_key: Option<SecretString>,

    /// Extraction provider credential
    #[builder(default, setter(strip_option, into))]
    pub llm_api_key: Option<SecretString>,

    /// Upper bound on hits per search
    #[builder(default = 5)]
    pub max_results: usize,

    /// Run the open/closed check on confident candidates
    #[builder(default = true)]
    pub verify_open_status: bool,

    /// Upper bound on hits per verification search
    #[builder(default = 3)]
    pub verification_max_results: usize,

    #[builder(default)]
    pub retry: RetryPolicy,
}

impl DiscoveryConfig {
    /// Fail with `ConfigMissing` unless both provider credentials are present.
    pub fn ensure_credentials(&self) -> Result<()> {
        if self.search_api_key.as_ref().map_or(true, SecretString::is_blank) {
            return Err(DiscoveryError::ConfigMissing {
                name: "TAVILY_API_KEY",
            });
        }
        if self.llm_api_key.as_ref().map_or(true, SecretString::is_blank) {
            return Err(DiscoveryError::ConfigMissing {
                name: "OPENAI_API_KEY",
            });
        }
        Ok(())
    }
}
