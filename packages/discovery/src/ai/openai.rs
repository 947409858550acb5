//! OpenAI-compatible implementation of the AI trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use discovery::ai::OpenAI;
//!
//! let ai = OpenAI::new("sk-...")
//!     .with_base_url("https://generativelanguage.googleapis.com/v1beta/openai")
//!     .with_model("gemini-2.0-flash");
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};

use crate::error::{DiscoveryError, Result};
use crate::security::SecretString;
use crate::traits::ai::AI;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat-completions backed model.
#[derive(Clone)]
pub struct OpenAI {
    client: OpenAIClient,
    model: String,
}

impl OpenAI {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from a redacted credential.
    pub fn from_secret(api_key: &SecretString) -> Self {
        Self::new(api_key.expose())
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at any OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl From<OpenAIError> for DiscoveryError {
    fn from(e: OpenAIError) -> Self {
        match e {
            OpenAIError::RateLimited(body) => DiscoveryError::RateLimited(body),
            other => DiscoveryError::AI(Box::new(other)),
        }
    }
}

#[async_trait]
impl AI for OpenAI {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::user(prompt))
            .temperature(0.0);

        let response = self.client.chat_completion(request).await?;
        Ok(response.content)
    }
}
