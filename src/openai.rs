//! OpenAI client configuration with sensible defaults.

use crate::config::ModelSettings;
use crate::error::{AgentError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client for the configured endpoint and timeout.
///
/// The API key is read from `OPENAI_API_KEY`.
pub fn create_client(settings: &ModelSettings) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(|e| AgentError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let config = match &settings.api_base {
        Some(base) => OpenAIConfig::default().with_api_base(base),
        None => OpenAIConfig::default(),
    };

    Ok(Client::with_config(config).with_http_client(http_client))
}
