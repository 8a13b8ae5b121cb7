use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::credentials::CredentialManager;
use super::http_client::openai_client;
use super::naming::{clean_suggestion, NameSuggester};
use super::prompts::build_folder_name_prompt;
use crate::config::RenamerConfig;
use crate::error::NamingError;
use crate::sampler::Sample;

/// Message in conversation
#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

/// Chat-completions request body
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// API error response
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Folder-name suggester backed by an OpenAI-compatible chat API
pub struct OpenAiNamer {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    naming_samples: usize,
    timeout: Duration,
}

impl OpenAiNamer {
    pub fn new(api_key: impl Into<String>, config: &RenamerConfig) -> Self {
        Self {
            api_key: api_key.into(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            naming_samples: config.naming_samples,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Build with the API key from the environment or keychain
    pub fn from_credentials(config: &RenamerConfig) -> Result<Self, NamingError> {
        let api_key = CredentialManager::get_api_key().ok_or(NamingError::MissingApiKey)?;
        Ok(Self::new(api_key, config))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_name(&self, samples: &[Sample]) -> Result<String, NamingError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_folder_name_prompt(samples, self.naming_samples),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = openai_client()
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(NamingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json()?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        clean_suggestion(&reply).ok_or(NamingError::EmptyResponse)
    }
}

impl NameSuggester for OpenAiNamer {
    fn suggest(&self, samples: &[Sample]) -> Option<String> {
        if samples.is_empty() {
            return None;
        }

        tracing::debug!(
            "[AI] Requesting folder name from {} ({} samples)",
            self.model,
            samples.len().min(self.naming_samples)
        );

        match self.request_name(samples) {
            Ok(name) => {
                tracing::debug!("[AI] Suggested: {}", name);
                Some(name)
            }
            Err(e) => {
                tracing::warn!("[AI] Naming request failed: {}", e);
                None
            }
        }
    }
}
