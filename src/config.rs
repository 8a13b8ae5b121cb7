//! Renamer configuration
//!
//! Defaults are overridden by environment variables (optionally loaded from a
//! `.env` file by the binary), which are in turn overridden by CLI flags.

use serde::{Deserialize, Serialize};

/// Budgets and naming-service settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenamerConfig {
    /// Maximum number of samples collected per folder
    pub max_files: usize,

    /// Character budget per sampled file
    pub chars_per_file: usize,

    /// How many samples are handed to the naming service
    pub naming_samples: usize,

    /// Character budget for OCR output in the image fallback
    pub ocr_chars: usize,

    /// Model identifier, passed through to the naming service untouched
    pub model: String,

    /// Base URL for the chat-completions API
    pub base_url: String,

    /// Token limit for the naming reply
    pub max_tokens: u32,

    pub temperature: f32,

    /// Per-request timeout for the naming service, in seconds
    pub timeout_secs: u64,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            max_files: 8,
            chars_per_file: 2000,
            naming_samples: 6,
            ocr_chars: 2000,
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 64,
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

impl RenamerConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from any key lookup (the process environment in
    /// production, a map in tests). Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FOLDER_RENAMER_MAX_FILES").and_then(|v| parse_or_warn(&v)) {
            self.max_files = v;
        }
        if let Some(v) = lookup("FOLDER_RENAMER_CHARS_PER_FILE").and_then(|v| parse_or_warn(&v)) {
            self.chars_per_file = v;
        }
        if let Some(v) = lookup("FOLDER_RENAMER_NAMING_SAMPLES").and_then(|v| parse_or_warn(&v)) {
            self.naming_samples = v;
        }
        if let Some(v) = lookup("FOLDER_RENAMER_TIMEOUT_SECS").and_then(|v| parse_or_warn(&v)) {
            self.timeout_secs = v;
        }
        if let Some(v) = lookup("FOLDER_RENAMER_MODEL").filter(|v| !v.trim().is_empty()) {
            self.model = v;
        }
        if let Some(v) = lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = v.trim_end_matches('/').to_string();
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparseable config value: {:?}", value);
            None
        }
    }
}
