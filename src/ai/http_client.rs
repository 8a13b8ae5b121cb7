//! Shared HTTP Client Module
//!
//! One lazily-built blocking client for every naming request, so folders
//! processed in one run reuse the pooled connection and TLS session.

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::time::Duration;

/// Global HTTP client for OpenAI-compatible API calls
///
/// - 60s timeout: a slow naming reply is treated as no reply
/// - small idle pool, folders are named one at a time
pub static OPENAI_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .expect("Failed to create OpenAI HTTP client")
});

/// Get the global OpenAI HTTP client
#[inline]
pub fn openai_client() -> &'static Client {
    &OPENAI_CLIENT
}
