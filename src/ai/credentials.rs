use keyring::Entry;

const SERVICE_NAME: &str = "com.folder-renamer.cli";
const PROVIDER: &str = "openai";

/// Environment variable checked before the keychain
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// API key lookup: environment first, then the OS keychain
pub struct CredentialManager;

impl CredentialManager {
    /// Get the OpenAI API key, if one is configured anywhere
    pub fn get_api_key() -> Option<String> {
        if let Some(key) = Self::from_env(|k| std::env::var(k).ok()) {
            return Some(key);
        }

        match Entry::new(SERVICE_NAME, PROVIDER).and_then(|entry| entry.get_password()) {
            Ok(key) if !key.trim().is_empty() => {
                tracing::debug!("[Credentials] Using API key from keychain");
                Some(key.trim().to_string())
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("[Credentials] No keychain entry: {}", e);
                None
            }
        }
    }

    /// Store an API key in the OS keychain
    pub fn store_api_key(api_key: &str) -> Result<(), keyring::Error> {
        Entry::new(SERVICE_NAME, PROVIDER)?.set_password(api_key.trim())?;
        tracing::info!("[Credentials] Stored API key in keychain");
        Ok(())
    }

    fn from_env<F>(lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}
