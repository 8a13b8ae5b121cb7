//! Naming collaborator: the seam trait plus the OpenAI-backed implementation

pub mod client;
pub mod credentials;
pub mod http_client;
pub mod naming;
pub mod prompts;

pub use client::OpenAiNamer;
pub use credentials::CredentialManager;
pub use naming::{clean_suggestion, NameSuggester, NoSuggester};
