pub mod ai;
pub mod config;
pub mod error;
pub mod extract;
pub mod rename;
pub mod sampler;
pub mod scan;
pub mod utils;
pub mod vision;

pub use ai::{CredentialManager, NameSuggester, NoSuggester, OpenAiNamer};
pub use config::RenamerConfig;
pub use error::{ExtractError, NamingError, RenameError};
pub use extract::{FileFormat, FormatExtractor};
pub use rename::{slugify, Mode, Outcome, RenameOrchestrator, TargetResolver};
pub use sampler::{FolderSampler, Sample};
pub use scan::find_folders;
pub use vision::{Capabilities, ImageFallbackChain};

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so stdout stays usable
/// for `--json` reports.
///
/// Default: warn for dependencies, info for this crate (per-folder outcomes).
/// `verbose` raises this crate to debug. `RUST_LOG` overrides both.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "warn,folder_renamer=debug"
    } else {
        "warn,folder_renamer=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
