//! folder-renamer
//!
//! Usage:
//!     folder-renamer ~/Downloads/unsorted              # dry run
//!     folder-renamer ~/Downloads/unsorted --apply
//!     folder-renamer ~/Downloads/unsorted --interactive --json

use anyhow::{bail, Context};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use folder_renamer::{
    find_folders, init_tracing, Capabilities, CredentialManager, FormatExtractor,
    ImageFallbackChain, Mode, NameSuggester, NoSuggester, OpenAiNamer, Outcome,
    RenameOrchestrator, RenamerConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "folder-renamer",
    about = "Suggest content-based names for the folders in a directory",
    version
)]
struct Args {
    /// Directory whose subfolders are inspected
    #[arg(required_unless_present = "store_api_key")]
    path: Option<PathBuf>,

    /// Actually perform renames (default is dry-run)
    #[arg(long)]
    apply: bool,

    /// Ask before each rename; confirmed renames are applied
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Model name passed to the naming service
    #[arg(long)]
    model: Option<String>,

    /// Also propose a name for the target directory itself
    #[arg(long)]
    include_root_files: bool,

    /// Maximum number of files sampled per folder
    #[arg(long)]
    max_files: Option<usize>,

    /// Character budget per sampled file
    #[arg(long)]
    chars_per_file: Option<usize>,

    /// Print one JSON report per folder on stdout
    #[arg(long)]
    json: bool,

    /// Store an OpenAI API key in the OS keychain
    #[arg(long, value_name = "KEY")]
    store_api_key: Option<String>,

    /// Debug logging for this crate
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    // .env in the working directory is optional
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(key) = &args.store_api_key {
        CredentialManager::store_api_key(key).context("Failed to store API key in keychain")?;
        eprintln!("API key stored.");
    }

    let Some(path) = args.path.as_ref() else {
        return Ok(());
    };

    let target = std::fs::canonicalize(path)
        .with_context(|| format!("Path not found: {}", path.display()))?;
    if !target.is_dir() {
        bail!("Not a directory: {}", target.display());
    }

    let mut config = RenamerConfig::from_env();
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(max_files) = args.max_files {
        config.max_files = max_files;
    }
    if let Some(chars) = args.chars_per_file {
        config.chars_per_file = chars;
    }

    let caps = Capabilities::detect();
    let chain = ImageFallbackChain::from_capabilities(caps, config.ocr_chars);

    let suggester: Box<dyn NameSuggester> = match OpenAiNamer::from_credentials(&config) {
        Ok(namer) => Box::new(namer),
        Err(e) => {
            tracing::warn!("{}; only image fallbacks can produce names", e);
            Box::new(NoSuggester)
        }
    };

    let orchestrator = RenameOrchestrator::new(FormatExtractor::new(chain), suggester, config);

    let folders = find_folders(&target, args.include_root_files)
        .with_context(|| format!("Failed to list {}", target.display()))?;
    tracing::info!("Found {} folders to inspect", folders.len());

    let mode = if args.apply || args.interactive {
        Mode::Apply
    } else {
        Mode::DryRun
    };
    let json = args.json;

    let outcomes = orchestrator.process_all(&folders, mode, |proposal| {
        if !args.interactive {
            return true;
        }
        if let Err(e) = report(proposal, json) {
            tracing::warn!("Failed to print proposal: {}", e);
        }
        confirm("Apply this rename?").unwrap_or_else(|e| {
            tracing::warn!("Could not read confirmation: {}", e);
            false
        })
    });

    let mut failures = 0usize;
    for outcome in &outcomes {
        if outcome.is_failure() {
            failures += 1;
        }
        report(outcome, json)?;
    }

    if failures > 0 {
        tracing::warn!("{} of {} folders failed", failures, folders.len());
    }

    Ok(())
}

fn report(outcome: &Outcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }

    let name = |p: &std::path::Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.display().to_string())
    };

    match outcome {
        Outcome::Proposed {
            folder,
            target,
            suggestion,
            ..
        } => println!(
            "{} -> {} ({:?})",
            folder.display(),
            name(target),
            suggestion.source
        ),
        Outcome::Renamed { folder, target, .. } => {
            println!("{} renamed to {}", folder.display(), name(target))
        }
        Outcome::NoSuggestion { folder, samples } => println!(
            "{}: no suggestion ({} samples), skipping",
            folder.display(),
            samples
        ),
        Outcome::ResolveFailed { folder, error } => {
            println!("{}: no free target name: {}", folder.display(), error)
        }
        Outcome::Skipped { folder, .. } => println!("{}: skipped", folder.display()),
        Outcome::MoveFailed { folder, error, .. } => {
            println!("{}: rename failed: {}", folder.display(), error)
        }
        Outcome::PartiallyMoved {
            folder,
            target,
            error,
        } => println!(
            "{}: copied to {} but the original could not be fully removed: {}",
            folder.display(),
            target.display(),
            error
        ),
    }
    Ok(())
}

/// y/N prompt on stderr; anything but y/yes is a no
fn confirm(question: &str) -> io::Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
