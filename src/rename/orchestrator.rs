//! Per-folder rename pipeline
//!
//! Sampling -> suggestion -> (image fallback) -> slug -> target -> (move).
//! Every step degrades to an [`Outcome`]; nothing here returns an error, so a
//! bad folder never stops the ones after it.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::ai::NameSuggester;
use crate::config::RenamerConfig;
use crate::error::RenameError;
use crate::extract::{FileFormat, FormatExtractor};
use crate::rename::mover::move_dir;
use crate::rename::slug::slugify;
use crate::rename::target::TargetResolver;
use crate::sampler::{walk_files, FolderSampler};
use crate::vision::StrategyKind;

/// Image-derived names keep at most this many words
const FALLBACK_MAX_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DryRun,
    Apply,
}

/// Where a proposed name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionSource {
    NamingService,
    Ocr,
    Metadata,
    SemanticLabel,
}

impl From<StrategyKind> for SuggestionSource {
    fn from(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Ocr => SuggestionSource::Ocr,
            StrategyKind::Metadata => SuggestionSource::Metadata,
            StrategyKind::SemanticLabel => SuggestionSource::SemanticLabel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCandidate {
    /// Raw suggestion, before slugging
    pub name: String,
    pub source: SuggestionSource,
}

/// Result of processing one folder
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    /// Target computed; nothing moved yet
    #[serde(rename_all = "camelCase")]
    Proposed {
        folder: PathBuf,
        target: PathBuf,
        suggestion: SuggestionCandidate,
        samples: usize,
    },
    #[serde(rename_all = "camelCase")]
    Renamed {
        folder: PathBuf,
        target: PathBuf,
        suggestion: SuggestionCandidate,
    },
    /// Proposal declined at the confirmation prompt
    #[serde(rename_all = "camelCase")]
    Skipped { folder: PathBuf, target: PathBuf },
    #[serde(rename_all = "camelCase")]
    NoSuggestion { folder: PathBuf, samples: usize },
    #[serde(rename_all = "camelCase")]
    ResolveFailed { folder: PathBuf, error: String },
    /// The original folder is left where it was
    #[serde(rename_all = "camelCase")]
    MoveFailed {
        folder: PathBuf,
        target: PathBuf,
        error: String,
    },
    /// Everything was copied to `target`, but `folder` could only be partly
    /// removed; both may hold files now
    #[serde(rename_all = "camelCase")]
    PartiallyMoved {
        folder: PathBuf,
        target: PathBuf,
        error: String,
    },
}

impl Outcome {
    pub fn folder(&self) -> &Path {
        match self {
            Outcome::Proposed { folder, .. }
            | Outcome::Renamed { folder, .. }
            | Outcome::Skipped { folder, .. }
            | Outcome::NoSuggestion { folder, .. }
            | Outcome::ResolveFailed { folder, .. }
            | Outcome::MoveFailed { folder, .. }
            | Outcome::PartiallyMoved { folder, .. } => folder,
        }
    }

    /// Proposed or final destination, when there is one
    pub fn target(&self) -> Option<&Path> {
        match self {
            Outcome::Proposed { target, .. }
            | Outcome::Renamed { target, .. }
            | Outcome::Skipped { target, .. }
            | Outcome::MoveFailed { target, .. }
            | Outcome::PartiallyMoved { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::ResolveFailed { .. }
                | Outcome::MoveFailed { .. }
                | Outcome::PartiallyMoved { .. }
        )
    }
}

/// Runs the pipeline for one folder at a time
pub struct RenameOrchestrator {
    extractor: FormatExtractor,
    suggester: Box<dyn NameSuggester>,
    resolver: TargetResolver,
    config: RenamerConfig,
}

impl RenameOrchestrator {
    pub fn new(
        extractor: FormatExtractor,
        suggester: Box<dyn NameSuggester>,
        config: RenamerConfig,
    ) -> Self {
        Self {
            extractor,
            suggester,
            resolver: TargetResolver::new(),
            config,
        }
    }

    pub fn with_resolver(mut self, resolver: TargetResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &RenamerConfig {
        &self.config
    }

    /// Propose, then move when `mode` is [`Mode::Apply`]
    pub fn process(&self, folder: &Path, mode: Mode) -> Outcome {
        let outcome = self.propose(folder);
        match mode {
            Mode::DryRun => outcome,
            Mode::Apply => self.apply(outcome),
        }
    }

    /// Process a list of folders in order. In apply mode `approve` sees each
    /// proposal first; declined ones become [`Outcome::Skipped`].
    ///
    /// A folder that contains later entries of the list (the scan root) is
    /// moved only after all of them, so their paths stay valid. Outcomes are
    /// returned in input order.
    pub fn process_all<F>(&self, folders: &[PathBuf], mode: Mode, mut approve: F) -> Vec<Outcome>
    where
        F: FnMut(&Outcome) -> bool,
    {
        let mut outcomes = Vec::with_capacity(folders.len());
        let mut deferred = Vec::new();

        for (i, folder) in folders.iter().enumerate() {
            let proposal = self.propose(folder);
            if mode == Mode::DryRun || !matches!(proposal, Outcome::Proposed { .. }) {
                outcomes.push(proposal);
                continue;
            }

            if !approve(&proposal) {
                outcomes.push(Outcome::Skipped {
                    folder: folder.clone(),
                    target: proposal.target().map(Path::to_path_buf).unwrap_or_default(),
                });
                continue;
            }

            let contains_later = folders[i + 1..]
                .iter()
                .any(|other| other != folder && other.starts_with(folder));
            if contains_later {
                tracing::debug!("[Rename] Deferring move of {}", folder.display());
                deferred.push(i);
                outcomes.push(proposal);
            } else {
                outcomes.push(self.apply(proposal));
            }
        }

        for i in deferred {
            let proposal = outcomes[i].clone();
            outcomes[i] = self.apply(proposal);
        }

        outcomes
    }

    /// Everything up to and including target resolution. Touches the
    /// filesystem only to read.
    pub fn propose(&self, folder: &Path) -> Outcome {
        let sampler = FolderSampler::new(&self.extractor);
        let samples = sampler.sample(folder, self.config.max_files, self.config.chars_per_file);
        let sample_count = samples.len();

        let mut suggestion = None;
        if !samples.is_empty() {
            let take = samples.len().min(self.config.naming_samples);
            suggestion = self
                .suggester
                .suggest(&samples[..take])
                .filter(|s| !s.trim().is_empty())
                .map(|name| SuggestionCandidate {
                    name,
                    source: SuggestionSource::NamingService,
                });
        }

        if suggestion.is_none() {
            suggestion = self.image_fallback(folder);
        }

        let Some(suggestion) = suggestion else {
            tracing::info!("[Rename] No suggestion for {}", folder.display());
            return Outcome::NoSuggestion {
                folder: folder.to_path_buf(),
                samples: sample_count,
            };
        };

        let slug = slugify(&suggestion.name);

        let target = folder
            .parent()
            .ok_or_else(|| RenameError::NoParent(folder.to_path_buf()))
            .and_then(|parent| self.resolver.resolve(parent, &slug));

        match target {
            Ok(target) => {
                tracing::info!(
                    "[Rename] {} -> {} (from {:?})",
                    folder.display(),
                    target.display(),
                    suggestion.source
                );
                Outcome::Proposed {
                    folder: folder.to_path_buf(),
                    target,
                    suggestion,
                    samples: sample_count,
                }
            }
            Err(e) => {
                tracing::warn!("[Rename] Could not resolve target for {}: {}", folder.display(), e);
                Outcome::ResolveFailed {
                    folder: folder.to_path_buf(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Carry out a proposal. Other outcomes pass through unchanged.
    pub fn apply(&self, outcome: Outcome) -> Outcome {
        let (folder, target, suggestion) = match outcome {
            Outcome::Proposed {
                folder,
                target,
                suggestion,
                ..
            } => (folder, target, suggestion),
            other => return other,
        };

        match move_dir(&folder, &target) {
            Ok(()) => {
                tracing::info!("[Rename] Renamed {} -> {}", folder.display(), target.display());
                Outcome::Renamed {
                    folder,
                    target,
                    suggestion,
                }
            }
            Err(e) => {
                tracing::warn!("[Rename] Move failed for {}: {}", folder.display(), e);
                failed_move(folder, target, e)
            }
        }
    }

    /// Label the folder's images in walk order; first usable label wins.
    /// OCR results from sampling are not reused: an image whose OCR came up
    /// empty there still gets its metadata read here.
    fn image_fallback(&self, folder: &Path) -> Option<SuggestionCandidate> {
        let chain = self.extractor.image_chain();
        if chain.kinds().is_empty() || !folder.is_dir() {
            return None;
        }

        walk_files(folder)
            .filter(|entry| FileFormat::is_image(entry.path()))
            .find_map(|entry| {
                let (label, kind) = chain.label_image_with_source(entry.path())?;
                let name = fallback_name(&label)?;
                tracing::debug!(
                    "[Rename] Image fallback via {} on {}",
                    kind.as_str(),
                    entry.path().display()
                );
                Some(SuggestionCandidate {
                    name,
                    source: kind.into(),
                })
            })
    }
}

fn failed_move(folder: PathBuf, target: PathBuf, error: RenameError) -> Outcome {
    match error {
        RenameError::SourceNotRemoved { .. } => Outcome::PartiallyMoved {
            folder,
            target,
            error: error.to_string(),
        },
        _ => Outcome::MoveFailed {
            folder,
            target,
            error: error.to_string(),
        },
    }
}

/// First non-blank line of an image label, cut to a few words
fn fallback_name(label: &str) -> Option<String> {
    let line = label.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(
        line.split_whitespace()
            .take(FALLBACK_MAX_WORDS)
            .collect::<Vec<_>>()
            .join(" "),
    )
}
