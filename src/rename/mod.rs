//! Turning a suggestion into a rename: slug, collision-free target, move,
//! and the orchestrator tying the pipeline together

pub mod mover;
pub mod orchestrator;
pub mod slug;
pub mod target;

pub use mover::move_dir;
pub use orchestrator::{Mode, Outcome, RenameOrchestrator, SuggestionCandidate, SuggestionSource};
pub use slug::slugify;
pub use target::TargetResolver;
