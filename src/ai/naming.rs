//! Naming collaborator seam
//!
//! The pipeline only needs "samples in, maybe a name out". Anything that can
//! answer that (the OpenAI client, a closure in tests) implements
//! [`NameSuggester`]. Failures are the implementation's problem: they surface
//! as `None`.

use crate::sampler::Sample;

pub trait NameSuggester: Send + Sync {
    fn suggest(&self, samples: &[Sample]) -> Option<String>;
}

impl<F> NameSuggester for F
where
    F: Fn(&[Sample]) -> Option<String> + Send + Sync,
{
    fn suggest(&self, samples: &[Sample]) -> Option<String> {
        self(samples)
    }
}

/// Suggester that never has an opinion (offline runs)
#[derive(Debug, Clone, Default)]
pub struct NoSuggester;

impl NameSuggester for NoSuggester {
    fn suggest(&self, _samples: &[Sample]) -> Option<String> {
        None
    }
}

/// Reduce a model reply to a bare name: first non-blank line, surrounding
/// spaces and quotes removed
pub fn clean_suggestion(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let name = line.trim_matches(|c: char| c == ' ' || c == '"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_takes_first_line_and_strips_quotes() {
        assert_eq!(
            clean_suggestion("\"Tax Returns 2023\"\nBecause the files are...").as_deref(),
            Some("Tax Returns 2023")
        );
        assert_eq!(clean_suggestion("\n\n  Invoices  \n").as_deref(), Some("Invoices"));
    }

    #[test]
    fn test_clean_rejects_blank() {
        assert_eq!(clean_suggestion(""), None);
        assert_eq!(clean_suggestion("  \"\"  \n"), None);
    }

    #[test]
    fn test_closure_is_a_suggester() {
        let suggester = |samples: &[Sample]| samples.first().map(|s| s.label.clone());
        let samples = vec![Sample::new("notes.txt", "x")];
        assert_eq!(suggester.suggest(&samples).as_deref(), Some("notes.txt"));
        assert_eq!(NoSuggester.suggest(&samples), None);
    }
}
