//! Small text helpers shared by the extractors and the sampler

/// Truncate to at most `max_chars` characters (not bytes), never splitting a
/// UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Character count, as used by every budget in the pipeline
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
