/// Used when nothing survives filtering
pub const FALLBACK_NAME: &str = "renamed";

/// Turn an arbitrary suggestion into a filesystem-safe folder name.
///
/// Keeps alphanumerics, spaces, hyphens and underscores; trims; turns spaces
/// into underscores; collapses underscore runs. Idempotent.
pub fn slugify(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    let replaced = kept.trim().replace(' ', "_");

    let mut result = String::with_capacity(replaced.len());
    let mut last_was_underscore = false;
    for c in replaced.chars() {
        if c == '_' {
            if !last_was_underscore {
                result.push(c);
            }
            last_was_underscore = true;
        } else {
            result.push(c);
            last_was_underscore = false;
        }
    }

    if result.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        result
    }
}
