// Output formatting: terminal display of verdicts and batch reports.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Safe for any UTF-8 input: it counts characters, never slices bytes, so
/// emoji and accented letters in user posts cannot cause a panic.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
