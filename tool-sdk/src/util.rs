//! Small helpers shared across the SDK

/// Truncate a string to at most `max_chars` characters, adding an ellipsis
/// if anything was cut. Safe on multi-byte text.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 3 {
        return s.chars().take(max_chars).collect();
    }
    let kept: String = s.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}
