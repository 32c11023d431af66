//! Tool result summarization

/// Characters of tool output kept for review and finalization
pub const SUMMARY_LIMIT: usize = 500;

pub const TRUNCATION_SUFFIX: &str = "... (truncated)";

/// [`summarize_to`] with the default limit
pub fn summarize(text: &str) -> String {
    summarize_to(text, SUMMARY_LIMIT)
}

/// First `limit` characters plus [`TRUNCATION_SUFFIX`] when longer, else `text`
pub fn summarize_to(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_SUFFIX),
        None => text.to_string(),
    }
}
