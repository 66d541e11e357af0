//! Cleanup of agent-produced markdown bodies
//!
//! The agent occasionally wraps a whole markdown document in a code fence
//! (``` or ```markdown). The stored texts are rendered downstream as
//! markdown, so the fence has to go.

/// Strips a surrounding code fence, if any, and trims the result.
pub fn clean_markdown(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let rest = rest.strip_prefix("markdown").unwrap_or(rest);
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim().to_string()
}
