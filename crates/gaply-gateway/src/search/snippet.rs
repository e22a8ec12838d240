//! Approximate abstract excerpts from OpenAlex inverted indexes.

use crate::models::InvertedAbstract;

/// Marker used when a work has no usable abstract.
pub const MISSING_ABSTRACT: &str = "Abstract not available";

/// Maximum number of distinct words taken from the index.
pub const MAX_WORDS: usize = 20;

/// Maximum snippet length in characters before the ellipsis.
pub const MAX_CHARS: usize = 200;

/// Build a snippet from an inverted abstract.
///
/// Words are ordered by their first position in the abstract, so the result
/// reads roughly like the opening of the abstract with repeated words dropped.
/// Words without positions sort last, ties break alphabetically.
#[must_use]
pub fn generate_snippet(index: Option<&InvertedAbstract>) -> String {
    let Some(index) = index.filter(|i| !i.is_empty()) else {
        return MISSING_ABSTRACT.to_string();
    };

    let mut words: Vec<(u32, &str)> = index
        .iter()
        .map(|(word, positions)| {
            (positions.iter().copied().min().unwrap_or(u32::MAX), word.as_str())
        })
        .collect();
    words.sort_unstable();

    let text = words.iter().take(MAX_WORDS).map(|(_, w)| *w).collect::<Vec<_>>().join(" ");
    truncate(text)
}

fn truncate(text: String) -> String {
    match text.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
