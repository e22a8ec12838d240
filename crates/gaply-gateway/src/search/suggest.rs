//! "Did you mean" suggestions for common truncated query words.

/// Fragments and their corrections, checked in this order.
const TYPOS: [(&str, &str); 5] = [
    ("machin", "machine"),
    ("learnin", "learning"),
    ("researc", "research"),
    ("artificil", "artificial"),
    ("intelligenc", "intelligence"),
];

/// Suggest a corrected query.
///
/// The query is lowercased, and the first fragment found in it is replaced
/// everywhere. Only one correction is applied per query.
#[must_use]
pub fn did_you_mean(query: &str) -> Option<String> {
    let lowered = query.to_lowercase();
    TYPOS
        .iter()
        .find(|(fragment, _)| lowered.contains(fragment))
        .map(|(fragment, fix)| lowered.replace(fragment, fix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fragment() {
        assert_eq!(did_you_mean("Machin vision").as_deref(), Some("machine vision"));
    }

    #[test]
    fn test_no_fragment() {
        assert_eq!(did_you_mean("graph theory"), None);
    }

    #[test]
    fn test_first_table_entry_wins() {
        assert_eq!(did_you_mean("learnin machin").as_deref(), Some("learnin machine"));
    }

    // Fragments also match inside correctly spelled words.
    #[test]
    fn test_fragment_inside_correct_word() {
        assert_eq!(did_you_mean("machine").as_deref(), Some("machinee"));
    }

    #[test]
    fn test_replaces_every_occurrence() {
        assert_eq!(did_you_mean("researc and researc").as_deref(), Some("research and research"));
    }
}
