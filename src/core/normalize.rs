//! Segment identifier normalization.
//!
//! The three source tables spell the same UNE identifier differently —
//! `(LDN-3A)`, `LDN 3A`, and `LDN3A` all name one segment. Every
//! cross-table lookup goes through [`normalize_une_id`] first so that the
//! normalized form is the single join key.

/// Canonicalize a raw UNE identifier for equality comparisons.
///
/// Removes all parentheses, hyphens, and ASCII spaces, then trims any
/// remaining leading/trailing whitespace (tabs, newlines). Case is
/// preserved. The function is total and idempotent; callers holding a
/// non-string cell map it to the empty string before reaching here.
pub fn normalize_une_id(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '(' | ')' | '-' | ' '))
        .collect();
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_parentheses_hyphens_and_spaces() {
        assert_eq!(normalize_une_id("(LDN-3A)"), "LDN3A");
        assert_eq!(normalize_une_id("LDN 3A"), "LDN3A");
        assert_eq!(normalize_une_id(" LDN-3-A "), "LDN3A");
        assert_eq!(normalize_une_id("LDN3A"), "LDN3A");
    }

    #[test]
    fn trims_residual_whitespace() {
        // Tabs and newlines survive the character filter and fall to trim.
        assert_eq!(normalize_une_id("\tLDN3A\n"), "LDN3A");
        assert_eq!(normalize_une_id("\t(LDN 3A)\t"), "LDN3A");
    }

    #[test]
    fn preserves_case_and_other_punctuation() {
        assert_eq!(normalize_une_id("ldn3a"), "ldn3a");
        assert_eq!(normalize_une_id("LDN_3A"), "LDN_3A");
        assert_eq!(normalize_une_id("LDN/3A"), "LDN/3A");
    }

    #[test]
    fn empty_and_punctuation_only_inputs_collapse_to_empty() {
        assert_eq!(normalize_une_id(""), "");
        assert_eq!(normalize_une_id("()- "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["(LDN-3A)", "LDN 3A", "", " a-b(c) ", "\tx y\n"] {
            let once = normalize_une_id(raw);
            assert_eq!(normalize_une_id(&once), once);
        }
    }
}
