//! Fallback course resolution from an encoded last name.
//!
//! Some sign-in names carry the institution's course code after the
//! person's name, e.g. `"ali khan-CS-101-F24-B-2024"`. The code tokens are
//! recovered right to left and the token at [`DROPPED_TOKEN_INDEX`] is
//! removed. That position is a fixed artifact of the encoding and is kept
//! as-is.

/// Index (in right-to-left token order) of the section/variant marker that
/// is not part of the course id.
pub const DROPPED_TOKEN_INDEX: usize = 3;

/// Minimum number of retained tokens needed to drop the marker.
pub const MIN_CODE_TOKENS: usize = DROPPED_TOKEN_INDEX + 1;

/// Derive a course code from a last-name string, or `None` when the name
/// does not carry enough code tokens.
pub fn extract_course_code(last_name: &str) -> Option<String> {
    let reversed: String = last_name.chars().rev().collect();

    let mut tokens: Vec<String> = reversed
        .split('-')
        .filter(|segment| !is_name_fragment(segment))
        .map(|segment| segment.chars().rev().collect())
        .collect();

    if tokens.len() < MIN_CODE_TOKENS {
        return None;
    }

    tokens.remove(DROPPED_TOKEN_INDEX);
    Some(tokens.join("-"))
}

/// A non-empty run of lowercase letters and whitespace. Whitespace-only
/// segments count too; empty segments do not.
fn is_name_fragment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_lowercase() || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_drops_fourth_token() {
        // Right-to-left tokens: 2024, B, F24, 101, CS ("ali khan" is a name fragment)
        assert_eq!(
            extract_course_code("ali khan-CS-101-F24-B-2024").as_deref(),
            Some("2024-B-F24-CS")
        );
    }

    #[test]
    fn exactly_four_tokens() {
        assert_eq!(extract_course_code("MTH-2-A-7").as_deref(), Some("7-A-2"));
    }

    #[test]
    fn too_few_tokens() {
        assert_eq!(extract_course_code("khan-CS-101-F24"), None);
        assert_eq!(extract_course_code("Smith"), None);
        assert_eq!(extract_course_code(""), None);
    }

    #[test]
    fn name_fragments_do_not_count() {
        // Only three qualifying segments survive.
        assert_eq!(extract_course_code("ali-khan-de la-CS-101-F24"), None);
    }

    #[test]
    fn mixed_case_segments_are_kept() {
        // "Khan" is not a pure lowercase run.
        assert_eq!(
            extract_course_code("Khan-CS-101-F24-B").as_deref(),
            Some("B-F24-101-Khan")
        );
    }

    #[test]
    fn digit_segments_are_kept() {
        assert_eq!(
            extract_course_code("x-10-20-30-40").as_deref(),
            Some("40-30-20")
        );
    }

    #[test]
    fn empty_segments_are_kept() {
        // Doubled hyphens produce empty tokens; they are not name fragments.
        assert_eq!(extract_course_code("A--B-C").as_deref(), Some("C-B-"));
    }

    #[test]
    fn whitespace_segments_are_discarded() {
        assert_eq!(extract_course_code("x- -A-B-C-D").as_deref(), Some("D-C-B"));
        assert_eq!(extract_course_code("x-  -A-B-C"), None);
    }
}
