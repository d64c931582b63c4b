//! Name splitting for roster and sign-in names.
//!
//! Assumes Western capitalization: surnames start uppercase, connective
//! particles ("van", "de", "la") are lowercase and belong to the first-name
//! side. Names that break this convention split on the final word.

/// Split a full name into `(first, last)`.
///
/// The last name is the trailing run of words after the right-most
/// lowercase-initial word. When there is no such word, or the right-most
/// one is the final word itself, the final word alone is the last name.
///
/// ```
/// use rollcall_recon::names::split_name;
///
/// assert_eq!(split_name("Jean van Berg"), ("Jean van".into(), "Berg".into()));
/// assert_eq!(split_name("Saeed"), ("".into(), "Saeed".into()));
/// ```
pub fn split_name(full_name: &str) -> (String, String) {
    let words: Vec<&str> = full_name.split_whitespace().collect();
    if words.is_empty() {
        return (String::new(), String::new());
    }

    let split_at = match words.iter().rposition(|w| starts_lowercase(w)) {
        Some(boundary) if boundary + 1 < words.len() => boundary + 1,
        _ => words.len() - 1,
    };

    (words[..split_at].join(" "), words[split_at..].join(" "))
}

/// Last-name component of a full name.
pub fn last_name_of(full_name: &str) -> String {
    split_name(full_name).1
}

fn starts_lowercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(s: &str) -> (String, String) {
        split_name(s)
    }

    #[test]
    fn particle_stays_with_first_name() {
        assert_eq!(split("Jean van Berg"), ("Jean van".into(), "Berg".into()));
    }

    #[test]
    fn multi_word_surname_after_particles() {
        assert_eq!(
            split("Maria de la Cruz Lopez"),
            ("Maria de la".into(), "Cruz Lopez".into())
        );
    }

    #[test]
    fn single_token_is_last_name() {
        assert_eq!(split("Saeed"), ("".into(), "Saeed".into()));
    }

    #[test]
    fn no_particle_falls_back_to_final_word() {
        assert_eq!(split("Alice Smith"), ("Alice".into(), "Smith".into()));
        assert_eq!(
            split("Sanawar Ali Saeed"),
            ("Sanawar Ali".into(), "Saeed".into())
        );
    }

    #[test]
    fn lowercase_final_word_falls_back() {
        assert_eq!(split("ana lopez"), ("ana".into(), "lopez".into()));
        assert_eq!(split("Ana Lopez jr"), ("Ana Lopez".into(), "jr".into()));
    }

    #[test]
    fn leading_particle() {
        assert_eq!(split("van Berg"), ("van".into(), "Berg".into()));
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(split("  Jean   van  Berg "), ("Jean van".into(), "Berg".into()));
    }

    #[test]
    fn empty_input() {
        assert_eq!(split(""), ("".into(), "".into()));
        assert_eq!(split("   "), ("".into(), "".into()));
    }

    #[test]
    fn non_latin_initial_is_not_lowercase() {
        // Digits and punctuation never mark a particle boundary.
        assert_eq!(split("Ali 2nd"), ("Ali".into(), "2nd".into()));
        assert_eq!(split("Liam O'Neil"), ("Liam".into(), "O'Neil".into()));
    }

    #[test]
    fn last_name_helper() {
        assert_eq!(last_name_of("Bob Jones"), "Jones");
        assert_eq!(last_name_of("Jean van Berg"), "Berg");
    }
}
