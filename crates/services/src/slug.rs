//! Slug derivation for category names.

/// Lowercases, keeps ASCII alphanumerics, and collapses runs of spaces,
/// hyphens, and underscores into single hyphens. Every other character is
/// dropped. May return an empty string for names with nothing usable.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if matches!(ch, ' ' | '-' | '_') {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Other Frameworks"), "other-frameworks");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("  Python --  3 "), "python-3");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("C++ (and friends!)"), "c-and-friends");
    }

    #[test]
    fn can_come_up_empty() {
        assert_eq!(slugify("???"), "");
    }
}
