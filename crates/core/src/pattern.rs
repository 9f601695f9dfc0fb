//! Name matching for cleaning rules.
//!
//! A pattern ending in `/` is a folder rule and matches a directory name
//! exactly. Anything else is a glob over a bare filename with two wildcard
//! glyphs: `*` (zero or more characters) and `?` (exactly one character).
//! Matching is case-sensitive and the whole name must be consumed.

/// Returns true when `name` satisfies `pattern`. Never panics; an empty
/// pattern only matches an empty name.
pub fn matches(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix('/') {
        Some(folder) => folder == name,
        None => glob_match(pattern, name),
    }
}

fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_at(&pattern, &text, 0, 0)
}

fn glob_match_at(pattern: &[char], text: &[char], p: usize, t: usize) -> bool {
    let Some(glyph) = pattern.get(p) else {
        return t >= text.len();
    };

    match glyph {
        '*' => (t..=text.len()).any(|next| glob_match_at(pattern, text, p + 1, next)),
        '?' => t < text.len() && glob_match_at(pattern, text, p + 1, t + 1),
        c => text.get(t) == Some(c) && glob_match_at(pattern, text, p + 1, t + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::matches;

    #[test]
    fn folder_rule_requires_exact_name() {
        assert!(matches("node_modules/", "node_modules"));
        assert!(!matches("node_modules/", "node_modules_old"));
        assert!(!matches("node_modules/", "dist"));
        // Stripped separator means the glob path is never taken.
        assert!(!matches("node_*/", "node_modules"));
    }

    #[test]
    fn star_matches_any_run_of_characters() {
        assert!(matches("*.log", "test.log"));
        assert!(matches("*.log", ".log"));
        assert!(matches("*", ""));
        assert!(matches("a*b*c", "aXXbYYc"));
        assert!(!matches("*.log", "test.txt"));
        assert!(!matches("*.log", "test.log.bak"));
    }

    #[test]
    fn question_mark_consumes_exactly_one_character() {
        assert!(matches("a?c", "abc"));
        assert!(!matches("a?c", "ac"));
        assert!(!matches("a?c", "abbc"));
        assert!(matches("test?.txt", "test1.txt"));
        assert!(!matches("test?.txt", "test.txt"));
    }

    #[test]
    fn literal_patterns_compare_case_sensitively() {
        assert!(matches("Makefile", "Makefile"));
        assert!(!matches("Makefile", "makefile"));
        assert!(!matches("*.Log", "app.log"));
    }

    #[test]
    fn whole_name_must_be_consumed() {
        assert!(!matches("", "name"));
        assert!(matches("", ""));
        assert!(!matches("abc", "abcd"));
        assert!(!matches("abcd", "abc"));
    }
}
