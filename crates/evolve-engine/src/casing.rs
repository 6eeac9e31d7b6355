//! Display casing for topic names.
//!
//! Kept as a pure formatting function, independent of extraction scoring.

/// Normalize a topic word or phrase into its display form.
///
/// - Phrases recurse per sub-word and rejoin with spaces
/// - Purely alphabetic words are Title-cased
/// - Anything containing a digit is upper-cased (acronyms, "3d", "es2015")
/// - Anything else ("c++", "node.js") is upper-cased as a safe default
pub fn display_case(word: &str) -> String {
    if word.contains(' ') {
        return word
            .split(' ')
            .map(display_case)
            .collect::<Vec<_>>()
            .join(" ");
    }

    if word.chars().all(|c| c.is_alphabetic()) {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    } else {
        // Digits and symbol-bearing tokens read best fully upper-cased
        word.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabetic_title_case() {
        assert_eq!(display_case("docker"), "Docker");
        assert_eq!(display_case("RUST"), "Rust");
        assert_eq!(display_case("jEnKiNs"), "Jenkins");
    }

    #[test]
    fn test_digit_bearing_upper_case() {
        assert_eq!(display_case("3d"), "3D");
        assert_eq!(display_case("es2015"), "ES2015");
        assert_eq!(display_case("k8s"), "K8S");
    }

    #[test]
    fn test_symbol_bearing_upper_case() {
        assert_eq!(display_case("c++"), "C++");
        assert_eq!(display_case("c#"), "C#");
        assert_eq!(display_case("node.js"), "NODE.JS");
    }

    #[test]
    fn test_phrase_recurses_per_word() {
        assert_eq!(display_case("machine learning"), "Machine Learning");
        assert_eq!(display_case("c++ templates"), "C++ Templates");
    }

    #[test]
    fn test_empty() {
        assert_eq!(display_case(""), "");
    }
}
