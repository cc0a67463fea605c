/// True when `text` contains any of `keywords` (case-insensitive)
pub fn contains_any_keyword<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .any(|k| lowered.contains(&k.as_ref().to_lowercase()))
}

/// Build a pattern that matches `token` only when it is not glued to ASCII
/// word characters, e.g. `HK` in `HK-01` or `香港 HK` but not in `HK01`.
pub fn ascii_word_pattern(token: &str, case_insensitive: bool) -> String {
    format!(
        "{}(?:^|[^A-Za-z0-9_]){}(?:$|[^A-Za-z0-9_])",
        if case_insensitive { "(?i)" } else { "" },
        regex::escape(token)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_keyword_lookup() {
        assert!(contains_any_keyword("♻️ 自动选择", &["自动"]));
        assert!(contains_any_keyword("Auto Select", &["auto"]));
        assert!(!contains_any_keyword("Manual", &["auto", "故障"]));
        assert!(contains_any_keyword("ChatGPT Nodes", &["Claude", "chatgpt"]));
        assert!(!contains_any_keyword::<&str>("Nodes", &[]));
    }

    #[test]
    fn test_ascii_word_pattern() {
        let re = Regex::new(&ascii_word_pattern("HK", true)).unwrap();
        assert!(re.is_match("HK"));
        assert!(re.is_match("hk-01"));
        assert!(re.is_match("香港 HK 01"));
        assert!(re.is_match("香港HK"));
        assert!(!re.is_match("HK01"));
        assert!(!re.is_match("HKG"));
        assert!(!re.is_match("THK"));
    }
}
