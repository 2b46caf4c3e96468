//! Recognizing diagram source blocks in rendered content.

/// CSS selector matching code elements that hold `language` diagram source,
/// marked either by a `language-*` class or a `data-lang` attribute.
pub fn block_selector(language: &str) -> String {
    let lang = language.trim();
    format!("pre code.language-{lang}, pre code[data-lang='{lang}']")
}

/// Whether `language` can be embedded in [`block_selector`] as is:
/// ASCII letters, digits, `-` and `_` only.
pub fn is_language_token(language: &str) -> bool {
    !language.is_empty() && language.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Diagram definition carried by a block's raw text content.
pub fn source_text(raw: &str) -> &str { raw.trim() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_covers_class_and_data_attribute() {
        assert_eq!(
            block_selector("mermaid"),
            "pre code.language-mermaid, pre code[data-lang='mermaid']"
        );
    }

    #[test]
    fn language_tokens_exclude_selector_syntax() {
        assert!(is_language_token("mermaid"));
        assert!(is_language_token("plant_uml-2"));
        assert!(!is_language_token(""));
        assert!(!is_language_token("a'b"));
        assert!(!is_language_token("two words"));
        assert!(!is_language_token("x],pre"));
    }

    #[test]
    fn source_is_trimmed() {
        assert_eq!(source_text("\n  graph TD;\n  A-->B\n\n"), "graph TD;\n  A-->B");
    }
}
