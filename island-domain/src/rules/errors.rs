use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule condition carries a pattern the regex engine rejects. Never
    /// surfaced to callers; the condition evaluates to "no match".
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_regex_display_names_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = RuleError::InvalidRegex { pattern: "(unclosed".to_string(), source };
        assert!(err.to_string().starts_with("Invalid regex pattern '(unclosed': "));
    }
}
