//! Error types for the fieldex-core library.

use thiserror::Error;

/// Main error type for the fieldex library.
#[derive(Error, Debug)]
pub enum FieldexError {
    /// A rule pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A rule file could not be parsed.
    #[error("invalid rules: {0}")]
    Rules(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A field pattern is not valid for the regex engine.
///
/// Carries the position of the offending rule so callers can point at it.
#[derive(Error, Debug)]
#[error("invalid pattern for field '{field}' in rule group {group}: {source}")]
pub struct PatternError {
    /// Zero-based index of the rule group in the input sequence.
    pub group: usize,
    /// Name of the field whose pattern failed.
    pub field: String,
    /// Underlying regex compilation error.
    #[source]
    pub source: regex::Error,
}

impl PatternError {
    pub fn new(group: usize, field: impl Into<String>, source: regex::Error) -> Self {
        Self {
            group,
            field: field.into(),
            source,
        }
    }
}

/// Result type for the fieldex library.
pub type Result<T> = std::result::Result<T, FieldexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_names_field_and_group() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = PatternError::new(3, "code", source);
        let message = err.to_string();

        assert!(message.contains("'code'"));
        assert!(message.contains("rule group 3"));
    }

    #[test]
    fn test_pattern_error_converts_transparently() {
        let source = regex::Regex::new("[").unwrap_err();
        let err: FieldexError = PatternError::new(0, "x", source).into();

        assert!(matches!(err, FieldexError::Pattern(_)));
        assert!(err.to_string().starts_with("invalid pattern for field 'x'"));
    }
}
