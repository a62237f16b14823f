//! A single compiled field pattern.

use regex::{Captures, Regex, RegexBuilder};

use crate::models::{CaptureTuple, ExtractionConfig, FieldValue, MatchValue};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all non-overlapping occurrences, left to right.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A field name bound to its compiled pattern.
#[derive(Debug, Clone)]
pub struct CompiledField {
    name: String,
    regex: Regex,
}

impl CompiledField {
    /// Compile a pattern with the given limits.
    pub fn compile(
        name: impl Into<String>,
        pattern: &str,
        config: &ExtractionConfig,
    ) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .size_limit(config.size_limit)
            .dfa_size_limit(config.dfa_size_limit)
            .build()?;

        Ok(Self {
            name: name.into(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of explicit capture groups (the implicit whole-match group is
    /// not counted).
    pub fn arity(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Evaluate against a document and normalize the match count.
    pub fn evaluate(&self, text: &str) -> FieldValue {
        FieldValue::from_matches(self.extract_all(text))
    }

    fn match_value(&self, caps: &Captures<'_>) -> MatchValue {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();

        match self.arity() {
            0 => MatchValue::Text(group(0)),
            1 => MatchValue::Text(group(1)),
            n => MatchValue::Groups(CaptureTuple::new((1..=n).map(group).collect())),
        }
    }
}

impl FieldExtractor for CompiledField {
    type Output = MatchValue;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if self.arity() == 0 {
            return self.regex.find(text).map(|m| MatchValue::from(m.as_str()));
        }
        self.regex.captures(text).map(|caps| self.match_value(&caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        // Capture slots are only resolved when the pattern has groups.
        if self.arity() == 0 {
            return self
                .regex
                .find_iter(text)
                .map(|m| MatchValue::from(m.as_str()))
                .collect();
        }

        self.regex
            .captures_iter(text)
            .map(|caps| self.match_value(&caps))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(pattern: &str) -> CompiledField {
        CompiledField::compile("f", pattern, &ExtractionConfig::default()).unwrap()
    }

    fn tuple(groups: &[&str]) -> MatchValue {
        MatchValue::Groups(CaptureTuple::new(groups.iter().map(|g| g.to_string()).collect()))
    }

    #[test]
    fn test_whole_match_without_groups() {
        let f = field(r"C\d{3}");

        assert_eq!(f.arity(), 0);
        assert_eq!(
            f.extract_all("C100 x C200"),
            vec![MatchValue::from("C100"), MatchValue::from("C200")]
        );
    }

    #[test]
    fn test_single_group_yields_group_text() {
        let f = field(r"id=(\d+)");

        assert_eq!(f.arity(), 1);
        assert_eq!(f.extract("id=7 id=8"), Some(MatchValue::from("7")));
    }

    #[test]
    fn test_multiple_groups_yield_tuples() {
        let f = field(r"(\w+)=(\d+)");

        assert_eq!(
            f.extract_all("a=1 b=2"),
            vec![tuple(&["a", "1"]), tuple(&["b", "2"])]
        );
    }

    #[test]
    fn test_non_participating_group_is_empty() {
        let f = field(r"(a)|(b)");

        assert_eq!(f.extract_all("b"), vec![tuple(&["", "b"])]);
    }

    #[test]
    fn test_non_capturing_groups_do_not_count() {
        let f = field(r"(?:x|y)(\d)");

        assert_eq!(f.arity(), 1);
        assert_eq!(f.evaluate("x1"), FieldValue::One(MatchValue::from("1")));
    }

    #[test]
    fn test_size_limit_rejects_large_pattern() {
        let config = ExtractionConfig {
            size_limit: 64,
            ..ExtractionConfig::default()
        };

        assert!(CompiledField::compile("f", r"\w{1000}", &config).is_err());
    }
}
