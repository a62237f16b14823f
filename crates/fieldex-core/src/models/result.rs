//! Extraction results and the zero/one/many normalization.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Captures of a pattern with two or more capture groups, one entry per group.
///
/// A group that did not take part in the match holds an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CaptureTuple(Vec<String>);

impl CaptureTuple {
    pub fn new(groups: Vec<String>) -> Self {
        Self(groups)
    }

    /// Number of capture groups in the originating pattern.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Capture at a zero-based group position (group 1 is index 0).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Join captures with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

/// A single match of a field pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MatchValue {
    /// Whole match (no capture groups) or the single capture group's text.
    Text(String),
    /// Per-group captures when the pattern has several capture groups.
    Groups(CaptureTuple),
}

impl MatchValue {
    /// Text of a single-text match.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Groups(_) => None,
        }
    }

    /// Captures of a multi-group match.
    pub fn as_groups(&self) -> Option<&CaptureTuple> {
        match self {
            Self::Text(_) => None,
            Self::Groups(groups) => Some(groups),
        }
    }

    /// Flatten to a single string, joining tuple captures with `group_separator`.
    pub fn render(&self, group_separator: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Groups(groups) => groups.join(group_separator),
        }
    }
}

impl From<&str> for MatchValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MatchValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Display for MatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Groups(groups) => write!(f, "({})", groups.join(", ")),
        }
    }
}

/// Value of one field after match-count normalization.
///
/// Exactly one match is returned unwrapped as [`FieldValue::One`], while two or
/// more come back as [`FieldValue::Many`]. Callers that want a uniform list
/// regardless of count should use [`FieldValue::to_vec`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The pattern did not match.
    #[default]
    Absent,
    /// The pattern matched exactly once.
    One(MatchValue),
    /// The pattern matched two or more times, in document order.
    Many(Vec<MatchValue>),
}

impl FieldValue {
    /// Normalize a list of matches: 0 → Absent, 1 → One, 2+ → Many.
    pub fn from_matches(mut matches: Vec<MatchValue>) -> Self {
        match matches.len() {
            0 => Self::Absent,
            1 => matches.pop().map_or(Self::Absent, Self::One),
            _ => Self::Many(matches),
        }
    }

    /// Text of a single-text [`FieldValue::One`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::One(value) => value.as_text(),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Number of matches represented.
    pub fn count(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::One(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    /// The first match, if any.
    pub fn first(&self) -> Option<&MatchValue> {
        self.iter().next()
    }

    /// Iterate over matches regardless of shape.
    pub fn iter(&self) -> std::slice::Iter<'_, MatchValue> {
        match self {
            Self::Absent => std::slice::Iter::default(),
            Self::One(value) => std::slice::from_ref(value).iter(),
            Self::Many(values) => values.iter(),
        }
    }

    /// All matches as a list.
    pub fn to_vec(&self) -> Vec<MatchValue> {
        self.iter().cloned().collect()
    }

    /// Flatten into one cell. `None` when absent.
    pub fn render(&self, list_separator: &str, group_separator: &str) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::One(value) => Some(value.render(group_separator)),
            Self::Many(values) => Some(
                values
                    .iter()
                    .map(|v| v.render(group_separator))
                    .collect::<Vec<_>>()
                    .join(list_separator),
            ),
        }
    }
}

/// One record: field name to value, in rule-group order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    fields: Vec<(String, FieldValue)>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    /// Value for a field name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// (name, value) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields that matched at least once.
    pub fn matched_count(&self) -> usize {
        self.fields.iter().filter(|(_, v)| !v.is_absent()).count()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (name, value) in iter {
            result.push(name, value);
        }
        result
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Results for every rule group of one invocation, in input order.
pub type ExtractionBatch = Vec<ExtractionResult>;
