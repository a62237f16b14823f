//! Rule definitions: named field patterns grouped into records.

use std::fmt;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FieldexError, Result};

/// A (field name, pattern) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPattern {
    /// Field name used as the key in the extraction result.
    pub name: String,
    /// Regular expression in `regex` crate syntax.
    pub pattern: String,
}

impl FieldPattern {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// An ordered set of field patterns evaluated together into one record.
///
/// Inserting a name that already exists replaces its pattern and keeps the
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleGroup {
    fields: Vec<FieldPattern>,
}

impl RuleGroup {
    /// Create an empty rule group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.insert(name, pattern);
        self
    }

    /// Insert a field. Returns the replaced pattern if the name was present.
    pub fn insert(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> Option<String> {
        let name = name.into();
        let pattern = pattern.into();

        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => Some(std::mem::replace(&mut existing.pattern, pattern)),
            None => {
                self.fields.push(FieldPattern { name, pattern });
                None
            }
        }
    }

    /// Pattern for a field, if defined.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.pattern.as_str())
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldPattern> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleGroup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut group = Self::new();
        for (name, pattern) in iter {
            group.insert(name, pattern);
        }
        group
    }
}

impl<'a> IntoIterator for &'a RuleGroup {
    type Item = &'a FieldPattern;
    type IntoIter = std::slice::Iter<'a, FieldPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for RuleGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.pattern)?;
        }
        map.end()
    }
}

// Deserialized through a map visitor so that object key order survives.
impl<'de> Deserialize<'de> for RuleGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RuleGroupVisitor;

        impl<'de> Visitor<'de> for RuleGroupVisitor {
            type Value = RuleGroup;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to regex patterns")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<RuleGroup, A::Error> {
                let mut group = RuleGroup::new();
                while let Some((name, pattern)) = access.next_entry::<String, String>()? {
                    if name.is_empty() {
                        return Err(de::Error::custom("field name must not be empty"));
                    }
                    group.insert(name, pattern);
                }
                Ok(group)
            }
        }

        deserializer.deserialize_map(RuleGroupVisitor)
    }
}

/// Parse rule groups from JSON text: either an array of groups or a single group.
pub fn parse_rules(json: &str) -> Result<Vec<RuleGroup>> {
    let parsed = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<RuleGroup>>(json)
    } else {
        serde_json::from_str::<RuleGroup>(json).map(|group| vec![group])
    };

    parsed.map_err(|e| {
        FieldexError::Rules(format!(
            "expected a JSON object of field patterns or an array of such objects ({})",
            e
        ))
    })
}

/// Load rule groups from a JSON file.
pub fn load_rules(path: &Path) -> Result<Vec<RuleGroup>> {
    let content = std::fs::read_to_string(path)?;
    parse_rules(&content).map_err(|e| match e {
        FieldexError::Rules(reason) => FieldexError::Rules(format!("{}: {}", path.display(), reason)),
        other => other,
    })
}
