//! Multi-field, multi-pattern extraction.
//!
//! Every field pattern of every rule group is evaluated independently against
//! the same document. Each field's matches are collapsed by count:
//!
//! - no match: [`FieldValue::Absent`]
//! - one match: [`FieldValue::One`], not wrapped in a list
//! - two or more: [`FieldValue::Many`], in document order
//!
//! The one-versus-many asymmetry is intentional and observable; integrators
//! expecting a list in every case should go through [`FieldValue::to_vec`].

mod field;

pub use field::{CompiledField, FieldExtractor};

use tracing::{debug, trace};

use crate::error::PatternError;
use crate::models::{ExtractionBatch, ExtractionConfig, ExtractionResult, RuleGroup};

/// Extract every rule group from a document.
///
/// Patterns are compiled on each call. Use [`CompiledRules`] to reuse them
/// across documents.
///
/// # Errors
///
/// Returns a [`PatternError`] for the first pattern that fails to compile;
/// no partial batch is produced.
pub fn extract(document: &str, rule_groups: &[RuleGroup]) -> Result<ExtractionBatch, PatternError> {
    Ok(CompiledRules::compile(rule_groups)?.apply(document))
}

/// Rule groups with all patterns compiled, ready to apply to many documents.
///
/// Immutable after construction, so a single instance can be shared between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    groups: Vec<Vec<CompiledField>>,
}

impl CompiledRules {
    /// Compile with default limits.
    pub fn compile(rule_groups: &[RuleGroup]) -> Result<Self, PatternError> {
        Self::compile_with(rule_groups, &ExtractionConfig::default())
    }

    /// Compile with explicit limits.
    pub fn compile_with(
        rule_groups: &[RuleGroup],
        config: &ExtractionConfig,
    ) -> Result<Self, PatternError> {
        let groups = rule_groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                group
                    .iter()
                    .map(|field| {
                        CompiledField::compile(&field.name, &field.pattern, config)
                            .map_err(|e| PatternError::new(index, &field.name, e))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Compiled {} rule groups ({} fields)",
            groups.len(),
            groups.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Self { groups })
    }

    /// Apply every group to a document.
    pub fn apply(&self, document: &str) -> ExtractionBatch {
        let batch: ExtractionBatch = self
            .groups
            .iter()
            .map(|fields| Self::apply_group(fields, document))
            .collect();

        debug!(
            "Extracted {} records from {} bytes",
            batch.len(),
            document.len()
        );

        batch
    }

    fn apply_group(fields: &[CompiledField], document: &str) -> ExtractionResult {
        let mut result = ExtractionResult::with_capacity(fields.len());

        for field in fields {
            let value = field.evaluate(document);
            trace!("Field '{}' matched {} times", field.name(), value.count());
            result.push(field.name(), value);
        }

        result
    }

    /// Number of rule groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Compiled fields of one group.
    pub fn group(&self, index: usize) -> Option<&[CompiledField]> {
        self.groups.get(index).map(Vec::as_slice)
    }

    /// (field name, capture-group count) for each field of a group.
    pub fn group_arity(&self, index: usize) -> Option<Vec<(&str, usize)>> {
        self.group(index)
            .map(|fields| fields.iter().map(|f| (f.name(), f.arity())).collect())
    }
}

/// Evaluate a single rule group.
pub fn extract_group(document: &str, group: &RuleGroup) -> Result<ExtractionResult, PatternError> {
    let mut batch = extract(document, std::slice::from_ref(group))?;
    Ok(batch.pop().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaptureTuple, FieldValue, MatchValue};
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> MatchValue {
        MatchValue::from(s)
    }

    #[test]
    fn test_repeated_and_single_fields() {
        let group = RuleGroup::new()
            .with_field("id", r"id=(\d+)")
            .with_field("name", r"name=(\w+)");

        let batch = extract("id=12 id=45 name=Bob", &[group]).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch[0].get("id"),
            Some(&FieldValue::Many(vec![text("12"), text("45")]))
        );
        assert_eq!(batch[0].get("name"), Some(&FieldValue::One(text("Bob"))));
        assert_eq!(batch[0].get("name").and_then(FieldValue::as_text), Some("Bob"));
    }

    #[test]
    fn test_no_match_is_absent_not_dropped() {
        let group = RuleGroup::new().with_field("code", r"C\d{3}");

        let batch = extract("no codes here", &[group]).unwrap();

        assert_eq!(batch[0].len(), 1);
        assert_eq!(batch[0].get("code"), Some(&FieldValue::Absent));
    }

    #[test]
    fn test_empty_document_matches_empty_string_once() {
        let group = RuleGroup::new().with_field("x", ".*");

        let batch = extract("", &[group]).unwrap();

        assert_eq!(batch[0].get("x"), Some(&FieldValue::One(text(""))));
    }

    #[test]
    fn test_empty_rule_list_gives_empty_batch() {
        assert!(extract("anything", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_group_gives_empty_result() {
        let batch = extract("anything", &[RuleGroup::new(), RuleGroup::new()]).unwrap();

        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(ExtractionResult::is_empty));
    }

    #[test]
    fn test_batch_mirrors_group_order() {
        let groups = vec![
            RuleGroup::new().with_field("b", "b"),
            RuleGroup::new().with_field("a", "a"),
            RuleGroup::new().with_field("c", "c"),
        ];

        let batch = extract("abc", &groups).unwrap();
        let names: Vec<_> = batch.iter().flat_map(|r| r.names()).collect();

        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_multi_group_pattern_keeps_tuple_shape() {
        let group = RuleGroup::new().with_field("pair", r"(\w)=(\d)");

        let result = extract_group("a=1", &group).unwrap();

        assert_eq!(
            result.get("pair"),
            Some(&FieldValue::One(MatchValue::Groups(CaptureTuple::new(vec![
                "a".to_string(),
                "1".to_string(),
            ]))))
        );
    }

    #[test]
    fn test_invalid_pattern_aborts_batch() {
        let groups = vec![
            RuleGroup::new().with_field("ok", "ok"),
            RuleGroup::new()
                .with_field("fine", "x")
                .with_field("bad", "(unclosed"),
        ];

        let err = extract("ok", &groups).unwrap_err();

        assert_eq!(err.group, 1);
        assert_eq!(err.field, "bad");
    }

    #[test]
    fn test_compiled_rules_reusable_and_idempotent() {
        let rules = CompiledRules::compile(&[RuleGroup::new().with_field("n", r"\d+")]).unwrap();

        let first = rules.apply("1 2 3");
        let second = rules.apply("1 2 3");
        let other = rules.apply("7");

        assert_eq!(first, second);
        assert_eq!(first[0].get("n").map(FieldValue::count), Some(3));
        assert_eq!(other[0].get("n"), Some(&FieldValue::One(text("7"))));
    }

    #[test]
    fn test_group_arity() {
        let group = RuleGroup::new()
            .with_field("whole", r"\d+")
            .with_field("one", r"(\d+)")
            .with_field("two", r"(\d+)-(\d+)");
        let rules = CompiledRules::compile(&[group]).unwrap();

        assert_eq!(
            rules.group_arity(0),
            Some(vec![("whole", 0), ("one", 1), ("two", 2)])
        );
        assert_eq!(rules.group_arity(1), None);
    }

    #[test]
    fn test_compiled_rules_shared_across_threads() {
        let rules = CompiledRules::compile(&[RuleGroup::new().with_field("w", r"\w+")]).unwrap();
        let expected = rules.apply("alpha beta");
        let rules = &rules;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || rules.apply("alpha beta")))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
