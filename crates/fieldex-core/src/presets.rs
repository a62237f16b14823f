//! Built-in rule groups for common identifiers.

use crate::models::RuleGroup;

const CONTACT: &[(&str, &str)] = &[
    ("email", r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"),
    ("phone", r"\+?\d{1,3}[\s\-]?\(?\d{2,4}\)?[\s\-]?\d{3}[\s\-]?\d{3,4}"),
    ("url", r"https?://[^\s<>()]+"),
];

const DATES: &[(&str, &str)] = &[
    ("iso_date", r"\b(\d{4})-(\d{2})-(\d{2})\b"),
    ("dmy_date", r"\b\d{1,2}[./]\d{1,2}[./]\d{4}\b"),
];

// Fields of bond reference listings (ISIN, code, issuer, type, issue date, rating).
const BOND: &[(&str, &str)] = &[
    ("isin", r"\b[A-Z]{2}[A-Z0-9]{9}\d\b"),
    ("bond_code", r"(?i)bond\s+code[\s:]*(\d{6,9})"),
    ("issuer", r"(?i)issuer[\s:]+([^\n,;]+?)\s*(?:[,;\n]|$)"),
    ("bond_type", r"(?i)bond\s+type[\s:]+([^\n,;]+?)\s*(?:[,;\n]|$)"),
    ("issue_date", r"(?i)issue\s+date[\s:]*(\d{4}-\d{2}-\d{2})"),
    ("rating", r"(?i)rating[\s:]*([ABCD]{1,3}[+-]?)"),
];

const MONEY: &[(&str, &str)] = &[(
    "amount",
    r"(\d{1,3}(?:[\s\u{00a0},]?\d{3})*(?:\.\d{2})?)\s*(USD|EUR|GBP|CNY|PLN|\$|€|£|¥)",
)];

const PRESETS: &[(&str, &[(&str, &str)])] = &[
    ("contact", CONTACT),
    ("dates", DATES),
    ("bond", BOND),
    ("money", MONEY),
];

/// Names of all built-in presets.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

/// Look up a preset by name.
pub fn get(name: &str) -> Option<RuleGroup> {
    PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|(_, fields)| fields.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{CompiledRules, extract_group};
    use crate::models::{FieldValue, MatchValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_presets_compile() {
        let groups: Vec<RuleGroup> = names().filter_map(get).collect();

        assert_eq!(groups.len(), PRESETS.len());
        assert!(CompiledRules::compile(&groups).is_ok());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(get("BOND").is_some());
        assert!(get("missing").is_none());
    }

    #[test]
    fn test_bond_preset() {
        let text = "ISIN: CN1234567890\nBond Code: 230001\nIssuer: Ministry of Finance\n\
                    Bond Type: Treasury Bond\nIssue Date: 2023-01-15\nLatest Rating: AAA\n";

        let result = extract_group(text, &get("bond").unwrap()).unwrap();

        assert_eq!(result.get("isin").and_then(FieldValue::as_text), Some("CN1234567890"));
        assert_eq!(result.get("bond_code").and_then(FieldValue::as_text), Some("230001"));
        assert_eq!(result.get("issuer").and_then(FieldValue::as_text), Some("Ministry of Finance"));
        assert_eq!(result.get("bond_type").and_then(FieldValue::as_text), Some("Treasury Bond"));
        assert_eq!(result.get("issue_date").and_then(FieldValue::as_text), Some("2023-01-15"));
        assert_eq!(result.get("rating").and_then(FieldValue::as_text), Some("AAA"));
    }

    #[test]
    fn test_dates_preset_shapes() {
        let text = "from 2023-01-15 to 2023-03-20, signed 05.09.2023";

        let result = extract_group(text, &get("dates").unwrap()).unwrap();

        assert_eq!(result.get("iso_date").map(FieldValue::count), Some(2));
        assert_eq!(
            result
                .get("iso_date")
                .and_then(FieldValue::first)
                .and_then(MatchValue::as_groups)
                .map(|g| g.arity()),
            Some(3)
        );
        assert_eq!(result.get("dmy_date").and_then(FieldValue::as_text), Some("05.09.2023"));
    }
}
