//! Rendering of extraction batches as JSON, CSV, or a text report.

use fieldex_core::{ExtractionBatch, FieldValue, OutputConfig};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text report
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_batch(
    batch: &ExtractionBatch,
    format: OutputFormat,
    config: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            if config.pretty_json {
                Ok(serde_json::to_string_pretty(batch)?)
            } else {
                Ok(serde_json::to_string(batch)?)
            }
        }
        OutputFormat::Csv => format_csv(batch, config),
        OutputFormat::Text => Ok(format_text(batch)),
    }
}

/// Header of the CSV column holding the rule group index.
const GROUP_COLUMN: &str = "rule_group";

/// Union of field names across records, in first-seen order.
fn column_names(batch: &ExtractionBatch) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for name in batch.iter().flat_map(|result| result.names()) {
        if !columns.contains(&name) {
            columns.push(name);
        }
    }
    columns
}

fn format_csv(batch: &ExtractionBatch, config: &OutputConfig) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let columns = column_names(batch);

    if columns.contains(&GROUP_COLUMN) {
        anyhow::bail!(
            "Field name '{}' clashes with the CSV group index column",
            GROUP_COLUMN
        );
    }

    // Write header
    let mut header = vec![GROUP_COLUMN];
    header.extend(columns.iter().copied());
    wtr.write_record(&header)?;

    // One row per rule group
    for (index, result) in batch.iter().enumerate() {
        let mut row = vec![index.to_string()];
        for column in &columns {
            let cell = result
                .get(column)
                .and_then(|value| value.render(&config.list_separator, &config.group_separator))
                .unwrap_or_default();
            row.push(cell);
        }
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(batch: &ExtractionBatch) -> String {
    let mut output = String::new();

    for (index, result) in batch.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&format!(
            "Group {} ({}/{} fields matched):\n",
            index,
            result.matched_count(),
            result.len()
        ));

        for (name, value) in result.iter() {
            match value {
                FieldValue::Absent => output.push_str(&format!("  {}: -\n", name)),
                FieldValue::One(m) => output.push_str(&format!("  {}: {}\n", name, m)),
                FieldValue::Many(matches) => {
                    output.push_str(&format!("  {}: {} matches\n", name, matches.len()));
                    for m in matches {
                        output.push_str(&format!("    - {}\n", m));
                    }
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldex_core::{RuleGroup, extract};

    fn sample() -> ExtractionBatch {
        let groups = vec![
            RuleGroup::new()
                .with_field("id", r"id=(\d+)")
                .with_field("name", r"name=(\w+)"),
            RuleGroup::new()
                .with_field("pair", r"(\w+):(\d+)")
                .with_field("id", r"id=(\d+)"),
        ];
        extract("id=12 id=45 name=Bob", &groups).unwrap()
    }

    #[test]
    fn test_csv_uses_union_of_columns() {
        let csv = format_batch(&sample(), OutputFormat::Csv, &OutputConfig::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "rule_group,id,name,pair");
        assert_eq!(lines[1], "0,12; 45,Bob,");
        assert_eq!(lines[2], "1,12; 45,,");
    }

    #[test]
    fn test_csv_keeps_field_named_group_apart_from_index() {
        let groups = vec![RuleGroup::new().with_field("group", r"g=(\w+)")];
        let batch = extract("g=x", &groups).unwrap();

        let csv = format_batch(&batch, OutputFormat::Csv, &OutputConfig::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "rule_group,group");
        assert_eq!(lines[1], "0,x");
    }

    #[test]
    fn test_csv_rejects_field_named_like_index_column() {
        let groups = vec![RuleGroup::new().with_field("rule_group", "x")];
        let batch = extract("x", &groups).unwrap();

        let err = format_batch(&batch, OutputFormat::Csv, &OutputConfig::default()).unwrap_err();
        assert!(err.to_string().contains("rule_group"));
    }

    #[test]
    fn test_json_is_array_of_records() {
        let json = format_batch(&sample(), OutputFormat::Json, &OutputConfig::default()).unwrap();

        assert_eq!(
            json,
            r#"[{"id":["12","45"],"name":"Bob"},{"pair":null,"id":["12","45"]}]"#
        );
    }

    #[test]
    fn test_text_report_lists_every_field() {
        let text = format_batch(&sample(), OutputFormat::Text, &OutputConfig::default()).unwrap();

        assert!(text.contains("Group 0 (2/2 fields matched):"));
        assert!(text.contains("  id: 2 matches\n    - 12\n    - 45\n"));
        assert!(text.contains("  name: Bob\n"));
        assert!(text.contains("  pair: -\n"));
    }
}
