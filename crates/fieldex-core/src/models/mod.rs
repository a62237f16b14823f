//! Data models for rules, results, and configuration.

pub mod config;
pub mod result;
pub mod rules;

pub use config::{ExtractionConfig, FieldexConfig, OutputConfig};
pub use result::{CaptureTuple, ExtractionBatch, ExtractionResult, FieldValue, MatchValue};
pub use rules::{FieldPattern, RuleGroup, load_rules, parse_rules};
