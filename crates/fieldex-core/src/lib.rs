//! Core library for multi-field regex extraction.
//!
//! This crate provides:
//! - Rule groups: ordered field-name to pattern mappings, loadable from JSON
//! - The extractor: one record per rule group, with zero/one/many normalization
//! - Built-in presets for common identifiers
//! - Configuration for pattern limits and output rendering
//!
//! ```
//! use fieldex_core::{extract, FieldValue, RuleGroup};
//!
//! let group = RuleGroup::new()
//!     .with_field("id", r"id=(\d+)")
//!     .with_field("name", r"name=(\w+)");
//!
//! let batch = extract("id=12 id=45 name=Bob", &[group]).unwrap();
//! assert_eq!(batch[0].get("id").map(FieldValue::count), Some(2));
//! assert_eq!(batch[0].get("name").and_then(FieldValue::as_text), Some("Bob"));
//! ```

pub mod error;
pub mod extract;
pub mod models;
pub mod presets;

pub use error::{FieldexError, PatternError, Result};
pub use extract::{CompiledField, CompiledRules, FieldExtractor, extract, extract_group};
pub use models::config::{ExtractionConfig, FieldexConfig, OutputConfig};
pub use models::result::{CaptureTuple, ExtractionBatch, ExtractionResult, FieldValue, MatchValue};
pub use models::rules::{FieldPattern, RuleGroup, load_rules, parse_rules};
