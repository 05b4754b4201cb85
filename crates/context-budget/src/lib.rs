//! # Locator Context Budget
//!
//! Deterministic, size-bounded rendering of code definitions for use as model context.
//!
//! ## Rendering
//!
//! ```text
//! ## path/to/file.py
//! - [class] Service (lines 1-40) | class Service:
//! class Service:
//!     // ... nested definitions listed below
//!   - [method] run (lines 3-12) | def run(self):
//!   <method source>
//! ```
//!
//! Files are sorted by path and definitions by start line. Oversized definitions
//! with nested children are reduced to their declaration and the children are
//! rendered on their own; oversized leaves are split into `part i/n` blocks.
//! Once the character budget runs out, the remaining definitions keep only
//! their header line.
//!
//! ## Example
//!
//! ```rust
//! use locator_code_extractor::{CodeDefinition, DefinitionKind};
//! use locator_context_budget::serialize;
//!
//! let definitions = vec![CodeDefinition {
//!     file_path: "service.py".to_string(),
//!     name: "create_channel".to_string(),
//!     definition_type: DefinitionKind::Function,
//!     start_line: 1,
//!     end_line: 2,
//!     content: "def create_channel():\n    pass".to_string(),
//!     signature: "def create_channel():".to_string(),
//! }];
//!
//! let text = serialize(&definitions, 1000, 50_000);
//! assert!(text.starts_with("## service.py\n"));
//! assert!(text.contains("- [function] create_channel (lines 1-2)"));
//! ```

mod chunk;
mod config;
mod render;
mod tree;

pub use config::{BudgetConfig, MAX_RECURSION_DEPTH};
pub use render::{render, Rendered};

use locator_code_extractor::CodeDefinition;

/// Render definitions with the default chunking policy and the given limits
#[must_use]
pub fn serialize(
    definitions: &[CodeDefinition],
    max_block_chars: usize,
    max_total_chars: usize,
) -> String {
    serialize_with(
        definitions,
        &BudgetConfig::with_limits(max_block_chars, max_total_chars),
    )
}

#[must_use]
pub fn serialize_with(definitions: &[CodeDefinition], config: &BudgetConfig) -> String {
    render(definitions, config).text
}

/// Header lines only, one per definition
#[must_use]
pub fn outline(definitions: &[CodeDefinition], config: &BudgetConfig) -> String {
    let headers_only = BudgetConfig {
        max_total_chars: 0,
        ..config.clone()
    };
    serialize_with(definitions, &headers_only)
}
