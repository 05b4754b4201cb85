//! # Locator Code Extractor
//!
//! Grammar-based extraction of named code definitions for feature localization.
//!
//! ## Architecture
//!
//! ```text
//! SourceFile[]
//!     │
//!     ├──> Grammar Detection (from extension)
//!     │      └─> unmapped extensions are skipped
//!     │
//!     ├──> Tree-sitter Parsing → AST
//!     │
//!     ├──> Definition Discovery
//!     │    ├─> Pattern query (definition + name captures)
//!     │    └─> Iterative fallback walk over known node kinds
//!     │
//!     └──> Normalization
//!          ├─> 1-indexed line span, exact content, one-line signature
//!          └─> Dedup on (file_path, name, start_line)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use locator_code_extractor::{Extractor, ExtractorConfig, SourceFile};
//!
//! let extractor = Extractor::new(ExtractorConfig::default());
//! let files = vec![SourceFile::new(
//!     "service.py",
//!     "def create_channel():\n    pass\n",
//! )];
//!
//! let definitions = extractor.extract(&files);
//! assert_eq!(definitions[0].name, "create_channel");
//! assert_eq!(definitions[0].signature, "def create_channel():");
//! ```

mod config;
mod error;
mod extractor;
mod language;
mod query;
mod traversal;
mod types;

pub use config::ExtractorConfig;
pub use error::{ExtractorError, Result};
pub use extractor::Extractor;
pub use language::Grammar;
pub use query::{CaptureKind, CaptureRole};
pub use types::{CodeDefinition, DefinitionKind, FileOutcome, SourceFile};
