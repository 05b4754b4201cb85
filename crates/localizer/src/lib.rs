//! # Locator Localizer
//!
//! Maps a natural-language problem statement to the code regions implementing
//! each of its features.
//!
//! ## Pipeline
//!
//! ```text
//! problem ──> FeatureExtraction ──> [feature 1..N]
//!                                       │
//!         ┌─────────────────────────────┴──────────────┐
//!         │ per feature, bounded concurrency            │   ExecutionPlan
//!         │  embed → semantic search → reasoning call   │   (concurrent)
//!         └─────────────────────────────┬──────────────┘        │
//!                                       ▼                       ▼
//!                      Aggregation (original feature order) ──> AnalysisReport
//! ```
//!
//! Only a failing feature extraction aborts a run. Per-feature failures become
//! entries without locations; semantic index failures fall back to the
//! budgeted structure alone.

mod config;
mod error;
mod http;
mod orchestrator;
pub mod prompts;
mod provider;
mod reply;
mod report;

pub use config::LocalizerConfig;
pub use error::{LocalizeError, Result};
pub use http::{OpenAiCompatClient, ReasoningConfig};
pub use orchestrator::FeatureLocalizer;
pub use provider::{ChatMessage, ErrorKind, ProviderError, ReasoningProvider, Role};
pub use reply::{strip_fences, FeatureListReply, LocalizationReply};
pub use report::{AnalysisReport, FeatureAnalysis, ImplementationLocation};
