//! # Locator Vector Store
//!
//! Session-scoped semantic index over code definitions.
//!
//! ## Architecture
//!
//! ```text
//! CodeDefinition[]
//!     │
//!     ├──> EmbeddingProvider (Ollama or offline hashing)
//!     │      └─> Vec<f32>
//!     │
//!     └──> SemanticIndex (partitioned by SessionId)
//!            ├─> upsert / upsert_batch
//!            ├─> search(limit, min_score)
//!            └─> delete_session
//! ```
//!
//! ## Example
//!
//! ```rust
//! use locator_vector_store::{
//!     DefinitionIndexer, EmbeddingProvider, HashingEmbedder, InMemoryIndex, SessionId,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> locator_vector_store::Result<()> {
//! let embedder = Arc::new(HashingEmbedder::default());
//! let index = Arc::new(InMemoryIndex::new(embedder.dimension()));
//! let indexer = DefinitionIndexer::new(embedder, index);
//!
//! let session = SessionId::new();
//! let hits = indexer.search(&session, "create channel", 5, 0.3).await?;
//! assert!(hits.is_empty());
//! # Ok(())
//! # }
//! ```

mod embeddings;
mod error;
mod index;
mod indexer;
mod memory;
mod ollama;
mod types;

pub use embeddings::{cosine_similarity, EmbeddingProvider, HashingEmbedder};
pub use error::{Result, VectorStoreError};
pub use index::SemanticIndex;
pub use indexer::{index_text, point_id, DefinitionIndexer, DEFAULT_BATCH_SIZE};
pub use memory::InMemoryIndex;
pub use ollama::{OllamaConfig, OllamaEmbedder};
pub use types::{IndexPayload, IndexPoint, SearchHit, SessionId, PAYLOAD_CONTENT_MAX_CHARS};
