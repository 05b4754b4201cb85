use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use crate::index::SemanticIndex;
use crate::types::{IndexPayload, IndexPoint, SearchHit, SessionId};
use locator_code_extractor::CodeDefinition;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Definitions embedded and written per round trip
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Content characters included in the embedded text
const EMBED_CONTENT_CHARS: usize = 500;

/// Embeds definitions and writes them into a session's index partition
pub struct DefinitionIndexer {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SemanticIndex>,
    batch_size: usize,
}

impl DefinitionIndexer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn SemanticIndex>) -> Self {
        Self {
            embedder,
            index,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Index every definition; returns the number of points written
    pub async fn index_definitions(
        &self,
        session: &SessionId,
        definitions: &[CodeDefinition],
    ) -> Result<usize> {
        let mut written = 0usize;
        for batch in definitions.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(index_text).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(VectorStoreError::EmbeddingError(format!(
                    "embedder returned {} vectors for {} texts",
                    vectors.len(),
                    batch.len()
                )));
            }

            let points = batch
                .iter()
                .zip(vectors)
                .map(|(definition, vector)| IndexPoint {
                    id: point_id(definition),
                    vector,
                    payload: IndexPayload::from(definition),
                })
                .collect();
            self.index.upsert_batch(session, points).await?;
            written += batch.len();
            log::debug!("Indexed {written}/{} definitions", definitions.len());
        }

        log::info!("Indexed {written} definitions for session {session}");
        Ok(written)
    }

    /// Embed a query and search the session
    pub async fn search(
        &self,
        session: &SessionId,
        query: &str,
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchHit>> {
        let vector = self.embedder.embed(query).await?;
        self.index.search(session, &vector, limit, min_score).await
    }

    pub async fn clear(&self, session: &SessionId) -> Result<()> {
        self.index.delete_session(session).await
    }
}

/// Text embedded for a definition: kind, name, signature and a content prefix
pub fn index_text(definition: &CodeDefinition) -> String {
    let excerpt: String = definition.content.chars().take(EMBED_CONTENT_CHARS).collect();
    format!(
        "{} {}\n{}\n{}",
        definition.definition_type, definition.name, definition.signature, excerpt
    )
}

/// Stable point id derived from the definition's identity key
pub fn point_id(definition: &CodeDefinition) -> String {
    let mut hasher = Sha256::new();
    hasher.update(
        format!(
            "{}:{}:{}",
            definition.file_path, definition.start_line, definition.name
        )
        .as_bytes(),
    );
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashingEmbedder;
    use crate::memory::InMemoryIndex;
    use locator_code_extractor::DefinitionKind;

    fn def(name: &str, start: usize) -> CodeDefinition {
        CodeDefinition {
            file_path: "chat/service.py".to_string(),
            name: name.to_string(),
            definition_type: DefinitionKind::Function,
            start_line: start,
            end_line: start + 1,
            content: format!("def {name}():\n    pass"),
            signature: format!("def {name}():"),
        }
    }

    #[test]
    fn test_point_id_is_stable_and_keyed() {
        let a = def("create_channel", 1);
        assert_eq!(point_id(&a), point_id(&a.clone()));
        assert_eq!(point_id(&a).len(), 64);
        assert_ne!(point_id(&a), point_id(&def("create_channel", 5)));
    }

    #[test]
    fn test_index_text_layout() {
        let text = index_text(&def("create_channel", 1));
        assert_eq!(
            text,
            "function create_channel\ndef create_channel():\ndef create_channel():\n    pass"
        );
    }

    #[tokio::test]
    async fn test_index_and_search_in_batches() {
        let embedder = Arc::new(HashingEmbedder::default());
        let index = Arc::new(InMemoryIndex::new(embedder.dimension()));
        let indexer = DefinitionIndexer::new(embedder, index.clone()).with_batch_size(2);
        let session = SessionId::new();

        let defs = vec![
            def("create_channel", 1),
            def("list_messages", 4),
            def("delete_channel", 7),
            def("send_invoice", 10),
            def("render_avatar", 13),
        ];
        let written = indexer.index_definitions(&session, &defs).await.unwrap();
        assert_eq!(written, 5);
        assert_eq!(index.len(&session).await, 5);

        let hits = indexer.search(&session, "create channel", 5, 0.3).await.unwrap();
        assert_eq!(hits[0].payload.name, "create_channel");
        assert!(hits.iter().all(|h| h.score >= 0.3));

        indexer.clear(&session).await.unwrap();
        assert_eq!(index.len(&session).await, 0);
    }
}
