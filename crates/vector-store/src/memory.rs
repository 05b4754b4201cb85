use crate::embeddings::cosine_similarity;
use crate::error::{Result, VectorStoreError};
use crate::index::SemanticIndex;
use crate::types::{IndexPayload, IndexPoint, SearchHit, SessionId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

type Partition = HashMap<String, (Vec<f32>, IndexPayload)>;

/// Brute-force cosine index partitioned by session
pub struct InMemoryIndex {
    dimension: usize,
    sessions: RwLock<HashMap<SessionId, Partition>>,
}

impl InMemoryIndex {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of points stored for a session
    pub async fn len(&self, session: &SessionId) -> usize {
        self.sessions
            .read()
            .await
            .get(session)
            .map_or(0, HashMap::len)
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SemanticIndex for InMemoryIndex {
    async fn upsert(
        &self,
        session: &SessionId,
        id: &str,
        vector: Vec<f32>,
        payload: IndexPayload,
    ) -> Result<()> {
        self.check_dimension(&vector)?;
        self.sessions
            .write()
            .await
            .entry(*session)
            .or_default()
            .insert(id.to_string(), (vector, payload));
        Ok(())
    }

    async fn upsert_batch(&self, session: &SessionId, points: Vec<IndexPoint>) -> Result<()> {
        for point in &points {
            self.check_dimension(&point.vector)?;
        }
        let mut sessions = self.sessions.write().await;
        let partition = sessions.entry(*session).or_default();
        for point in points {
            partition.insert(point.id, (point.vector, point.payload));
        }
        Ok(())
    }

    async fn search(
        &self,
        session: &SessionId,
        vector: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchHit>> {
        self.check_dimension(vector)?;

        let sessions = self.sessions.read().await;
        let Some(partition) = sessions.get(session) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<SearchHit> = partition
            .iter()
            .map(|(id, (stored, payload))| SearchHit {
                id: id.clone(),
                payload: payload.clone(),
                score: cosine_similarity(vector, stored),
            })
            .filter(|hit| hit.score >= min_score)
            .collect();

        // Sort by score descending, id breaks ties
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);

        Ok(hits)
    }

    async fn delete_session(&self, session: &SessionId) -> Result<()> {
        self.sessions.write().await.remove(session);
        Ok(())
    }
}
