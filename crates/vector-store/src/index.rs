use crate::error::Result;
use crate::types::{IndexPayload, IndexPoint, SearchHit, SessionId};
use async_trait::async_trait;

/// Vector-similarity store scoped by session.
///
/// Every operation touches only the given session's partition.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    async fn upsert(
        &self,
        session: &SessionId,
        id: &str,
        vector: Vec<f32>,
        payload: IndexPayload,
    ) -> Result<()>;

    async fn upsert_batch(&self, session: &SessionId, points: Vec<IndexPoint>) -> Result<()> {
        for point in points {
            self.upsert(session, &point.id, point.vector, point.payload)
                .await?;
        }
        Ok(())
    }

    /// Up to `limit` hits with score at least `min_score`, best first
    async fn search(
        &self,
        session: &SessionId,
        vector: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchHit>>;

    async fn delete_session(&self, session: &SessionId) -> Result<()>;
}
