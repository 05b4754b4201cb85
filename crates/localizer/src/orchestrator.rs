use crate::config::LocalizerConfig;
use crate::error::{LocalizeError, Result};
use crate::prompts;
use crate::provider::{ProviderError, ReasoningProvider};
use crate::reply::{FeatureListReply, LocalizationReply};
use crate::report::{AnalysisReport, FeatureAnalysis, ImplementationLocation};
use locator_code_extractor::CodeDefinition;
use locator_context_budget::serialize_with;
use locator_vector_store::{EmbeddingProvider, SearchHit, SemanticIndex, SessionId};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs feature extraction, per-feature localization and the execution plan.
///
/// Cloning is cheap; clones share the provider handles.
#[derive(Clone)]
pub struct FeatureLocalizer {
    reasoning: Arc<dyn ReasoningProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SemanticIndex>,
    config: LocalizerConfig,
}

impl FeatureLocalizer {
    pub fn new(
        reasoning: Arc<dyn ReasoningProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SemanticIndex>,
        config: LocalizerConfig,
    ) -> Self {
        Self {
            reasoning,
            embedder,
            index,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    /// Full analysis under the end-to-end timeout; nothing is kept on expiry
    pub async fn generate_report(
        &self,
        problem: &str,
        definitions: Vec<CodeDefinition>,
        session: &SessionId,
    ) -> Result<AnalysisReport> {
        let timeout = self.config.request_timeout();
        match tokio::time::timeout(timeout, self.run(problem, definitions, *session)).await {
            Ok(result) => result,
            Err(_) => {
                log::error!("Analysis abandoned after {timeout:?}");
                Err(LocalizeError::Timeout(timeout))
            }
        }
    }

    async fn run(
        &self,
        problem: &str,
        definitions: Vec<CodeDefinition>,
        session: SessionId,
    ) -> Result<AnalysisReport> {
        let budget = self.config.budget();
        let structure = tokio::task::spawn_blocking(move || serialize_with(&definitions, &budget))
            .await
            .map_err(|e| LocalizeError::Internal(format!("structure rendering failed: {e}")))?;
        let structure: Arc<str> = Arc::from(structure);

        let features = self.extract_features(problem).await?;
        log::info!("Localizing {} features", features.len());

        let (feature_analysis, execution_plan_suggestion) = tokio::join!(
            self.localize_all(&features, Arc::clone(&structure), session),
            self.execution_plan(&structure),
        );

        let located = feature_analysis.iter().filter(|a| a.is_located()).count();
        log::info!("Located {located}/{} features", feature_analysis.len());

        Ok(AnalysisReport {
            feature_analysis,
            execution_plan_suggestion,
            functional_verification: None,
        })
    }

    /// Ordered atomic features of a problem statement; never empty.
    ///
    /// Only an unreachable or failing reasoning service is an error.
    pub async fn extract_features(&self, problem: &str) -> Result<Vec<String>> {
        if problem.trim().is_empty() {
            return Ok(vec![problem.to_string()]);
        }

        let raw = self
            .reasoning
            .complete(
                &prompts::extract_features(problem),
                Some(self.config.feature_temperature),
            )
            .await
            .map_err(|e| {
                log::error!("Feature extraction failed: {e}");
                LocalizeError::feature_extraction(e)
            })?;

        let reply = FeatureListReply::parse(&raw);
        if let FeatureListReply::Fallback(raw) = &reply {
            log::warn!(
                "Feature list reply was not a JSON array, using the problem text: {}",
                raw.chars().take(200).collect::<String>()
            );
        }
        Ok(reply.into_features(problem))
    }

    /// Localize every feature concurrently; output order equals `features` order
    pub async fn localize_all(
        &self,
        features: &[String],
        structure: Arc<str>,
        session: SessionId,
    ) -> Vec<FeatureAnalysis> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, feature) in features.iter().enumerate() {
            let this = self.clone();
            let feature = feature.clone();
            let structure = Arc::clone(&structure);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, FeatureAnalysis::empty(feature));
                };
                let analysis = this.localize_feature(&feature, &structure, &session).await;
                (index, analysis)
            });
        }

        let mut slots: Vec<Option<FeatureAnalysis>> = vec![None; features.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, analysis)) => slots[index] = Some(analysis),
                Err(e) => log::error!("Localization task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .zip(features)
            .map(|(slot, feature)| slot.unwrap_or_else(|| FeatureAnalysis::empty(feature.clone())))
            .collect()
    }

    /// Locate one feature; every failure degrades to an empty location list
    pub async fn localize_feature(
        &self,
        feature: &str,
        structure: &str,
        session: &SessionId,
    ) -> FeatureAnalysis {
        let locations = match self.try_localize(feature, structure, session).await {
            Ok(locations) => locations,
            Err(e) => {
                log::warn!("Localization of '{feature}' failed: {e}");
                Vec::new()
            }
        };

        FeatureAnalysis {
            feature_description: feature.to_string(),
            implementation_location: locations,
        }
    }

    async fn try_localize(
        &self,
        feature: &str,
        structure: &str,
        session: &SessionId,
    ) -> std::result::Result<Vec<ImplementationLocation>, ProviderError> {
        let context = match self.relevant_code(feature, session).await {
            Some(excerpt) => format!("{structure}{excerpt}"),
            None => structure.to_string(),
        };

        let raw = self
            .reasoning
            .complete(
                &prompts::localize_feature(feature, &context),
                Some(self.config.localization_temperature),
            )
            .await?;

        Ok(match LocalizationReply::parse(&raw) {
            LocalizationReply::Ok(locations) => locations,
            LocalizationReply::ParseFailed(_) => {
                log::warn!("Localization reply for '{feature}' was not valid JSON");
                Vec::new()
            }
        })
    }

    /// Semantic search excerpt for a feature, `None` when unavailable or empty
    async fn relevant_code(&self, feature: &str, session: &SessionId) -> Option<String> {
        let vector = match self.embedder.embed(feature).await {
            Ok(vector) => vector,
            Err(e) => {
                log::warn!("Embedding failed, using structure only: {e}");
                return None;
            }
        };
        let hits = match self
            .index
            .search(session, &vector, self.config.top_k, self.config.min_score)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("Semantic search failed, using structure only: {e}");
                return None;
            }
        };

        if hits.is_empty() {
            return None;
        }
        Some(format_relevant_code(&hits, self.config.relevant_excerpt_chars))
    }

    /// Free-text run suggestion; empty on any failure
    pub async fn execution_plan(&self, structure: &str) -> String {
        match self
            .reasoning
            .complete(
                &prompts::execution_plan(structure),
                Some(self.config.plan_temperature),
            )
            .await
        {
            Ok(plan) => plan.trim().to_string(),
            Err(e) => {
                log::warn!("Execution plan generation failed: {e}");
                String::new()
            }
        }
    }
}

fn format_relevant_code(hits: &[SearchHit], excerpt_chars: usize) -> String {
    let mut out = String::from(prompts::RELEVANT_CODE_HEADING);
    for hit in hits {
        let payload = &hit.payload;
        let excerpt: String = payload.content.chars().take(excerpt_chars).collect();
        out.push_str(&format!(
            "\n- {}: {} ({}) lines {}-{}\n  ```\n  {excerpt}...\n  ```\n",
            payload.file_path,
            payload.name,
            payload.definition_type,
            payload.start_line,
            payload.end_line
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use locator_code_extractor::DefinitionKind;
    use locator_vector_store::IndexPayload;

    #[test]
    fn test_relevant_code_format() {
        let hits = vec![SearchHit {
            id: "x".to_string(),
            payload: IndexPayload {
                file_path: "src/chat.py".to_string(),
                name: "send".to_string(),
                definition_type: DefinitionKind::Function,
                start_line: 3,
                end_line: 9,
                signature: "def send(msg):".to_string(),
                content: "def send(msg):\n    queue.put(msg)".to_string(),
            },
            score: 0.8,
        }];

        let text = format_relevant_code(&hits, 8);
        assert!(text.starts_with("\n\n### Relevant Code (by semantic search):\n"));
        assert!(text.contains("- src/chat.py: send (function) lines 3-9\n"));
        assert!(text.contains("  def send...\n"));
    }
}
