use anyhow::{Context, Result};
use clap::ValueEnum;
use locator_code_extractor::ExtractorConfig;
use locator_localizer::{LocalizerConfig, ReasoningConfig};
use locator_vector_store::OllamaConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Embedding backend used for the semantic index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// Offline token-hashing vectors
    #[default]
    Hashing,
    /// Ollama-compatible embedding service
    Ollama,
}

impl EmbeddingMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "hashing" | "stub" | "offline" => Some(Self::Hashing),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub mode: EmbeddingMode,
    pub ollama: OllamaConfig,
}

/// Application settings: TOML file, then environment, then flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reasoning: ReasoningConfig,
    pub embedding: EmbeddingSettings,
    pub localizer: LocalizerConfig,
    pub extractor: ExtractorConfig,
}

impl AppConfig {
    /// Load the optional TOML file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `LOCATOR_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("LOCATOR_LLM_API_URL") {
            self.reasoning.api_url = url;
        }
        if let Some(key) = lookup("LOCATOR_LLM_API_KEY") {
            self.reasoning.api_key = key;
        }
        if let Some(model) = lookup("LOCATOR_LLM_MODEL") {
            self.reasoning.model = model;
        }
        if let Some(url) = lookup("LOCATOR_EMBEDDING_URL") {
            self.embedding.ollama.base_url = url;
        }
        if let Some(model) = lookup("LOCATOR_EMBEDDING_MODEL") {
            self.embedding.ollama.model = model;
        }
        if let Some(raw) = lookup("LOCATOR_EMBEDDING_MODE") {
            self.embedding.mode = EmbeddingMode::parse(&raw)
                .with_context(|| format!("LOCATOR_EMBEDDING_MODE: unknown mode '{raw}'"))?;
        }
        if let Some(raw) = lookup("LOCATOR_MAX_CONCURRENCY") {
            self.localizer.max_concurrency = raw
                .trim()
                .parse()
                .with_context(|| format!("LOCATOR_MAX_CONCURRENCY: invalid value '{raw}'"))?;
        }
        if let Some(raw) = lookup("LOCATOR_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("LOCATOR_TIMEOUT_SECS: invalid value '{raw}'"))?;
            self.set_timeout_secs(secs);
        }
        Ok(())
    }

    /// End-to-end and per-request timeouts move together
    pub fn set_timeout_secs(&mut self, secs: u64) {
        self.localizer.request_timeout_secs = secs;
        self.reasoning.timeout_secs = secs;
    }

    pub fn validate(&self) -> Result<()> {
        self.localizer
            .validate()
            .map_err(|e| anyhow::anyhow!("localizer: {e}"))?;
        self.extractor
            .validate()
            .map_err(|e| anyhow::anyhow!("extractor: {e}"))?;
        if self.reasoning.api_url.trim().is_empty() {
            anyhow::bail!("reasoning.api_url must not be empty");
        }
        Ok(())
    }
}
