use crate::config::{AppConfig, EmbeddingMode, EmbeddingSettings};
use crate::scanner::{project_root, ProjectScanner};
use crate::{AnalyzeArgs, ProjectArgs, StructureArgs};
use anyhow::{Context, Result};
use locator_code_extractor::{CodeDefinition, Extractor};
use locator_context_budget::{outline, serialize_with};
use locator_localizer::{FeatureLocalizer, OpenAiCompatClient};
use locator_vector_store::{
    DefinitionIndexer, EmbeddingProvider, HashingEmbedder, InMemoryIndex, OllamaEmbedder,
    SemanticIndex, SessionId,
};
use std::path::Path;
use std::sync::Arc;

/// Scan and extract on the blocking pool
async fn collect_definitions(project: &Path, config: &AppConfig) -> Result<Vec<CodeDefinition>> {
    let root = project_root(project)?;
    let extractor_config = config.extractor.clone();

    let definitions = tokio::task::spawn_blocking(move || {
        let max_bytes = u64::try_from(extractor_config.max_file_bytes).unwrap_or(u64::MAX);
        let sources = ProjectScanner::new(&root, max_bytes).read_sources();
        Extractor::new(extractor_config).extract(&sources)
    })
    .await
    .context("Extraction task failed")?;

    log::info!("Extracted {} definitions", definitions.len());
    Ok(definitions)
}

fn build_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(match settings.mode {
        EmbeddingMode::Hashing => Arc::new(HashingEmbedder::default()),
        EmbeddingMode::Ollama => Arc::new(
            OllamaEmbedder::new(&settings.ollama).context("Failed to build embedding client")?,
        ),
    })
}

fn read_problem(args: &AnalyzeArgs) -> Result<String> {
    match (&args.problem, &args.problem_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read problem file {}", path.display())),
        (None, None) => anyhow::bail!("Either --problem or --problem-file is required"),
    }
}

pub async fn run_analyze(args: AnalyzeArgs, config: AppConfig) -> Result<()> {
    let problem = read_problem(&args)?;
    let definitions = collect_definitions(&args.project.project, &config).await?;

    let embedder = build_embedder(&config.embedding)?;
    let index: Arc<dyn SemanticIndex> = Arc::new(InMemoryIndex::new(embedder.dimension()));
    let reasoning = Arc::new(
        OpenAiCompatClient::new(&config.reasoning).context("Failed to build reasoning client")?,
    );
    log::info!("Reasoning endpoint: {}", reasoning.endpoint());

    let session = SessionId::new();
    let indexer = DefinitionIndexer::new(Arc::clone(&embedder), Arc::clone(&index));
    if let Err(e) = indexer.index_definitions(&session, &definitions).await {
        log::warn!("Semantic indexing failed, continuing with structure only: {e}");
    }

    let localizer = FeatureLocalizer::new(reasoning, embedder, index, config.localizer.clone());
    let result = localizer
        .generate_report(&problem, definitions, &session)
        .await;

    if let Err(e) = indexer.clear(&session).await {
        log::warn!("Failed to drop session {session}: {e}");
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub async fn run_extract(args: ProjectArgs, config: AppConfig) -> Result<()> {
    let definitions = collect_definitions(&args.project, &config).await?;
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}

pub async fn run_structure(args: StructureArgs, config: AppConfig) -> Result<()> {
    let definitions = collect_definitions(&args.project.project, &config).await?;
    let budget = config.localizer.budget();
    let headers_only = args.outline;
    let text = tokio::task::spawn_blocking(move || {
        if headers_only {
            outline(&definitions, &budget)
        } else {
            serialize_with(&definitions, &budget)
        }
    })
    .await
    .context("Structure rendering failed")?;

    println!("{text}");
    Ok(())
}
