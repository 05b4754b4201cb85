use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::{AppConfig, EmbeddingMode};
use std::path::PathBuf;

mod commands;
mod config;
mod scanner;

#[derive(Parser)]
#[command(name = "feature-locator")]
#[command(about = "Locate the code implementing each feature of a requirement", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a problem statement to implementing code, printing a JSON report
    Analyze(AnalyzeArgs),

    /// Print the extracted code definitions as JSON
    Extract(ProjectArgs),

    /// Print the budgeted code structure
    Structure(StructureArgs),
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Project directory to scan
    #[arg(short, long, default_value = ".")]
    pub project: PathBuf,
}

#[derive(Args)]
#[command(group(clap::ArgGroup::new("problem_source").required(true).args(["problem", "problem_file"])))]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Requirement text
    #[arg(long)]
    pub problem: Option<String>,

    /// File containing the requirement text
    #[arg(long)]
    pub problem_file: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reasoning service base URL
    #[arg(long)]
    pub llm_url: Option<String>,

    /// Reasoning model id
    #[arg(long)]
    pub llm_model: Option<String>,

    /// Embedding backend for the semantic index
    #[arg(long, value_enum)]
    pub embedding_mode: Option<EmbeddingMode>,

    /// Simultaneous feature localizations
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// End-to-end timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args)]
pub struct StructureArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[arg(long)]
    pub max_block_chars: Option<usize>,

    #[arg(long)]
    pub max_total_chars: Option<usize>,

    /// Header lines only
    #[arg(long)]
    pub outline: bool,
}

impl AnalyzeArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.llm_url {
            config.reasoning.api_url = url.clone();
        }
        if let Some(model) = &self.llm_model {
            config.reasoning.model = model.clone();
        }
        if let Some(mode) = self.embedding_mode {
            config.embedding.mode = mode;
        }
        if let Some(limit) = self.max_concurrency {
            config.localizer.max_concurrency = limit;
        }
        if let Some(secs) = self.timeout_secs {
            config.set_timeout_secs(secs);
        }
    }
}

impl StructureArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(chars) = self.max_block_chars {
            config.localizer.max_block_chars = chars;
        }
        if let Some(chars) = self.max_total_chars {
            config.localizer.max_total_chars = chars;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze(args) => {
            args.apply(&mut config);
            config.validate()?;
            commands::run_analyze(args, config).await?;
        }
        Commands::Extract(args) => {
            config.validate()?;
            commands::run_extract(args, config).await?;
        }
        Commands::Structure(args) => {
            args.apply(&mut config);
            config.validate()?;
            commands::run_structure(args, config).await?;
        }
    }

    Ok(())
}
