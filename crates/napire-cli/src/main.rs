//! Napire - command-line client for the napire inference service
//!
//! The `napire` command drives the same pipeline as the web client: load a
//! model's catalog, assert evidence, submit an inference job, follow it to
//! completion and print the ranked outcomes.
//!
//! ## Commands
//!
//! - `models`: List the bundled models
//! - `catalog`: Print the categories and items of a model
//! - `run`: Submit evidence and wait for the ranking
//! - `status`: Follow an existing job

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use napire_backend::InferenceBackend;
use napire_core::{
    BackendConfig, DeploymentMode, FallbackData, HttpBackend, JobState, MemoryNavigator,
    ModelRegistry, Navigator, Orchestrator, OrchestratorConfig, QueryParams, RankedEntry,
    TracingNotifier, ViewState, METRICS,
};
use serde::Serialize;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "napire")]
#[command(author = "Napire Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Napire inference client", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Base URL of the inference service
    #[arg(long, global = true, env = "NAPIRE_SERVER")]
    server: Option<String>,

    /// How a job unknown to the service is treated (strict | lenient)
    #[arg(long, global = true, env = "NAPIRE_MODE", default_value_t = DeploymentMode::Strict)]
    mode: DeploymentMode,

    /// JSON file of sample replies keyed by endpoint path
    #[arg(long, global = true, env = "NAPIRE_FALLBACK")]
    fallback: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bundled models
    Models,

    /// Print the categories and items of a model
    Catalog {
        /// Model to load (default: Cause analyzer)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Submit evidence and wait for the ranking
    Run {
        /// Model to run (default: Cause analyzer)
        #[arg(short, long)]
        model: Option<String>,

        /// Item to assert as observed (repeatable)
        #[arg(short, long = "evidence")]
        evidence: Vec<String>,

        /// Project size slider position (negative: unknown)
        #[arg(long, allow_hyphen_values = true)]
        size: Option<i32>,

        /// Print every outcome instead of the top five
        #[arg(long)]
        all: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow an existing job
    Status {
        /// Job identifier
        #[arg(long)]
        id: String,

        /// Model the job was submitted for (default: Cause analyzer)
        #[arg(short, long)]
        model: Option<String>,

        /// Print every outcome instead of the top five
        #[arg(long)]
        all: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Orchestrator plus the navigator it writes job ids back to.
struct Session {
    orch: Orchestrator,
    navigator: Arc<MemoryNavigator>,
}

impl Session {
    fn new(
        backend: Arc<dyn InferenceBackend>,
        registry: ModelRegistry,
        fallback: FallbackData,
        config: OrchestratorConfig,
        initial: QueryParams,
    ) -> Self {
        let navigator = Arc::new(MemoryNavigator::new(initial));
        let orch = Orchestrator::new(
            backend,
            navigator.clone(),
            Arc::new(TracingNotifier),
            registry,
            fallback,
            config,
        );
        Self { orch, navigator }
    }

    /// Feed the current navigation parameters into the orchestrator.
    async fn sync(&self) -> Result<()> {
        self.orch
            .on_params_changed(&self.navigator.current())
            .await
            .context("Pipeline stage failed")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    napire_core::init_tracing(cli.json_logs, level);

    let registry = ModelRegistry::bundled().context("Failed to load bundled models")?;

    let result = match cli.command {
        Commands::Models => cmd_models(&registry),
        Commands::Catalog { ref model } => {
            let session = connect(&cli, registry, QueryParams::new(model.as_deref(), None))?;
            cmd_catalog(&session).await
        }
        Commands::Run {
            ref model,
            ref evidence,
            size,
            all,
            json,
        } => {
            let session = connect(&cli, registry, QueryParams::new(model.as_deref(), None))?;
            let view = cmd_run(&session, evidence, size).await?;
            print_result(&view, all, json)
        }
        Commands::Status {
            ref id,
            ref model,
            all,
            json,
        } => {
            let params = QueryParams::new(model.as_deref(), Some(id));
            let session = connect(&cli, registry, params)?;
            let view = cmd_status(&session).await?;
            print_result(&view, all, json)
        }
    };

    METRICS.flush();
    result
}

fn connect(cli: &Cli, registry: ModelRegistry, initial: QueryParams) -> Result<Session> {
    let backend_config = match &cli.server {
        Some(server) => BackendConfig::new(server),
        None => BackendConfig::from_env(),
    };
    info!(server = %backend_config.server_url, mode = %cli.mode, "connecting");
    let backend = HttpBackend::new(backend_config).context("Failed to build HTTP client")?;

    let fallback = match &cli.fallback {
        Some(path) => FallbackData::from_file(path)
            .with_context(|| format!("Failed to read fallback data from {}", path.display()))?,
        None => FallbackData::none(),
    };

    let config = OrchestratorConfig::from_env().with_mode(cli.mode);
    Ok(Session::new(
        Arc::new(backend),
        registry,
        fallback,
        config,
        initial,
    ))
}

fn cmd_models(registry: &ModelRegistry) -> Result<()> {
    for id in registry.ids() {
        println!("{id}");
    }
    Ok(())
}

async fn cmd_catalog(session: &Session) -> Result<()> {
    session.sync().await?;
    let view = session.orch.view();

    for (category, items) in &view.items {
        println!("{}", label_of(&view, category));
        for item in items {
            println!("  {item:<20} {}", label_of(&view, item));
        }
    }
    Ok(())
}

async fn cmd_run(session: &Session, evidence: &[String], size: Option<i32>) -> Result<ViewState> {
    session.sync().await?;
    for item in evidence {
        session.orch.set_evidence(item, true);
    }
    if let Some(position) = size {
        session.orch.set_slider_evidence(position);
    }

    let id = session.orch.run().await.context("Submission failed")?;
    info!(job_id = %id, "job submitted");

    // the navigator now points at the submitted job
    session.sync().await?;
    Ok(session.orch.view())
}

async fn cmd_status(session: &Session) -> Result<ViewState> {
    session.sync().await?;
    Ok(session.orch.view())
}

fn label_of<'a>(view: &'a ViewState, id: &'a str) -> &'a str {
    view.descriptions.get(id).map(String::as_str).unwrap_or(id)
}

#[derive(Serialize)]
struct ResultOutput<'a> {
    job: Option<&'a JobState>,
    ranking: &'a [RankedEntry],
    plot: Option<&'a str>,
}

fn print_result(view: &ViewState, all: bool, json: bool) -> Result<()> {
    let ranking = if all {
        &view.ranking.full
    } else {
        &view.ranking.short
    };

    if json {
        let output = ResultOutput {
            job: view.job.as_ref(),
            ranking,
            plot: view.plot.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &view.job {
        Some(JobState::Completed { id, .. }) => {
            println!("Job {id} completed");
            print!("{}", render_ranking(ranking));
        }
        Some(JobState::Failed { id }) => println!("Job {id} failed"),
        Some(JobState::Running { id }) => println!("Job {id} is still running"),
        Some(JobState::NoTask) | None => println!("No job"),
    }
    Ok(())
}

fn render_ranking(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{:>3}. {:>3}%  {}\n", e.rank, e.percentage, e.label))
        .collect()
}
