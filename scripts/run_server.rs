use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teamgate_adaptor_web::{AppState, ServiceTarget, StatusMonitor, WebConfig, WebServer};
use teamgate_core::{
    init_logging_with, load_env, load_env_from_path, AppConfig, GenerationOptions, PromptBuilder,
    TeamCatalog, TeamExecutor,
};
use teamgate_plugin_memory::{JsonFileMemoryStore, McpMemoryStore};
use teamgate_plugin_presentation::PresentationService;
use teamgate_plugin_search::build_search;
use teamgate_provider_local::OllamaClient;
use teamgate_storage_sql::SqliteConversationStore;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "run-server", about = "Serve Teamgate agent teams over HTTP")]
struct Cli {
    #[arg(long, env = "TEAMGATE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Env file to load instead of `./.env`
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Overrides TEAMGATE_HOST
    #[arg(long)]
    host: Option<String>,

    /// Overrides TEAMGATE_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Serve without web research even for search-enabled teams
    #[arg(long)]
    no_search: bool,

    /// Serve without SQLite chat history
    #[arg(long)]
    no_history: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging_with(&cli.log_level);
    match &cli.env_file {
        Some(path) => load_env_from_path(path)?,
        None => load_env().context("loading .env")?,
    }

    let mut config = AppConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let catalog = Arc::new(TeamCatalog::builtin());
    info!(teams = ?catalog.ids(), "team catalog loaded");

    let generator = Arc::new(OllamaClient::from_config(&config).context("configuring Ollama")?);
    match generator.list_models().await {
        Ok(models) if models.iter().any(|m| *m == config.ollama_model) => {
            info!(model = %config.ollama_model, "Ollama model available")
        }
        Ok(models) => warn!(
            model = %config.ollama_model,
            available = ?models,
            "Ollama model not pulled; teams will answer with fallbacks"
        ),
        Err(e) => warn!(error = %e, "Ollama not reachable; teams will answer with fallbacks"),
    }

    let mut prompts = PromptBuilder::new()?;
    if !cli.no_search {
        prompts = prompts.with_search(build_search(&config).context("configuring web search")?);
    }

    let presentations = PresentationService::new(generator.clone(), &config.memory_data_dir)
        .with_model(config.ollama_model.clone());

    let executor = TeamExecutor::new(catalog, prompts, generator).with_options(GenerationOptions {
        model: Some(config.ollama_model.clone()),
        ..Default::default()
    });

    let mut state = AppState::new(
        Arc::new(executor),
        Arc::new(JsonFileMemoryStore::new(&config.memory_data_dir)),
        Arc::new(McpMemoryStore::new(&config.memory_data_dir)),
        WebConfig::from_app_config(&config),
    )
    .with_presentations(Arc::new(presentations));

    let mut monitor = StatusMonitor::from_config(&config);
    if !cli.no_history {
        let store = SqliteConversationStore::new(&config.chat_db_url)
            .await
            .context("opening chat history")?;
        state = state.with_conversations(Arc::new(store));
        monitor = monitor.with_service(ServiceTarget::local(
            "Chat history",
            "Storage",
            "SQLite conversation store",
        ));
    }
    let monitor = Arc::new(monitor);
    if config.status_refresh_secs > 0 {
        monitor
            .clone()
            .spawn_refresh(Duration::from_secs(config.status_refresh_secs));
    }
    state = state.with_status(monitor);

    WebServer::new(state)
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl-C received, shutting down");
        })
        .await?;

    Ok(())
}
