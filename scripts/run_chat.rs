use clap::Parser;
use std::time::Duration;
use teamgate_adaptor_terminal::{ApiClient, TerminalChat, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use teamgate_core::{init_logging_with, load_env, TeamCatalog};
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "run-chat", about = "Chat with Teamgate agent teams in the terminal")]
struct Cli {
    /// Address of a running run-server
    #[arg(long, env = "TEAMGATE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "TEAMGATE_CHAT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "TEAMGATE_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging_with(&cli.log_level);
    load_env()?;

    let api = ApiClient::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))?;
    let mut chat = TerminalChat::new(api, TeamCatalog::builtin());

    chat.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}
