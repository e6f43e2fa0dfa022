// ABOUTME: Entry point for the conclave binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and starts the HTTP server or the REPL.

mod repl;
mod sim_life;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use conclave_agent::GeneratorConfig;
use conclave_server::{AppState, ServerConfig, create_router};

#[derive(Parser)]
#[command(name = "conclave", version, about = "Multi-agent LLM orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server.
    Serve,
    /// Chat with the bundled ecosystem-simulation agents.
    Repl {
        /// Directory for saved conversations.
        #[arg(long, default_value = ".conclave")]
        data_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conclave=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = GeneratorConfig::from_env()?;
    let client = conclave_agent::create_client(&config)?;
    tracing::info!(
        provider = client.provider_name(),
        model = client.model_name(),
        "conclave starting up"
    );

    match cli.command {
        Command::Serve => {
            let server_config = ServerConfig::from_env()?;
            let state = Arc::new(AppState::new(Arc::from(client), config));
            let app = create_router(state);

            let listener = tokio::net::TcpListener::bind(server_config.bind).await?;
            tracing::info!(addr = %server_config.bind, "listening");
            axum::serve(listener, app).await?;
        }
        Command::Repl { data_dir } => {
            repl::run(client.as_ref(), &config, &data_dir).await?;
        }
    }

    Ok(())
}
