use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use video_compressor::app;
use video_compressor::config::settings::AppConfig;
use video_compressor::modules::compressor::dto::CompressRequest;
use video_compressor::state::AppState;

#[derive(Parser)]
#[command(name = "video-compressor")]
#[command(about = "Compresses a stored video and extracts its thumbnail")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single job and exit
    Run {
        /// Source object key (defaults to SOURCE_OBJECT_KEY)
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        source_bucket: Option<String>,
        #[arg(long)]
        destination_bucket: Option<String>,
    },
    /// Serve the compress function over HTTP
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::new().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Run {
        key: None,
        source_bucket: None,
        destination_bucket: None,
    }) {
        Commands::Run {
            key,
            source_bucket,
            destination_bucket,
        } => {
            let job = CompressRequest {
                name: key,
                source_bucket,
                destination_bucket,
            }
            .into_job(&config.job);

            let state = AppState::from_config(config);
            let status = state.compressor.run(&job).await?;
            println!("{}", serde_json::to_string(&status)?);
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server_port);
            let app = app::create_app(AppState::from_config(config));

            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
                .await
                .with_context(|| format!("Failed to bind port {}", port))?;
            info!("Server running on http://0.0.0.0:{}", port);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
