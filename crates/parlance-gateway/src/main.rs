//! Parlance — conversational relay gateway

use clap::{Parser, Subcommand};
use parlance_core::{BindMode, GatewayConfig};
use parlance_gateway::{start_gateway, ServeConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "parlance", about = "Parlance conversational relay — gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short, long, default_value = "lan")]
        bind: String,
        /// SQLite database path (default: parlance.db)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Completion model override
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            port,
            bind,
            db,
            model,
        }) => {
            init_tracing();
            let config = serve_config(port, bind, db, model);
            start_gateway(config).await?;
        }

        Some(Commands::Version) => {
            println!("parlance v{}", env!("CARGO_PKG_VERSION"));
        }

        // No subcommand = serve with defaults
        None => {
            init_tracing();
            start_gateway(serve_config(8000, "lan".into(), None, None)).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parlance=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn serve_config(port: u16, bind: String, db: Option<PathBuf>, model: Option<String>) -> ServeConfig {
    let bind_mode = match bind.as_str() {
        "loopback" | "localhost" | "127.0.0.1" => BindMode::Loopback,
        _ => BindMode::Lan,
    };

    let database_path = db
        .or_else(|| std::env::var("PARLANCE_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("parlance.db"));

    ServeConfig {
        gateway: GatewayConfig {
            port,
            bind: bind_mode,
        },
        groq_api_key: std::env::var("GROQ_API_KEY").ok(),
        database_path,
        model,
    }
}
