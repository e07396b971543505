// src/main.rs
//! Credential gate server entry point
use anyhow::{Context, Result};
use clap::Parser;
use credential_gate::auth::{AuthConfig, AuthService, MemoryStorage, PostgresStorage, UserStorage};
use credential_gate::config::AppEnvConfig;
use credential_gate::server::AuthServer;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "credential_gate")]
#[command(about = "User registration and login API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[command(flatten)]
    server: AppEnvConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    init_logging()?;

    info!("Starting credential gate v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    // missing signing secret stops startup here
    let auth_config = AuthConfig::from_env().context("Invalid auth configuration")?;

    let storage: Arc<dyn UserStorage> = match &args.server.database_url {
        Some(url) => Arc::new(PostgresStorage::connect(url, args.server.max_connections).await?),
        None => {
            warn!("DATABASE_URL not set; accounts are kept in memory and lost on restart");
            Arc::new(MemoryStorage::new())
        }
    };

    let service = AuthService::new(storage, auth_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize auth service: {}", e))?;

    AuthServer::new(args.server, Arc::new(service)).start().await
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=info,h2=info,sqlx=warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
