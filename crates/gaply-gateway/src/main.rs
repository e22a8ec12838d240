//! Gaply Gateway - Entry Point

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gaply_gateway::{
    Config, Database, JwtVerifier, OpenAlexClient, SearchPipeline, UnpaywallClient, WorkerClient,
    server::{self, AppState},
};

#[derive(Parser, Debug)]
#[command(name = "gaply-gateway")]
#[command(about = "HTTP gateway for the Gaply research-paper assistant")]
#[command(version)]
struct Cli {
    /// HTTP server port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Skip running database migrations at startup
    #[arg(long)]
    skip_migrations: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside development.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    for ignored in &config.ignored {
        tracing::warn!(key = ignored.key, value = %ignored.value, "Ignoring unparseable value, using default");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), config = ?config, "Starting Gaply gateway");
    if !config.has_unpaywall_email() {
        tracing::warn!("UNPAYWALL_EMAIL not set; open-access enrichment is disabled");
    }

    let db = Database::connect(&config.database_url).await.context("connecting to database")?;
    if !cli.skip_migrations {
        db.migrate().await.context("running migrations")?;
    }

    let worker = WorkerClient::new(&config)?;
    let pipeline = SearchPipeline::new(
        Arc::new(OpenAlexClient::new(&config)?),
        Arc::new(UnpaywallClient::new(&config)?),
        Arc::new(db.clone()),
    )
    .with_concurrency(config.enrich_concurrency);

    let state = AppState::new(pipeline, JwtVerifier::new(&config.jwt_secret), config.allowed_origins)
        .with_probe(Arc::new(db.clone()))
        .with_probe(Arc::new(worker));

    server::serve(state, config.port).await?;

    db.close().await;
    Ok(())
}
