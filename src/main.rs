use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wire_server::api::{self, AppState};
use wire_server::bots::{BotRoster, Notifier, Orchestrator, WebhookNotifier};
use wire_server::config::Config;
use wire_server::db::init_database;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,wire_server=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::init()?;
    info!("Initialized configuration");

    // Initialize database
    let db = Arc::new(init_database().await?);
    info!("Connected to database");

    // Wire up the bot roster and the interaction orchestrator
    let roster = Arc::new(BotRoster::from_config()?);
    info!(
        "Bot roster: {} bot(s), creator {}",
        roster.bots().len(),
        config.bots.creator_username
    );

    let notifier: Arc<dyn Notifier> = Arc::new(WebhookNotifier::new());
    let orchestrator = Arc::new(Orchestrator::new(db.clone(), roster.clone(), notifier));

    let state = AppState {
        db,
        roster,
        orchestrator,
    };

    // Start API server
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_api_server(state).await {
            error!("API server error: {}", e);
        }
    });

    // Handle shutdown signals
    tokio::select! {
        _ = api_handle => {},
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Shutdown signal received, initiating graceful shutdown"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        },
    }

    info!("The Wire server shutdown complete");
    Ok(())
}
