mod handlers;

use crate::bots::{BotRoster, Orchestrator};
use crate::config::Config;
use crate::db::Database;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub roster: Arc<BotRoster>,
    pub orchestrator: Arc<Orchestrator>,
}

/// Start the API server
pub async fn start_api_server(state: AppState) -> Result<()> {
    let config = Config::get();

    // Set up CORS
    let cors = if config.api.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    // Create router with all routes
    let app = Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        // Feed routes
        .route(
            "/api/posts",
            get(handlers::posts::get_posts).post(handlers::posts::create_post),
        )
        .route(
            "/api/posts/:id",
            get(handlers::posts::get_post)
                .patch(handlers::posts::update_post)
                .delete(handlers::posts::delete_post),
        )
        .route("/api/likes", post(handlers::likes::toggle_like))
        // Chat routes
        .route(
            "/api/chat/messages",
            get(handlers::chat::get_messages).post(handlers::chat::create_message),
        )
        // Bot routes
        .route(
            "/api/bots/context",
            get(handlers::bots::get_context).post(handlers::bots::update_context),
        )
        .route(
            "/api/bots/daily-events",
            get(handlers::bots::get_daily_events).post(handlers::bots::generate_daily_events),
        )
        .route(
            "/api/bots/daily-routine",
            get(handlers::bots::get_routine_status).post(handlers::bots::run_daily_routine),
        )
        .route(
            "/api/bots/summarize",
            get(handlers::bots::get_summary_status).post(handlers::bots::summarize),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Get bind address
    let addr = format!("{}:{}", config.api.host, config.api.port).parse::<SocketAddr>()?;

    // Start server
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
