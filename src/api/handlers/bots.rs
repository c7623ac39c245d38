// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::bots::{context, scheduler, summarizer};
use crate::config::Config;
use crate::models::{BotDailyEvent, BotMemory, BotState};
use crate::schema::{bot_daily_events, bot_memories, bot_states};

#[derive(Debug, Deserialize)]
pub struct BotQuery {
    pub bot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateEventsRequest {
    pub force_generate: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RoutineRequest {
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub force: Option<bool>,
}

/// Rich context snapshot a responder uses to stay in character
pub async fn get_context(
    State(state): State<AppState>,
    Query(query): Query<BotQuery>,
) -> impl IntoResponse {
    let Some(bot) = query.bot else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Bot username required" })),
        );
    };

    match context::assemble(&state.db, &state.roster, &bot).await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(serde_json::to_value(snapshot).unwrap_or_default()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to assemble context: {}", e) })),
        ),
    }
}

/// Apply a bot's post-interaction state patch
pub async fn update_context(
    State(state): State<AppState>,
    Json(update): Json<context::ContextUpdate>,
) -> impl IntoResponse {
    if update.bot_username.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Bot username required" })),
        );
    }

    match context::apply_update(&state.db, &update).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to update context: {}", e) })),
        ),
    }
}

/// Today's events, optionally filtered to one bot
pub async fn get_daily_events(
    State(state): State<AppState>,
    Query(query): Query<BotQuery>,
) -> impl IntoResponse {
    let mut conn = match state.db.get_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Database error: {}", e)
                })),
            )
        }
    };

    let today = Utc::now().date_naive();
    let result = match query.bot {
        Some(bot) => {
            bot_daily_events::table
                .filter(bot_daily_events::event_date.eq(today))
                .filter(bot_daily_events::bot_username.eq(bot))
                .load::<BotDailyEvent>(&mut conn)
                .await
        }
        None => {
            bot_daily_events::table
                .filter(bot_daily_events::event_date.eq(today))
                .load::<BotDailyEvent>(&mut conn)
                .await
        }
    };

    match result {
        Ok(events) => (StatusCode::OK, Json(json!({ "events": events }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to fetch events: {}", e) })),
        ),
    }
}

/// Generate the day's events; a no-op when they already exist, unless forced
pub async fn generate_daily_events(
    State(state): State<AppState>,
    body: Option<Json<GenerateEventsRequest>>,
) -> impl IntoResponse {
    let force = body
        .and_then(|Json(body)| body.force_generate)
        .unwrap_or(false);

    match scheduler::generate_daily_events(&state.db, &state.roster, force).await {
        Ok(report) => (StatusCode::OK, Json(report)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to generate events: {}", e) })),
        ),
    }
}

/// Run the full daily routine: mood reroll, events, memory decay and prune
pub async fn run_daily_routine(
    State(state): State<AppState>,
    body: Option<Json<RoutineRequest>>,
) -> impl IntoResponse {
    let config = Config::get();
    let secret = body.and_then(|Json(body)| body.secret);

    // The shared secret only gates production; anything goes in development.
    if config.bots.runtime_env == "production"
        && secret.as_deref() != Some(config.bots.routine_secret.as_str())
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        );
    }

    let report = scheduler::run_daily_routine(
        &state.db,
        &state.roster,
        state.orchestrator.policy(),
    )
    .await;
    (StatusCode::OK, Json(report))
}

/// Current bot states, recent memories and today's events
pub async fn get_routine_status(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = match state.db.get_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Database error: {}", e)
                })),
            )
        }
    };

    let states = bot_states::table
        .load::<BotState>(&mut conn)
        .await
        .unwrap_or_default();
    let recent_memories = bot_memories::table
        .order(bot_memories::created_at.desc())
        .limit(10)
        .load::<BotMemory>(&mut conn)
        .await
        .unwrap_or_default();
    let today_events = bot_daily_events::table
        .filter(bot_daily_events::event_date.eq(Utc::now().date_naive()))
        .load::<BotDailyEvent>(&mut conn)
        .await
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "states": states,
            "recent_memories": recent_memories,
            "today_events": today_events,
        })),
    )
}

/// Summarize the chat backlog into a shared memory
pub async fn summarize(
    State(state): State<AppState>,
    body: Option<Json<SummarizeRequest>>,
) -> impl IntoResponse {
    let force = body.and_then(|Json(body)| body.force).unwrap_or(false);

    match summarizer::summarize_chat(
        &state.db,
        &state.roster,
        state.orchestrator.policy(),
        force,
    )
    .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::to_value(outcome).unwrap_or_default()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to summarize: {}", e) })),
        ),
    }
}

/// How overdue the next summary is
pub async fn get_summary_status(State(state): State<AppState>) -> impl IntoResponse {
    match summarizer::summary_status(&state.db, state.orchestrator.policy()).await {
        Ok(status) => (StatusCode::OK, Json(status)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to read summary status: {}", e) })),
        ),
    }
}
