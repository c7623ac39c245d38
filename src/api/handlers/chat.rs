// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::bots::orchestrator::ChatReplyContext;
use crate::config::Config;
use crate::db::DbConnection;
use crate::metrics;
use crate::models::{ChatMessage, NewChatMessage, User};
use crate::schema::{chat_messages, users};

const CHAT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub content: Option<String>,
    pub username: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub reply_to_id: Option<i64>,
}

fn message_json(message: &ChatMessage, user: &User) -> Value {
    json!({
        "id": message.id,
        "user_id": message.user_id,
        "content": message.content,
        "media_url": message.media_url,
        "media_type": message.media_type,
        "reply_to_id": message.reply_to_id,
        "created_at": message.created_at,
        "user": {
            "id": user.id,
            "username": user.username,
            "display_name": user.display_name,
            "avatar_url": user.avatar_url,
            "is_bot": user.is_bot,
        },
    })
}

/// Get the chat feed with one level of reply context resolved
pub async fn get_messages(State(state): State<AppState>) -> impl IntoResponse {
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

    let rows = match chat_messages::table
        .inner_join(users::table)
        .order(chat_messages::created_at.asc())
        .limit(CHAT_PAGE_SIZE)
        .load::<(ChatMessage, User)>(&mut conn)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to fetch messages: {}", e)
                })),
            )
        }
    };

    let mut messages = Vec::with_capacity(rows.len());
    for (message, user) in rows {
        let mut value = message_json(&message, &user);
        if let Some(reply_to_id) = message.reply_to_id {
            if let Ok((id, content, display_name)) = chat_messages::table
                .inner_join(users::table)
                .filter(chat_messages::id.eq(reply_to_id))
                .select((
                    chat_messages::id,
                    chat_messages::content,
                    users::display_name,
                ))
                .first::<(i64, String, String)>(&mut conn)
                .await
            {
                value["reply_to"] = json!({
                    "id": id,
                    "content": content,
                    "user": { "display_name": display_name },
                });
            }
        }
        messages.push(value);
    }

    (StatusCode::OK, Json(json!({ "messages": messages })))
}

/// Post a chat message and let the orchestrator wake the bots
pub async fn create_message(
    State(state): State<AppState>,
    Json(body): Json<CreateMessageRequest>,
) -> impl IntoResponse {
    let content = match body.content.as_deref() {
        Some(content) if !content.is_empty() => content,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Content is required" })),
            )
        }
    };

    let username = body
        .username
        .unwrap_or_else(|| Config::get().bots.creator_username.clone());

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

    let user = match users::table
        .filter(users::username.eq(&username))
        .first::<User>(&mut conn)
        .await
    {
        Ok(user) => user,
        Err(diesel::result::Error::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("User not found: {}", username) })),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to look up user: {}", e)
                })),
            )
        }
    };

    let reply_context = match body.reply_to_id {
        Some(reply_to_id) => resolve_reply_context(&mut conn, reply_to_id).await,
        None => None,
    };

    let new_message = NewChatMessage {
        user_id: user.id,
        content: content.to_string(),
        media_url: body.media_url,
        media_type: body.media_type,
        reply_to_id: body.reply_to_id,
    };
    let message = match diesel::insert_into(chat_messages::table)
        .values(&new_message)
        .get_result::<ChatMessage>(&mut conn)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to create message: {}", e) })),
            )
        }
    };
    drop(conn);

    metrics::CHAT_MESSAGES_CREATED.inc();

    let response = message_json(&message, &user);
    state
        .orchestrator
        .clone()
        .spawn_chat_message(message, user, reply_context);

    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": response })),
    )
}

async fn resolve_reply_context(
    conn: &mut DbConnection,
    reply_to_id: i64,
) -> Option<ChatReplyContext> {
    chat_messages::table
        .inner_join(users::table)
        .filter(chat_messages::id.eq(reply_to_id))
        .select((chat_messages::content, users::username, users::display_name))
        .first::<(String, String, String)>(conn)
        .await
        .ok()
        .map(|(content, username, display_name)| ChatReplyContext {
            username,
            display_name,
            content,
        })
}
