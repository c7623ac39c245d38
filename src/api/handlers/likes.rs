// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::config::Config;
use crate::models::NewLike;
use crate::schema::{likes, posts, users};

#[derive(Debug, Deserialize)]
pub struct ToggleLikeRequest {
    pub post_id: Option<i64>,
    pub username: Option<String>,
}

/// Toggle a like. The composite unique index makes the insert race-safe:
/// whichever concurrent toggle inserts first wins, the other falls through
/// to the delete branch.
pub async fn toggle_like(
    State(state): State<AppState>,
    Json(body): Json<ToggleLikeRequest>,
) -> impl IntoResponse {
    let Some(post_id) = body.post_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "post_id is required" })),
        );
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

    let user_id = match users::table
        .filter(users::username.eq(&username))
        .select(users::id)
        .first::<i64>(&mut conn)
        .await
    {
        Ok(id) => id,
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

    let post_exists = match posts::table
        .find(post_id)
        .count()
        .get_result::<i64>(&mut conn)
        .await
    {
        Ok(count) => count > 0,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to look up post: {}", e)
                })),
            )
        }
    };
    if !post_exists {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Post not found" })),
        );
    }

    let inserted = match diesel::insert_into(likes::table)
        .values(&NewLike { user_id, post_id })
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to like post: {}", e) })),
            )
        }
    };

    if inserted > 0 {
        return (
            StatusCode::OK,
            Json(json!({ "success": true, "liked": true })),
        );
    }

    // Already liked: this toggle removes the like.
    match diesel::delete(
        likes::table
            .filter(likes::user_id.eq(user_id))
            .filter(likes::post_id.eq(post_id)),
    )
    .execute(&mut conn)
    .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "success": true, "liked": false })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to unlike post: {}", e) })),
        ),
    }
}
