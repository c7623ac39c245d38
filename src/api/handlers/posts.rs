// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::config::Config;
use crate::db::DbConnection;
use crate::metrics;
use crate::models::{NewPost, Post, User};
use crate::schema::{likes, posts, users};

const MAX_CONTENT_CHARS: usize = 500;
const FEED_PAGE_SIZE: i64 = 50;
const REPLIES_PER_POST: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub username: Option<String>,
    pub reply_to_id: Option<i64>,
    pub depth: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeletePostRequest {
    pub username: Option<String>,
}

/// Derived counters plus (optionally) the first page of replies, computed
/// fresh at read time.
async fn enrich_post(
    conn: &mut DbConnection,
    post: &Post,
    user: &User,
    include_replies: bool,
) -> Result<Value, diesel::result::Error> {
    let likes_count: i64 = likes::table
        .filter(likes::post_id.eq(post.id))
        .count()
        .get_result(conn)
        .await?;
    let replies_count: i64 = posts::table
        .filter(posts::reply_to_id.eq(post.id))
        .count()
        .get_result(conn)
        .await?;
    let reposts_count: i64 = posts::table
        .filter(posts::repost_of_id.eq(post.id))
        .count()
        .get_result(conn)
        .await?;

    let mut value = json!({
        "id": post.id,
        "user_id": post.user_id,
        "content": post.content,
        "reply_to_id": post.reply_to_id,
        "repost_of_id": post.repost_of_id,
        "created_at": post.created_at,
        "updated_at": post.updated_at,
        "user": user,
        "likes_count": likes_count,
        "replies_count": replies_count,
        "reposts_count": reposts_count,
    });

    if include_replies {
        let reply_rows = posts::table
            .inner_join(users::table)
            .filter(posts::reply_to_id.eq(post.id))
            .order(posts::created_at.asc())
            .limit(REPLIES_PER_POST)
            .load::<(Post, User)>(conn)
            .await?;

        let mut replies = Vec::with_capacity(reply_rows.len());
        for (reply, reply_user) in reply_rows {
            let reply_likes: i64 = likes::table
                .filter(likes::post_id.eq(reply.id))
                .count()
                .get_result(conn)
                .await?;
            replies.push(json!({
                "id": reply.id,
                "user_id": reply.user_id,
                "content": reply.content,
                "reply_to_id": reply.reply_to_id,
                "repost_of_id": reply.repost_of_id,
                "created_at": reply.created_at,
                "updated_at": reply.updated_at,
                "user": reply_user,
                "likes_count": reply_likes,
                "replies_count": 0,
                "reposts_count": 0,
            }));
        }
        value["replies"] = Value::Array(replies);
    }

    Ok(value)
}

/// Get the feed: top-level posts, newest first, with counts and replies
pub async fn get_posts(State(state): State<AppState>) -> impl IntoResponse {
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

    let rows = match posts::table
        .inner_join(users::table)
        .filter(posts::reply_to_id.is_null())
        .order(posts::created_at.desc())
        .limit(FEED_PAGE_SIZE)
        .load::<(Post, User)>(&mut conn)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to fetch posts: {}", e)
                })),
            )
        }
    };

    let mut enriched = Vec::with_capacity(rows.len());
    for (post, user) in rows {
        match enrich_post(&mut conn, &post, &user, true).await {
            Ok(value) => enriched.push(value),
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": format!("Failed to fetch posts: {}", e)
                    })),
                )
            }
        }
    }

    (StatusCode::OK, Json(json!({ "posts": enriched })))
}

/// Create a post or a reply, then hand it to the orchestrator
pub async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<CreatePostRequest>,
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
    if content.chars().count() > MAX_CONTENT_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Content exceeds 500 characters" })),
        );
    }

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

    let new_post = NewPost {
        user_id: user.id,
        content: content.to_string(),
        reply_to_id: body.reply_to_id,
        repost_of_id: None,
    };
    let post = match diesel::insert_into(posts::table)
        .values(&new_post)
        .get_result::<Post>(&mut conn)
        .await
    {
        Ok(post) => post,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to create post: {}", e) })),
            )
        }
    };
    drop(conn);

    metrics::POSTS_CREATED.inc();

    // Bot routing runs in the background; the post already exists no matter
    // what happens to the notifications.
    let depth = body.depth.unwrap_or(0);
    state
        .orchestrator
        .clone()
        .spawn_post_created(post.clone(), user.clone(), depth);

    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "post": post })),
    )
}

/// Get a single post with its reply thread
pub async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
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

    let row = match posts::table
        .inner_join(users::table)
        .filter(posts::id.eq(id))
        .first::<(Post, User)>(&mut conn)
        .await
    {
        Ok(row) => row,
        Err(diesel::result::Error::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Post not found" })),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to fetch post: {}", e) })),
            )
        }
    };

    match enrich_post(&mut conn, &row.0, &row.1, true).await {
        Ok(value) => (StatusCode::OK, Json(json!({ "post": value }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to fetch post: {}", e) })),
        ),
    }
}

/// Edit a post's content (owner only)
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePostRequest>,
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
    if content.chars().count() > MAX_CONTENT_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Content exceeds 500 characters" })),
        );
    }

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

    let owner = match post_owner(&mut conn, id).await {
        Ok(Some(owner)) => owner,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Post not found" })),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to fetch post: {}", e) })),
            )
        }
    };

    let username = body
        .username
        .unwrap_or_else(|| Config::get().bots.creator_username.clone());
    if owner != username {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "You can only edit your own posts" })),
        );
    }

    match diesel::update(posts::table.find(id))
        .set((
            posts::content.eq(content),
            posts::updated_at.eq(Utc::now()),
        ))
        .get_result::<Post>(&mut conn)
        .await
    {
        Ok(post) => (
            StatusCode::OK,
            Json(json!({ "success": true, "post": post })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to update post: {}", e) })),
        ),
    }
}

/// Delete a post (owner only); likes and the whole reply subtree go with it
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DeletePostRequest>,
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

    let owner = match post_owner(&mut conn, id).await {
        Ok(Some(owner)) => owner,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Post not found" })),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to fetch post: {}", e) })),
            )
        }
    };

    let username = body
        .username
        .unwrap_or_else(|| Config::get().bots.creator_username.clone());
    if owner != username {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "You can only delete your own posts" })),
        );
    }

    match diesel::delete(posts::table.find(id)).execute(&mut conn).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to delete post: {}", e) })),
        ),
    }
}

async fn post_owner(
    conn: &mut DbConnection,
    post_id: i64,
) -> Result<Option<String>, diesel::result::Error> {
    match posts::table
        .inner_join(users::table)
        .filter(posts::id.eq(post_id))
        .select(users::username)
        .first::<String>(conn)
        .await
    {
        Ok(owner) => Ok(Some(owner)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
