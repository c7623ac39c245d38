use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bot_memories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BotMemory {
    pub id: i64,
    pub bot_username: String,
    pub memory_type: String,
    pub content: String,
    pub related_user: Option<String>,
    pub related_post_id: Option<i64>,
    pub importance: i32,
    pub emotional_valence: i32,
    pub created_at: DateTime<Utc>,
    pub last_recalled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::bot_memories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBotMemory {
    pub bot_username: String,
    pub memory_type: String,
    pub content: String,
    pub related_user: Option<String>,
    pub related_post_id: Option<i64>,
    pub importance: i32,
    pub emotional_valence: i32,
}
