use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bot_states)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BotState {
    pub bot_username: String,
    pub mood: String,
    pub mood_intensity: i32,
    pub mood_updated_at: Option<DateTime<Utc>>,
    pub energy: i32,
    pub current_focus: Option<String>,
    pub focus_started_at: Option<DateTime<Utc>>,
    pub posts_today: i32,
    pub day_started_at: Option<NaiveDate>,
    pub last_post_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Full daily reroll, upserted on the bot username.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::bot_states)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct NewBotState {
    pub bot_username: String,
    pub mood: String,
    pub mood_intensity: i32,
    pub mood_updated_at: Option<DateTime<Utc>>,
    pub energy: i32,
    pub current_focus: Option<String>,
    pub focus_started_at: Option<DateTime<Utc>>,
    pub posts_today: i32,
    pub day_started_at: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

/// Partial patch applied by the context-update callback; absent fields are
/// left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::bot_states)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BotStatePatch {
    pub mood: Option<String>,
    pub mood_intensity: Option<i32>,
    pub mood_updated_at: Option<DateTime<Utc>>,
    pub energy: Option<i32>,
    pub current_focus: Option<Option<String>>,
    pub focus_started_at: Option<Option<DateTime<Utc>>>,
    pub last_post_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
