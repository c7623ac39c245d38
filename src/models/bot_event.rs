use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bot_daily_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BotDailyEvent {
    pub id: i64,
    pub bot_username: String,
    pub event_date: NaiveDate,
    pub event_type: String,
    pub event_description: String,
    pub was_mentioned: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::bot_daily_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBotDailyEvent {
    pub bot_username: String,
    pub event_date: NaiveDate,
    pub event_type: String,
    pub event_description: String,
}
