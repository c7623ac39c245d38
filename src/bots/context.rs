use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Deserializer, Serialize};

use crate::bots::roster::BotRoster;
use crate::db::Database;
use crate::models::{BotDailyEvent, BotMemory, BotState, BotStatePatch, NewBotMemory};
use crate::schema::{bot_daily_events, bot_memories, bot_states, posts, users};

/// Where the current hour falls in a bot's day.
pub fn time_of_day(hour: u32) -> &'static str {
    match hour {
        h if h < 6 => "late_night",
        h if h < 12 => "morning",
        h if h < 17 => "afternoon",
        h if h < 21 => "evening",
        _ => "night",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeContext {
    pub hour: u32,
    pub time_of_day: &'static str,
    pub day_of_week: String,
    pub is_weekend: bool,
    pub timestamp: DateTime<Utc>,
}

impl TimeContext {
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        let weekday = now.weekday();
        Self {
            hour: now.hour(),
            time_of_day: time_of_day(now.hour()),
            day_of_week: weekday.to_string(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            timestamp: now,
        }
    }
}

/// The slice of bot state shipped to responders; neutral when no row exists.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub mood: String,
    pub mood_intensity: i32,
    pub energy: i32,
    pub current_focus: Option<String>,
}

impl StateSnapshot {
    fn neutral() -> Self {
        Self {
            mood: "neutral".to_string(),
            mood_intensity: 5,
            energy: 5,
            current_focus: None,
        }
    }
}

impl From<BotState> for StateSnapshot {
    fn from(state: BotState) -> Self {
        Self {
            mood: state.mood,
            mood_intensity: state.mood_intensity,
            energy: state.energy,
            current_focus: state.current_focus,
        }
    }
}

/// What a bot knows about its counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct PeerAwareness {
    pub other_bot: Option<String>,
    pub other_bot_mood: Option<String>,
    pub other_bot_focus: Option<String>,
    pub other_bot_last_active: Option<DateTime<Utc>>,
}

/// Read-only snapshot of a bot's simulated inner life.
#[derive(Debug, Serialize)]
pub struct BotContext {
    pub time: TimeContext,
    pub state: StateSnapshot,
    pub memories: Vec<BotMemory>,
    pub today_events: Vec<BotDailyEvent>,
    pub recent_posts: Vec<String>,
    pub awareness: PeerAwareness,
    pub creator_memories: Vec<BotMemory>,
}

/// Assemble the full context snapshot for one bot. Every sub-query tolerates
/// an empty result; only a connection failure aborts the assembly.
pub async fn assemble(db: &Database, roster: &BotRoster, bot: &str) -> anyhow::Result<BotContext> {
    let mut conn = db.get_connection().await?;
    let now = Utc::now();

    let state = bot_states::table
        .find(bot)
        .first::<BotState>(&mut conn)
        .await
        .ok()
        .map(StateSnapshot::from)
        .unwrap_or_else(StateSnapshot::neutral);

    let memories = bot_memories::table
        .filter(bot_memories::bot_username.eq(bot))
        .order(bot_memories::importance.desc())
        .limit(5)
        .load::<BotMemory>(&mut conn)
        .await
        .unwrap_or_default();

    let today_events = bot_daily_events::table
        .filter(bot_daily_events::bot_username.eq(bot))
        .filter(bot_daily_events::event_date.eq(now.date_naive()))
        .filter(bot_daily_events::was_mentioned.eq(false))
        .limit(3)
        .load::<BotDailyEvent>(&mut conn)
        .await
        .unwrap_or_default();

    // Own recent lines, so the responder can avoid repeating itself.
    let recent_posts = match users::table
        .filter(users::username.eq(bot))
        .select(users::id)
        .first::<i64>(&mut conn)
        .await
    {
        Ok(user_id) => posts::table
            .filter(posts::user_id.eq(user_id))
            .order(posts::created_at.desc())
            .limit(10)
            .select(posts::content)
            .load::<String>(&mut conn)
            .await
            .unwrap_or_default(),
        Err(_) => Vec::new(),
    };

    let awareness = match roster.peer_of(bot) {
        Some(peer) => {
            let peer_state = bot_states::table
                .find(&peer.username)
                .first::<BotState>(&mut conn)
                .await
                .ok();
            PeerAwareness {
                other_bot: Some(peer.username.clone()),
                other_bot_mood: peer_state.as_ref().map(|s| s.mood.clone()),
                other_bot_focus: peer_state.as_ref().and_then(|s| s.current_focus.clone()),
                other_bot_last_active: peer_state.and_then(|s| s.last_post_at),
            }
        }
        None => PeerAwareness {
            other_bot: None,
            other_bot_mood: None,
            other_bot_focus: None,
            other_bot_last_active: None,
        },
    };

    let creator_memories = bot_memories::table
        .filter(bot_memories::bot_username.eq(bot))
        .filter(bot_memories::related_user.eq(roster.creator()))
        .order(bot_memories::created_at.desc())
        .limit(3)
        .load::<BotMemory>(&mut conn)
        .await
        .unwrap_or_default();

    Ok(BotContext {
        time: TimeContext::at(now),
        state,
        memories,
        today_events,
        recent_posts,
        awareness,
        creator_memories,
    })
}

/// New memory attached to a context update.
#[derive(Debug, Deserialize)]
pub struct NewMemoryInput {
    #[serde(rename = "type")]
    pub memory_type: Option<String>,
    pub content: String,
    pub related_user: Option<String>,
    pub post_id: Option<i64>,
    pub importance: Option<i32>,
    pub emotional_valence: Option<i32>,
}

// Distinguishes "field absent" from "field set to null" for focus clearing.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial state update a responder sends back after an interaction.
#[derive(Debug, Deserialize)]
pub struct ContextUpdate {
    pub bot_username: String,
    pub mood: Option<String>,
    pub mood_intensity: Option<i32>,
    pub energy: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_focus: Option<Option<String>>,
    pub new_memory: Option<NewMemoryInput>,
    pub mark_event_mentioned: Option<i64>,
}

/// Apply a context update: patch the state row, store the new memory, flag
/// the mentioned event, and stamp the bot as active.
pub async fn apply_update(db: &Database, update: &ContextUpdate) -> anyhow::Result<()> {
    let mut conn = db.get_connection().await?;
    let now = Utc::now();

    let mut patch = BotStatePatch {
        last_post_at: Some(now),
        updated_at: Some(now),
        ..Default::default()
    };
    if let Some(mood) = &update.mood {
        patch.mood = Some(mood.clone());
        patch.mood_updated_at = Some(now);
    }
    patch.mood_intensity = update.mood_intensity;
    patch.energy = update.energy;
    if let Some(focus) = &update.current_focus {
        patch.current_focus = Some(focus.clone());
        patch.focus_started_at = Some(focus.as_ref().map(|_| now));
    }

    diesel::update(bot_states::table.find(&update.bot_username))
        .set(&patch)
        .execute(&mut conn)
        .await?;

    if let Some(memory) = &update.new_memory {
        let row = NewBotMemory {
            bot_username: update.bot_username.clone(),
            memory_type: memory
                .memory_type
                .clone()
                .unwrap_or_else(|| "conversation".to_string()),
            content: memory.content.clone(),
            related_user: memory.related_user.clone(),
            related_post_id: memory.post_id,
            importance: memory.importance.unwrap_or(5),
            emotional_valence: memory.emotional_valence.unwrap_or(0),
        };
        diesel::insert_into(bot_memories::table)
            .values(&row)
            .execute(&mut conn)
            .await?;
    }

    if let Some(event_id) = update.mark_event_mentioned {
        diesel::update(bot_daily_events::table.find(event_id))
            .set(bot_daily_events::was_mentioned.eq(true))
            .execute(&mut conn)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hours_map_to_documented_buckets() {
        assert_eq!(time_of_day(0), "late_night");
        assert_eq!(time_of_day(5), "late_night");
        assert_eq!(time_of_day(6), "morning");
        assert_eq!(time_of_day(11), "morning");
        assert_eq!(time_of_day(12), "afternoon");
        assert_eq!(time_of_day(16), "afternoon");
        assert_eq!(time_of_day(17), "evening");
        assert_eq!(time_of_day(20), "evening");
        assert_eq!(time_of_day(21), "night");
        assert_eq!(time_of_day(23), "night");
    }

    #[test]
    fn weekend_flag_follows_the_calendar() {
        // 2025-11-01 is a Saturday, 2025-11-03 a Monday.
        let sat = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let mon = Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0).unwrap();
        assert!(TimeContext::at(sat).is_weekend);
        assert!(!TimeContext::at(mon).is_weekend);
        assert_eq!(TimeContext::at(mon).time_of_day, "morning");
    }

    #[test]
    fn focus_patch_distinguishes_absent_from_null() {
        let set: ContextUpdate =
            serde_json::from_str(r#"{"bot_username":"b","current_focus":"reading"}"#).unwrap();
        assert_eq!(set.current_focus, Some(Some("reading".to_string())));

        let cleared: ContextUpdate =
            serde_json::from_str(r#"{"bot_username":"b","current_focus":null}"#).unwrap();
        assert_eq!(cleared.current_focus, Some(None));

        let untouched: ContextUpdate = serde_json::from_str(r#"{"bot_username":"b"}"#).unwrap();
        assert_eq!(untouched.current_focus, None);
    }
}
