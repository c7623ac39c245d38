//! The daily routine: reroll each bot's mood, generate the day's events,
//! and age out stale memories. Designed to be re-invoked safely; every step
//! is idempotent or guarded by an existence check.

use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::bots::personas::{persona_for, Persona};
use crate::bots::policy::OrchestratorPolicy;
use crate::bots::roster::BotRoster;
use crate::db::Database;
use crate::metrics;
use crate::models::{NewBotDailyEvent, NewBotState};
use crate::schema::{bot_daily_events, bot_memories, bot_states};

/// A freshly rolled daily disposition for one bot.
#[derive(Debug)]
pub struct RolledState {
    pub mood: &'static str,
    pub focus: Option<&'static str>,
    pub energy: i32,
    pub mood_intensity: i32,
}

/// Draw a new mood, focus and energy from the bot's own distribution.
pub fn roll_state<R: Rng + ?Sized>(persona: &Persona, rng: &mut R) -> RolledState {
    let mood = persona.moods.choose(rng).copied().unwrap_or("neutral");
    let focus = persona.focuses.choose(rng).copied().flatten();
    let (energy_lo, energy_hi) = persona.energy_range;
    let (intensity_lo, intensity_hi) = persona.intensity_range;
    RolledState {
        mood,
        focus,
        energy: rng.gen_range(energy_lo..=energy_hi),
        mood_intensity: rng.gen_range(intensity_lo..=intensity_hi),
    }
}

/// Draw a day's worth of events: one or two mundane ones, then an
/// independent roll per flavor category.
pub fn draw_daily_events<R: Rng + ?Sized>(
    persona: &Persona,
    rng: &mut R,
) -> Vec<(&'static str, &'static str)> {
    let mut events = Vec::new();

    let mundane_count = if rng.gen_bool(0.5) { 2 } else { 1 };
    for _ in 0..mundane_count {
        if let Some(description) = persona.events.mundane.choose(rng) {
            events.push(("mundane", *description));
        }
    }
    if rng.gen_bool(0.5) {
        if let Some(description) = persona.events.interesting.choose(rng) {
            events.push(("interesting", *description));
        }
    }
    if rng.gen_bool(0.3) {
        if let Some(description) = persona.events.frustrating.choose(rng) {
            events.push(("frustrating", *description));
        }
    }
    if rng.gen_bool(0.2) {
        if let Some(description) = persona.events.exciting.choose(rng) {
            events.push(("exciting", *description));
        }
    }

    events
}

/// Generate today's events for every bot on the roster. Skips silently when
/// today already has events, unless `force` is set.
pub async fn generate_daily_events(
    db: &Database,
    roster: &BotRoster,
    force: bool,
) -> anyhow::Result<Value> {
    let mut conn = db.get_connection().await?;
    let today = Utc::now().date_naive();

    let existing: i64 = bot_daily_events::table
        .filter(bot_daily_events::event_date.eq(today))
        .count()
        .get_result(&mut conn)
        .await?;

    if existing > 0 && !force {
        return Ok(json!({ "message": "Events already generated for today" }));
    }

    let mut report = serde_json::Map::new();
    let mut rows = Vec::new();
    for bot in roster.bots() {
        let drawn = draw_daily_events(persona_for(&bot.username), &mut rand::thread_rng());
        report.insert(bot.username.clone(), json!(drawn.len()));
        for (event_type, description) in drawn {
            rows.push(NewBotDailyEvent {
                bot_username: bot.username.clone(),
                event_date: today,
                event_type: event_type.to_string(),
                event_description: description.to_string(),
            });
        }
    }

    diesel::insert_into(bot_daily_events::table)
        .values(&rows)
        .execute(&mut conn)
        .await?;

    report.insert("success".to_string(), json!(true));
    Ok(Value::Object(report))
}

/// Collapse stale memories to minimum importance. A memory is stale when it
/// was last recalled past the decay window, or was never recalled and is
/// older than the window. Returns how many rows were touched.
pub async fn decay_memories(
    db: &Database,
    policy: &OrchestratorPolicy,
) -> anyhow::Result<usize> {
    let mut conn = db.get_connection().await?;
    let cutoff = Utc::now() - Duration::days(policy.memory_decay_days);

    let recalled_long_ago = diesel::update(
        bot_memories::table.filter(bot_memories::last_recalled_at.lt(cutoff)),
    )
    .set(bot_memories::importance.eq(policy.memory_decay_importance))
    .execute(&mut conn)
    .await?;

    let never_recalled = diesel::update(
        bot_memories::table
            .filter(bot_memories::last_recalled_at.is_null())
            .filter(bot_memories::created_at.lt(cutoff)),
    )
    .set(bot_memories::importance.eq(policy.memory_decay_importance))
    .execute(&mut conn)
    .await?;

    Ok(recalled_long_ago + never_recalled)
}

/// Delete memories that decayed and were never revisited.
pub async fn prune_memories(
    db: &Database,
    policy: &OrchestratorPolicy,
) -> anyhow::Result<usize> {
    let mut conn = db.get_connection().await?;
    let cutoff = Utc::now() - Duration::days(policy.memory_prune_days);

    let deleted = diesel::delete(
        bot_memories::table
            .filter(bot_memories::importance.le(policy.memory_prune_importance))
            .filter(bot_memories::created_at.lt(cutoff)),
    )
    .execute(&mut conn)
    .await?;

    Ok(deleted)
}

/// Run the full daily routine. Steps are independent and best-effort: one
/// failing step is reported but never stops the others.
pub async fn run_daily_routine(
    db: &Database,
    roster: &BotRoster,
    policy: &OrchestratorPolicy,
) -> Value {
    metrics::ROUTINE_RUNS.inc();
    let now = Utc::now();
    let mut report = serde_json::Map::new();

    // 1. Reroll moods, reset daily counters. Upsert keyed on the bot, so
    //    re-running simply overwrites.
    for bot in roster.bots() {
        let rolled = roll_state(persona_for(&bot.username), &mut rand::thread_rng());
        let state = NewBotState {
            bot_username: bot.username.clone(),
            mood: rolled.mood.to_string(),
            mood_intensity: rolled.mood_intensity,
            mood_updated_at: Some(now),
            energy: rolled.energy,
            current_focus: rolled.focus.map(str::to_string),
            focus_started_at: rolled.focus.map(|_| now),
            posts_today: 0,
            day_started_at: Some(now.date_naive()),
            updated_at: now,
        };

        let result = async {
            let mut conn = db.get_connection().await?;
            diesel::insert_into(bot_states::table)
                .values(&state)
                .on_conflict(bot_states::bot_username)
                .do_update()
                .set(&state)
                .execute(&mut conn)
                .await?;
            anyhow::Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(
                    "Rolled {}: mood={} energy={}",
                    bot.username, rolled.mood, rolled.energy
                );
                report.insert(
                    bot.username.clone(),
                    json!({
                        "mood": rolled.mood,
                        "energy": rolled.energy,
                        "focus": rolled.focus,
                    }),
                );
            }
            Err(e) => {
                warn!("Failed to roll state for {}: {}", bot.username, e);
                report.insert(bot.username.clone(), json!({ "error": e.to_string() }));
            }
        }
    }

    // 2. Daily events, guarded by the same-day existence check.
    match generate_daily_events(db, roster, false).await {
        Ok(events) => {
            report.insert("events".to_string(), events);
        }
        Err(e) => {
            warn!("Failed to generate daily events: {}", e);
            report.insert("events".to_string(), json!({ "error": e.to_string() }));
        }
    }

    // 3. Decay, 4. Prune.
    match decay_memories(db, policy).await {
        Ok(count) => {
            report.insert("decayed_memories".to_string(), json!(count));
        }
        Err(e) => {
            warn!("Failed to decay memories: {}", e);
            report.insert("decayed_memories".to_string(), json!({ "error": e.to_string() }));
        }
    }
    match prune_memories(db, policy).await {
        Ok(count) => {
            report.insert("pruned_memories".to_string(), json!(count));
        }
        Err(e) => {
            warn!("Failed to prune memories: {}", e);
            report.insert("pruned_memories".to_string(), json!({ "error": e.to_string() }));
        }
    }

    report.insert("success".to_string(), json!(true));
    report.insert("timestamp".to_string(), json!(now));
    Value::Object(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rolled_state_stays_within_persona_ranges() {
        let persona = persona_for("ethan_k");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let rolled = roll_state(persona, &mut rng);
            assert!((3..=6).contains(&rolled.energy));
            assert!((4..=8).contains(&rolled.mood_intensity));
            assert!(persona.moods.contains(&rolled.mood));
        }
    }

    #[test]
    fn daily_events_always_include_mundane_ones() {
        let persona = persona_for("elijah_b");
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let events = draw_daily_events(persona, &mut rng);
            let mundane = events.iter().filter(|(t, _)| *t == "mundane").count();
            assert!((1..=2).contains(&mundane));
            // At most one event of each flavor category.
            for flavor in ["interesting", "frustrating", "exciting"] {
                assert!(events.iter().filter(|(t, _)| *t == flavor).count() <= 1);
            }
        }
    }

    #[test]
    fn flavor_categories_roll_independently() {
        let persona = persona_for("ethan_k");
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen_interesting = false;
        let mut seen_frustrating = false;
        let mut seen_exciting = false;
        let mut seen_bare = false;
        for _ in 0..500 {
            let events = draw_daily_events(persona, &mut rng);
            let types: Vec<&str> = events.iter().map(|(t, _)| *t).collect();
            seen_interesting |= types.contains(&"interesting");
            seen_frustrating |= types.contains(&"frustrating");
            seen_exciting |= types.contains(&"exciting");
            seen_bare |= types.iter().all(|t| *t == "mundane");
        }
        assert!(seen_interesting && seen_frustrating && seen_exciting && seen_bare);
    }
}
