//! Collapses a backlog of chat messages into a single shared memory.
//! Prefers the external summarization webhook; falls back to a local
//! participants-and-topics heuristic when the webhook is unavailable.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::bots::notifier::http_client;
use crate::bots::policy::OrchestratorPolicy;
use crate::bots::roster::BotRoster;
use crate::config::Config;
use crate::db::Database;
use crate::metrics;
use crate::models::NewBotMemory;
use crate::schema::{bot_memories, chat_messages, users};

/// Keyword → topic dictionary for the local fallback. Substring match on
/// lowercased content; topics keep first-seen order.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("safety concerns", &["bomb", "explosion", "war"]),
    ("tiredness", &["tired", "exhausted", "sleep"]),
    ("positive mood", &["happy", "excited", "good"]),
    ("difficult emotions", &["sad", "upset", "stressed"]),
    ("gaming", &["game", "play"]),
    ("food", &["food", "eat", "cook"]),
    ("work", &["work", "job"]),
];

#[derive(Debug, Clone)]
pub struct TranscriptLine {
    pub from: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SummarizeOutcome {
    Skipped {
        reason: String,
    },
    Summarized {
        method: &'static str,
        summary: String,
        messages_processed: usize,
    },
}

/// Summarize everything said since the last `chat_summary` memory and store
/// the result for every bot on the roster.
pub async fn summarize_chat(
    db: &Database,
    roster: &BotRoster,
    policy: &OrchestratorPolicy,
    force: bool,
) -> anyhow::Result<SummarizeOutcome> {
    let mut conn = db.get_connection().await?;

    let since = last_summary_at(&mut conn).await?;
    let lines: Vec<TranscriptLine> = chat_messages::table
        .inner_join(users::table)
        .filter(chat_messages::created_at.gt(since))
        .order(chat_messages::created_at.asc())
        .select((users::display_name, chat_messages::content))
        .load::<(String, String)>(&mut conn)
        .await?
        .into_iter()
        .map(|(from, content)| TranscriptLine { from, content })
        .collect();

    if lines.is_empty() {
        return Ok(SummarizeOutcome::Skipped {
            reason: "No messages to summarize".to_string(),
        });
    }
    if (lines.len() as i64) < policy.summary_min_messages && !force {
        return Ok(SummarizeOutcome::Skipped {
            reason: format!(
                "Only {} messages since last summary (need {}+)",
                lines.len(),
                policy.summary_min_messages
            ),
        });
    }

    let transcript = lines
        .iter()
        .map(|line| format!("{}: {}", line.from, line.content))
        .collect::<Vec<_>>()
        .join("\n");

    let (method, summary) = match request_remote_summary(&transcript, lines.len()).await {
        Some(summary) => ("ai", summary),
        None => ("simple", fallback_summary(&lines)),
    };

    for bot in roster.bots() {
        let memory = NewBotMemory {
            bot_username: bot.username.clone(),
            memory_type: "chat_summary".to_string(),
            content: summary.clone(),
            related_user: None,
            related_post_id: None,
            importance: policy.summary_importance,
            emotional_valence: 0,
        };
        diesel::insert_into(bot_memories::table)
            .values(&memory)
            .execute(&mut conn)
            .await?;
    }
    metrics::SUMMARIES_WRITTEN.inc();

    Ok(SummarizeOutcome::Summarized {
        method,
        summary,
        messages_processed: lines.len(),
    })
}

/// How far the chat has drifted since the last summary.
pub async fn summary_status(db: &Database, policy: &OrchestratorPolicy) -> anyhow::Result<Value> {
    let mut conn = db.get_connection().await?;

    let last = bot_memories::table
        .filter(bot_memories::memory_type.eq("chat_summary"))
        .order(bot_memories::created_at.desc())
        .select((bot_memories::content, bot_memories::created_at))
        .first::<(String, DateTime<Utc>)>(&mut conn)
        .await
        .ok();

    let since = last
        .as_ref()
        .map(|(_, at)| *at)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let pending: i64 = chat_messages::table
        .filter(chat_messages::created_at.gt(since))
        .count()
        .get_result(&mut conn)
        .await?;

    Ok(json!({
        "last_summary": last.as_ref().map(|(content, _)| content.clone()),
        "last_summary_at": last.as_ref().map(|(_, at)| *at),
        "messages_since_last_summary": pending,
        "needs_summary": pending >= policy.summary_min_messages,
    }))
}

async fn last_summary_at(conn: &mut crate::db::DbConnection) -> anyhow::Result<DateTime<Utc>> {
    let last = bot_memories::table
        .filter(bot_memories::memory_type.eq("chat_summary"))
        .order(bot_memories::created_at.desc())
        .select(bot_memories::created_at)
        .first::<DateTime<Utc>>(conn)
        .await
        .ok();
    Ok(last.unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
}

/// Ask the automation service for a proper summary; `None` means the caller
/// should fall back to the local heuristic.
async fn request_remote_summary(transcript: &str, message_count: usize) -> Option<String> {
    let url = Config::get().webhooks.summarize_url();
    let response = http_client()
        .post(&url)
        .json(&json!({
            "messages": transcript,
            "message_count": message_count,
        }))
        .send()
        .await;

    match response {
        Ok(response) if response.status().is_success() => {
            match response.json::<Value>().await {
                Ok(body) => body
                    .get("summary")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                Err(e) => {
                    warn!("Summarize webhook returned unparseable body: {}", e);
                    None
                }
            }
        }
        Ok(response) => {
            warn!("Summarize webhook returned status {}", response.status());
            None
        }
        Err(e) => {
            warn!("Summarize webhook unreachable: {}", e);
            None
        }
    }
}

/// Local heuristic: who talked, and which known topics came up.
pub fn fallback_summary(lines: &[TranscriptLine]) -> String {
    let mut participants: Vec<&str> = Vec::new();
    let mut topics: Vec<&str> = Vec::new();

    for line in lines {
        if !participants.contains(&line.from.as_str()) {
            participants.push(&line.from);
        }
        let content = line.content.to_lowercase();
        for (topic, keywords) in TOPIC_KEYWORDS {
            if !topics.contains(topic) && keywords.iter().any(|kw| content.contains(kw)) {
                topics.push(topic);
            }
        }
    }

    let topic_str = if topics.is_empty() {
        "casual conversation".to_string()
    } else {
        topics.join(", ")
    };
    format!(
        "Chat with {} about {}. {} messages exchanged.",
        participants.join(", "),
        topic_str,
        lines.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(from: &str, content: &str) -> TranscriptLine {
        TranscriptLine {
            from: from.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn fallback_names_participants_in_first_seen_order() {
        let lines = vec![
            line("Rene", "hello"),
            line("Ethan", "hey"),
            line("Rene", "how are you"),
            line("Eli", "good evening"),
        ];
        let summary = fallback_summary(&lines);
        assert!(summary.starts_with("Chat with Rene, Ethan, Eli about "));
        assert!(summary.ends_with("4 messages exchanged."));
    }

    #[test]
    fn fallback_detects_topics_without_duplicates() {
        let lines = vec![
            line("Rene", "I am so tired today"),
            line("Ethan", "same, barely got any sleep"),
            line("Eli", "maybe we should cook some food"),
        ];
        let summary = fallback_summary(&lines);
        assert!(summary.contains("tiredness"));
        assert!(summary.contains("food"));
        assert_eq!(summary.matches("tiredness").count(), 1);
    }

    #[test]
    fn fallback_defaults_to_casual_conversation() {
        let lines = vec![line("Rene", "hmm"), line("Eli", "indeed")];
        let summary = fallback_summary(&lines);
        assert!(summary.contains("about casual conversation"));
    }

    #[test]
    fn topic_order_is_first_seen() {
        let lines = vec![
            line("Rene", "want to play a game?"),
            line("Ethan", "after I eat some food"),
        ];
        let summary = fallback_summary(&lines);
        let gaming = summary.find("gaming").unwrap();
        let food = summary.find("food").unwrap();
        assert!(gaming < food);
    }
}
