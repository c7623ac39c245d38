use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rand::Rng;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::bots::context;
use crate::bots::notifier::Notifier;
use crate::bots::policy::OrchestratorPolicy;
use crate::bots::roster::BotRoster;
use crate::config::Config;
use crate::db::Database;
use crate::metrics;
use crate::models::{ChatMessage, NewBotMemory, NewLike, Post, User};
use crate::schema::{bot_states, bot_memories, chat_messages, likes, posts, users};

/// A freshly created feed post, reduced to what the rules need.
#[derive(Debug)]
pub struct FeedEvent {
    pub author: String,
    /// Caller-supplied loop counter, threaded through the webhook round trip.
    pub depth: i32,
    pub parent: Option<ParentPost>,
    /// Whether the author's peer already replied under the same parent,
    /// judged by post id order.
    pub peer_replied_earlier: bool,
}

#[derive(Debug)]
pub struct ParentPost {
    pub author: String,
    pub is_top_level: bool,
}

#[derive(Debug, PartialEq)]
pub enum FeedAction {
    Notify {
        bot: String,
        depth: i32,
        delay_ms: u64,
    },
    Like {
        bot: String,
    },
}

/// A freshly created chat message, reduced to what the rules need.
#[derive(Debug)]
pub struct ChatEvent {
    pub author: String,
    /// Total messages in the chat including this one.
    pub total_messages: i64,
}

#[derive(Debug, PartialEq)]
pub enum ChatAction {
    Notify { bot: String },
    RememberExchange,
    TriggerSummarize,
}

/// Decide which bots to notify for a feed post. Pure: the random roll is
/// supplied by the caller, so the rule table is fully testable.
///
/// Rules are evaluated in order, first match wins:
/// 1. Fresh top-level post by a human: both bots comment (and like it).
/// 2. Fresh top-level post by a bot: its peer comments.
/// 3. The creator replied to a bot: that bot always answers, depth resets.
/// 4. Another human replied to a bot: that bot answers, depth increments.
/// 5. A bot replied to a bot: the thread continues with limited depth,
///    limited probability, and a pacing delay.
/// 6. A bot replied to the creator's top-level post after its peer already
///    did: the later bot opens a bot-to-bot dialogue. Post id order decides
///    who was later, so the trigger fires exactly once.
pub fn decide_feed(
    roster: &BotRoster,
    policy: &OrchestratorPolicy,
    event: &FeedEvent,
    roll: f64,
) -> Vec<FeedAction> {
    let mut actions = Vec::new();
    let author_is_bot = roster.is_bot(&event.author);

    let Some(parent) = &event.parent else {
        if !author_is_bot {
            for bot in roster.bots() {
                actions.push(FeedAction::Notify {
                    bot: bot.username.clone(),
                    depth: 0,
                    delay_ms: 0,
                });
                if policy.like_fresh_posts {
                    actions.push(FeedAction::Like {
                        bot: bot.username.clone(),
                    });
                }
            }
        } else if let Some(peer) = roster.peer_of(&event.author) {
            actions.push(FeedAction::Notify {
                bot: peer.username.clone(),
                depth: 0,
                delay_ms: 0,
            });
        }
        return actions;
    };

    let parent_is_bot = roster.is_bot(&parent.author);

    if roster.is_creator(&event.author) && parent_is_bot {
        // Creator conversations are exempt from the bot-to-bot depth limit.
        actions.push(FeedAction::Notify {
            bot: parent.author.clone(),
            depth: 0,
            delay_ms: 0,
        });
    } else if !author_is_bot && parent_is_bot {
        actions.push(FeedAction::Notify {
            bot: parent.author.clone(),
            depth: event.depth + 1,
            delay_ms: 0,
        });
    } else if author_is_bot && parent_is_bot {
        let rule = &policy.bot_continuation;
        if event.depth < rule.max_depth && roll < rule.probability {
            actions.push(FeedAction::Notify {
                bot: parent.author.clone(),
                depth: event.depth + 1,
                delay_ms: rule.delay_ms,
            });
        }
    } else if author_is_bot
        && roster.is_creator(&parent.author)
        && parent.is_top_level
        && event.peer_replied_earlier
    {
        let rule = &policy.dialogue_start;
        if roll < rule.probability {
            if let Some(peer) = roster.peer_of(&event.author) {
                actions.push(FeedAction::Notify {
                    bot: peer.username.clone(),
                    depth: event.depth + 1,
                    delay_ms: rule.delay_ms,
                });
            }
        }
    }

    actions
}

/// Decide the chat-side reactions to a new message. Pure, like [`decide_feed`].
pub fn decide_chat(
    roster: &BotRoster,
    policy: &OrchestratorPolicy,
    event: &ChatEvent,
    roll: f64,
) -> Vec<ChatAction> {
    let mut actions = Vec::new();

    if !roster.is_bot(&event.author) {
        for bot in roster.bots() {
            actions.push(ChatAction::Notify {
                bot: bot.username.clone(),
            });
        }
    } else {
        actions.push(ChatAction::RememberExchange);
        if roll < policy.chat_continuation.probability {
            if let Some(peer) = roster.peer_of(&event.author) {
                actions.push(ChatAction::Notify {
                    bot: peer.username.clone(),
                });
            }
        }
    }

    if event.total_messages > 0 && event.total_messages % policy.summarize_every == 0 {
        actions.push(ChatAction::TriggerSummarize);
    }

    actions
}

/// One line of chat history shipped to the responder webhooks.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryLine {
    pub from: String,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Resolved context of the message a chat message replied to.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReplyContext {
    pub username: String,
    pub display_name: String,
    pub content: String,
}

/// Reacts to every new post and chat message: applies the rule tables,
/// assembles payloads, and fires webhook notifications. All side effects are
/// best-effort; a failure here never reaches the request that created the
/// triggering row.
pub struct Orchestrator {
    db: Arc<Database>,
    roster: Arc<BotRoster>,
    policy: OrchestratorPolicy,
    notifier: Arc<dyn Notifier>,
    client: reqwest::Client,
}

impl Orchestrator {
    pub fn new(db: Arc<Database>, roster: Arc<BotRoster>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            roster,
            policy: OrchestratorPolicy::default(),
            notifier,
            client: crate::bots::notifier::http_client(),
        }
    }

    pub fn roster(&self) -> &BotRoster {
        &self.roster
    }

    pub fn policy(&self) -> &OrchestratorPolicy {
        &self.policy
    }

    /// Run the feed rules for a new post in the background.
    pub fn spawn_post_created(self: Arc<Self>, post: Post, author: User, depth: i32) {
        tokio::spawn(async move {
            self.handle_post_created(post, author, depth).await;
        });
    }

    /// Run the chat rules for a new message in the background.
    pub fn spawn_chat_message(
        self: Arc<Self>,
        message: ChatMessage,
        author: User,
        reply_context: Option<ChatReplyContext>,
    ) {
        tokio::spawn(async move {
            self.handle_chat_message(message, author, reply_context).await;
        });
    }

    async fn handle_post_created(&self, post: Post, author: User, depth: i32) {
        if author.is_bot {
            self.bump_bot_activity(&author.username).await;
        }

        let event = match self.build_feed_event(&post, &author, depth).await {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to inspect post {} for bot routing: {}", post.id, e);
                return;
            }
        };

        let roll = rand::thread_rng().gen::<f64>();
        let actions = decide_feed(&self.roster, &self.policy, &event, roll);
        debug!("Post {} produced {} bot action(s)", post.id, actions.len());

        for action in actions {
            match action {
                FeedAction::Notify {
                    bot,
                    depth,
                    delay_ms,
                } => self.fire_comment_webhook(&bot, &post, depth, delay_ms),
                FeedAction::Like { bot } => {
                    if let Err(e) = self.like_as_bot(&bot, post.id).await {
                        warn!("Bot {} could not like post {}: {}", bot, post.id, e);
                    }
                }
            }
        }
    }

    async fn build_feed_event(
        &self,
        post: &Post,
        author: &User,
        depth: i32,
    ) -> anyhow::Result<FeedEvent> {
        let parent = match post.reply_to_id {
            Some(parent_id) => {
                let mut conn = self.db.get_connection().await?;
                posts::table
                    .inner_join(users::table)
                    .filter(posts::id.eq(parent_id))
                    .first::<(Post, User)>(&mut conn)
                    .await
                    .ok()
                    .map(|(parent_post, parent_user)| {
                        (parent_post.id, parent_post.reply_to_id.is_none(), parent_user.username)
                    })
            }
            None => None,
        };

        let mut event = FeedEvent {
            author: author.username.clone(),
            depth,
            parent: None,
            peer_replied_earlier: false,
        };

        if let Some((parent_id, is_top_level, parent_author)) = parent {
            // The dialogue-start rule needs to know whether the peer's reply
            // is already under the same parent. Post ids are monotonic, so
            // "peer id < my id" is "the peer commented first".
            if author.is_bot && is_top_level && self.roster.is_creator(&parent_author) {
                if let Some(peer) = self.roster.peer_of(&author.username) {
                    let mut conn = self.db.get_connection().await?;
                    let earlier: i64 = posts::table
                        .inner_join(users::table)
                        .filter(posts::reply_to_id.eq(parent_id))
                        .filter(users::username.eq(&peer.username))
                        .filter(posts::id.lt(post.id))
                        .count()
                        .get_result(&mut conn)
                        .await?;
                    event.peer_replied_earlier = earlier > 0;
                }
            }
            event.parent = Some(ParentPost {
                author: parent_author,
                is_top_level,
            });
        }

        Ok(event)
    }

    /// Fire-and-forget feed notification; the depth travels in the payload
    /// and comes back as the depth of the bot's own reply.
    fn fire_comment_webhook(&self, bot: &str, post: &Post, depth: i32, delay_ms: u64) {
        let Some(identity) = self.roster.get(bot) else {
            warn!("Cannot notify unknown bot {}", bot);
            return;
        };
        let url = Config::get().webhooks.comment_url(&identity.webhook_slug);
        let payload = json!({
            "post_id": post.id,
            "content": post.content,
            "depth": depth,
        });
        let bot = bot.to_string();
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            if delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            }
            metrics::NOTIFICATIONS_FIRED.with_label_values(&["feed"]).inc();
            if let Err(e) = notifier.notify(&url, &payload).await {
                metrics::NOTIFICATION_FAILURES
                    .with_label_values(&["feed"])
                    .inc();
                warn!("Failed to trigger {}: {}", bot, e);
            }
        });
    }

    async fn like_as_bot(&self, bot: &str, post_id: i64) -> anyhow::Result<()> {
        let mut conn = self.db.get_connection().await?;
        let bot_user_id: i64 = users::table
            .filter(users::username.eq(bot))
            .select(users::id)
            .first(&mut conn)
            .await?;

        diesel::insert_into(likes::table)
            .values(&NewLike {
                user_id: bot_user_id,
                post_id,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn handle_chat_message(
        &self,
        message: ChatMessage,
        author: User,
        reply_context: Option<ChatReplyContext>,
    ) {
        if author.is_bot {
            self.bump_bot_activity(&author.username).await;
        }

        let total_messages = match self.count_chat_messages().await {
            Ok(n) => n,
            Err(e) => {
                warn!("Failed to count chat messages: {}", e);
                0
            }
        };

        let roll = rand::thread_rng().gen::<f64>();
        let event = ChatEvent {
            author: author.username.clone(),
            total_messages,
        };
        let actions = decide_chat(&self.roster, &self.policy, &event, roll);

        for action in actions {
            match action {
                ChatAction::Notify { bot } => {
                    if let Err(e) = self
                        .fire_chat_webhook(&bot, &message, &author, reply_context.as_ref())
                        .await
                    {
                        metrics::NOTIFICATION_FAILURES
                            .with_label_values(&["chat"])
                            .inc();
                        warn!("Failed to trigger {} chat: {}", bot, e);
                    }
                }
                ChatAction::RememberExchange => {
                    if let Err(e) = self.save_chat_memories(&author.username, &message.content).await
                    {
                        warn!("Failed to save chat memory for {}: {}", author.username, e);
                    }
                }
                ChatAction::TriggerSummarize => self.fire_summarize_self_call(),
            }
        }
    }

    async fn count_chat_messages(&self) -> anyhow::Result<i64> {
        let mut conn = self.db.get_connection().await?;
        let total = chat_messages::table.count().get_result(&mut conn).await?;
        Ok(total)
    }

    /// Chat notifications carry the full conversational context: history,
    /// the other bot's last line, and the bot's simulated internal state.
    async fn fire_chat_webhook(
        &self,
        bot: &str,
        message: &ChatMessage,
        sender: &User,
        reply_context: Option<&ChatReplyContext>,
    ) -> anyhow::Result<()> {
        let Some(identity) = self.roster.get(bot) else {
            anyhow::bail!("Unknown bot {}", bot);
        };
        let url = Config::get().webhooks.chat_url(&identity.webhook_slug);

        let history = self
            .recent_chat_history(self.policy.chat_history_limit)
            .await
            .unwrap_or_default();
        let other_bot_said = self.roster.peer_of(bot).and_then(|peer| {
            history
                .iter()
                .rev()
                .find(|line| line.username == peer.username)
                .map(|line| line.content.clone())
        });

        let bot_context = context::assemble(&self.db, &self.roster, bot).await.ok();
        let context_payload = bot_context.map(|ctx| {
            json!({
                "time": ctx.time,
                "mood": ctx.state.mood,
                "mood_intensity": ctx.state.mood_intensity,
                "energy": ctx.state.energy,
                "current_focus": ctx.state.current_focus,
                "recent_memories": ctx.memories.iter().take(3)
                    .map(|m| m.content.clone()).collect::<Vec<_>>(),
                "todays_events": ctx.today_events.iter()
                    .map(|e| e.event_description.clone()).collect::<Vec<_>>(),
                "creator_memories": ctx.creator_memories.iter()
                    .map(|m| m.content.clone()).collect::<Vec<_>>(),
            })
        });

        let payload = json!({
            "message_content": message.content,
            "sender": sender.username,
            "sender_display_name": sender.display_name,
            "reply_to_message_id": message.id,
            "chat_history": history,
            "other_bot_said": other_bot_said,
            "reply_to": reply_context,
            "context": context_payload,
        });

        metrics::NOTIFICATIONS_FIRED.with_label_values(&["chat"]).inc();
        self.notifier.notify(&url, &payload).await?;
        Ok(())
    }

    async fn recent_chat_history(&self, limit: i64) -> anyhow::Result<Vec<HistoryLine>> {
        let mut conn = self.db.get_connection().await?;
        let mut rows = chat_messages::table
            .inner_join(users::table)
            .order(chat_messages::created_at.desc())
            .limit(limit)
            .load::<(ChatMessage, User)>(&mut conn)
            .await?;
        rows.reverse();

        Ok(rows
            .into_iter()
            .map(|(msg, user)| HistoryLine {
                from: user.display_name,
                username: user.username,
                content: msg.content,
                timestamp: msg.created_at,
            })
            .collect())
    }

    /// After a bot speaks in chat, remember both sides of the exchange: what
    /// the bot said, and the last thing a human said.
    async fn save_chat_memories(&self, bot: &str, content: &str) -> anyhow::Result<()> {
        let mut conn = self.db.get_connection().await?;

        let own = NewBotMemory {
            bot_username: bot.to_string(),
            memory_type: "chat_conversation".to_string(),
            content: format!("In chat, I said: \"{}\"", clip(content, 200)),
            related_user: None,
            related_post_id: None,
            importance: self.policy.chat_memory_importance,
            emotional_valence: 0,
        };
        diesel::insert_into(bot_memories::table)
            .values(&own)
            .execute(&mut conn)
            .await?;

        let history = self.recent_chat_history(10).await?;
        if let Some(line) = history
            .iter()
            .rev()
            .find(|line| !self.roster.is_bot(&line.username))
        {
            let heard = NewBotMemory {
                bot_username: bot.to_string(),
                memory_type: "chat_conversation".to_string(),
                content: format!("{} said in chat: \"{}\"", line.from, clip(&line.content, 200)),
                related_user: Some(line.username.clone()),
                related_post_id: None,
                importance: self.policy.chat_memory_importance,
                emotional_valence: 0,
            };
            diesel::insert_into(bot_memories::table)
                .values(&heard)
                .execute(&mut conn)
                .await?;
        }
        Ok(())
    }

    /// Kick off summarization through the public endpoint so it runs fully
    /// detached from the message that tripped the counter.
    fn fire_summarize_self_call(&self) {
        let url = format!("{}/api/bots/summarize", Config::get().api.base_url);
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.post(&url).json(&json!({})).send().await {
                warn!("Auto-summarize self-call failed: {}", e);
            }
        });
    }

    async fn bump_bot_activity(&self, bot: &str) {
        let now = Utc::now();
        let result = async {
            let mut conn = self.db.get_connection().await?;
            diesel::update(bot_states::table.filter(bot_states::bot_username.eq(bot)))
                .set((
                    bot_states::last_post_at.eq(now),
                    bot_states::posts_today.eq(bot_states::posts_today + 1),
                    bot_states::updated_at.eq(now),
                ))
                .execute(&mut conn)
                .await?;
            anyhow::Ok(())
        }
        .await;

        if let Err(e) = result {
            warn!("Failed to bump activity for {}: {}", bot, e);
        }
    }
}

fn clip(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bots::roster::BotRoster;

    fn roster() -> BotRoster {
        BotRoster::from_spec("ethan_k=ethan,elijah_b=elijah", "lamienq").unwrap()
    }

    fn policy() -> OrchestratorPolicy {
        OrchestratorPolicy::default()
    }

    fn notified(actions: &[FeedAction]) -> Vec<(&str, i32)> {
        actions
            .iter()
            .filter_map(|a| match a {
                FeedAction::Notify { bot, depth, .. } => Some((bot.as_str(), *depth)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn human_top_level_post_notifies_both_bots_at_depth_zero() {
        let event = FeedEvent {
            author: "some_user".into(),
            depth: 0,
            parent: None,
            peer_replied_earlier: false,
        };
        let actions = decide_feed(&roster(), &policy(), &event, 0.99);
        assert_eq!(notified(&actions), vec![("ethan_k", 0), ("elijah_b", 0)]);
        let likes: Vec<_> = actions
            .iter()
            .filter(|a| matches!(a, FeedAction::Like { .. }))
            .collect();
        assert_eq!(likes.len(), 2);
    }

    #[test]
    fn bot_top_level_post_notifies_only_its_peer() {
        let event = FeedEvent {
            author: "ethan_k".into(),
            depth: 0,
            parent: None,
            peer_replied_earlier: false,
        };
        let actions = decide_feed(&roster(), &policy(), &event, 0.99);
        assert_eq!(notified(&actions), vec![("elijah_b", 0)]);
        assert!(!actions.iter().any(|a| matches!(a, FeedAction::Like { .. })));
    }

    #[test]
    fn creator_reply_to_bot_resets_depth() {
        let event = FeedEvent {
            author: "lamienq".into(),
            depth: 5,
            parent: Some(ParentPost {
                author: "ethan_k".into(),
                is_top_level: false,
            }),
            peer_replied_earlier: false,
        };
        let actions = decide_feed(&roster(), &policy(), &event, 0.99);
        assert_eq!(notified(&actions), vec![("ethan_k", 0)]);
    }

    #[test]
    fn other_human_reply_to_bot_increments_depth() {
        let event = FeedEvent {
            author: "some_user".into(),
            depth: 1,
            parent: Some(ParentPost {
                author: "elijah_b".into(),
                is_top_level: false,
            }),
            peer_replied_earlier: false,
        };
        let actions = decide_feed(&roster(), &policy(), &event, 0.99);
        assert_eq!(notified(&actions), vec![("elijah_b", 2)]);
    }

    #[test]
    fn bot_to_bot_reply_below_limit_continues_with_delay() {
        let event = FeedEvent {
            author: "ethan_k".into(),
            depth: 1,
            parent: Some(ParentPost {
                author: "elijah_b".into(),
                is_top_level: false,
            }),
            peer_replied_earlier: false,
        };
        let actions = decide_feed(&roster(), &policy(), &event, 0.1);
        assert_eq!(
            actions,
            vec![FeedAction::Notify {
                bot: "elijah_b".into(),
                depth: 2,
                delay_ms: policy().bot_continuation.delay_ms,
            }]
        );
    }

    #[test]
    fn bot_to_bot_reply_at_max_depth_is_silent() {
        let max = policy().bot_continuation.max_depth;
        let event = FeedEvent {
            author: "ethan_k".into(),
            depth: max,
            parent: Some(ParentPost {
                author: "elijah_b".into(),
                is_top_level: false,
            }),
            peer_replied_earlier: false,
        };
        // Roll of 0.0 would pass the probability gate, so only depth stops it.
        assert!(decide_feed(&roster(), &policy(), &event, 0.0).is_empty());
    }

    #[test]
    fn bot_to_bot_reply_loses_the_coin_flip() {
        let event = FeedEvent {
            author: "ethan_k".into(),
            depth: 0,
            parent: Some(ParentPost {
                author: "elijah_b".into(),
                is_top_level: false,
            }),
            peer_replied_earlier: false,
        };
        assert!(decide_feed(&roster(), &policy(), &event, 0.9).is_empty());
    }

    #[test]
    fn second_bot_under_creator_post_starts_dialogue() {
        let event = FeedEvent {
            author: "elijah_b".into(),
            depth: 0,
            parent: Some(ParentPost {
                author: "lamienq".into(),
                is_top_level: true,
            }),
            peer_replied_earlier: true,
        };
        let actions = decide_feed(&roster(), &policy(), &event, 0.5);
        assert_eq!(notified(&actions), vec![("ethan_k", 1)]);
    }

    #[test]
    fn first_bot_under_creator_post_stays_silent() {
        let event = FeedEvent {
            author: "elijah_b".into(),
            depth: 0,
            parent: Some(ParentPost {
                author: "lamienq".into(),
                is_top_level: true,
            }),
            peer_replied_earlier: false,
        };
        assert!(decide_feed(&roster(), &policy(), &event, 0.5).is_empty());
    }

    #[test]
    fn bot_reply_under_creator_comment_is_not_a_dialogue_start() {
        // Same shape but the parent is itself a reply, so no dialogue fires.
        let event = FeedEvent {
            author: "elijah_b".into(),
            depth: 0,
            parent: Some(ParentPost {
                author: "lamienq".into(),
                is_top_level: false,
            }),
            peer_replied_earlier: true,
        };
        assert!(decide_feed(&roster(), &policy(), &event, 0.5).is_empty());
    }

    #[test]
    fn human_chat_message_notifies_both_bots() {
        let event = ChatEvent {
            author: "lamienq".into(),
            total_messages: 7,
        };
        let actions = decide_chat(&roster(), &policy(), &event, 0.99);
        assert_eq!(
            actions,
            vec![
                ChatAction::Notify {
                    bot: "ethan_k".into()
                },
                ChatAction::Notify {
                    bot: "elijah_b".into()
                },
            ]
        );
    }

    #[test]
    fn bot_chat_message_remembers_and_sometimes_continues() {
        let event = ChatEvent {
            author: "ethan_k".into(),
            total_messages: 7,
        };

        let quiet = decide_chat(&roster(), &policy(), &event, 0.9);
        assert_eq!(quiet, vec![ChatAction::RememberExchange]);

        let chatty = decide_chat(&roster(), &policy(), &event, 0.1);
        assert_eq!(
            chatty,
            vec![
                ChatAction::RememberExchange,
                ChatAction::Notify {
                    bot: "elijah_b".into()
                },
            ]
        );
    }

    #[test]
    fn every_twentieth_message_triggers_summarization() {
        let event = ChatEvent {
            author: "lamienq".into(),
            total_messages: 20,
        };
        let actions = decide_chat(&roster(), &policy(), &event, 0.99);
        assert!(actions.contains(&ChatAction::TriggerSummarize));

        let event = ChatEvent {
            author: "lamienq".into(),
            total_messages: 21,
        };
        let actions = decide_chat(&roster(), &policy(), &event, 0.99);
        assert!(!actions.contains(&ChatAction::TriggerSummarize));
    }

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("héllo wörld", 5), "héllo");
        assert_eq!(clip("short", 200), "short");
    }
}
