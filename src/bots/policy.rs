/// Probability, pacing and depth knobs for a single orchestration rule.
#[derive(Debug, Clone, Copy)]
pub struct RulePolicy {
    /// Chance in [0, 1] that the rule fires at all once its preconditions hold.
    pub probability: f64,
    /// Artificial pacing delay applied before the notification goes out.
    pub delay_ms: u64,
    /// Maximum reply depth at which the rule still fires.
    pub max_depth: i32,
}

/// Every tunable constant of the interaction rules in one place, so the
/// behavior is auditable and tests can parametrize it.
#[derive(Debug, Clone)]
pub struct OrchestratorPolicy {
    /// Bot-to-bot reply continuation on the feed.
    pub bot_continuation: RulePolicy,
    /// Second-bot dialogue start under the creator's top-level post.
    pub dialogue_start: RulePolicy,
    /// Peer continuation after a bot speaks in chat.
    pub chat_continuation: RulePolicy,
    /// Whether bots also like a fresh top-level human post.
    pub like_fresh_posts: bool,
    /// Every Nth chat message triggers a summarization request.
    pub summarize_every: i64,
    /// Minimum backlog before a non-forced summary is written.
    pub summary_min_messages: i64,
    /// How many chat lines are sent along as context.
    pub chat_history_limit: i64,
    /// Importance assigned to memories saved from chat exchanges.
    pub chat_memory_importance: i32,
    /// Importance assigned to chat summaries.
    pub summary_importance: i32,
    /// Memories unrecalled for this many days collapse to minimum importance.
    pub memory_decay_days: i64,
    pub memory_decay_importance: i32,
    /// Low-importance memories older than this many days are deleted.
    pub memory_prune_days: i64,
    pub memory_prune_importance: i32,
}

impl Default for OrchestratorPolicy {
    fn default() -> Self {
        Self {
            bot_continuation: RulePolicy {
                probability: 0.5,
                delay_ms: 2_000,
                max_depth: 3,
            },
            dialogue_start: RulePolicy {
                probability: 1.0,
                delay_ms: 2_000,
                max_depth: 3,
            },
            chat_continuation: RulePolicy {
                probability: 0.3,
                delay_ms: 0,
                max_depth: 0,
            },
            like_fresh_posts: true,
            summarize_every: 20,
            summary_min_messages: 15,
            chat_history_limit: 15,
            chat_memory_importance: 7,
            summary_importance: 8,
            memory_decay_days: 7,
            memory_decay_importance: 1,
            memory_prune_days: 30,
            memory_prune_importance: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behavior() {
        let policy = OrchestratorPolicy::default();
        assert_eq!(policy.bot_continuation.max_depth, 3);
        assert!((policy.bot_continuation.probability - 0.5).abs() < f64::EPSILON);
        assert!((policy.chat_continuation.probability - 0.3).abs() < f64::EPSILON);
        assert_eq!(policy.summarize_every, 20);
        assert_eq!(policy.summary_min_messages, 15);
        assert_eq!(policy.memory_decay_days, 7);
        assert_eq!(policy.memory_prune_days, 30);
    }
}
