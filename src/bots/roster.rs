use anyhow::{bail, Result};

use crate::config::Config;

/// A single bot persona known to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub username: String,
    /// Slug used to derive the bot's webhook endpoints.
    pub webhook_slug: String,
}

/// The configured set of bot identities plus the creator account.
///
/// Rules never name bots directly; they ask the roster "is this a bot" and
/// "who is its peer". The peer of a bot is the next roster member in cyclic
/// order, which for the two-bot roster is simply the other bot.
#[derive(Debug, Clone)]
pub struct BotRoster {
    bots: Vec<BotIdentity>,
    creator: String,
}

impl BotRoster {
    /// Parse a roster from a `username=slug,username=slug` spec.
    pub fn from_spec(spec: &str, creator: &str) -> Result<Self> {
        let mut bots = Vec::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (username, slug) = match entry.split_once('=') {
                Some((u, s)) => (u.trim(), s.trim()),
                None => (entry, entry),
            };
            if username.is_empty() || slug.is_empty() {
                bail!("Invalid roster entry: {:?}", entry);
            }
            if username == creator {
                bail!("Creator {:?} cannot also be a bot", creator);
            }
            bots.push(BotIdentity {
                username: username.to_string(),
                webhook_slug: slug.to_string(),
            });
        }
        if bots.is_empty() {
            bail!("Roster spec names no bots");
        }
        Ok(Self {
            bots,
            creator: creator.to_string(),
        })
    }

    /// Build the roster from the global configuration.
    pub fn from_config() -> Result<Self> {
        let config = Config::get();
        Self::from_spec(&config.bots.roster_spec, &config.bots.creator_username)
    }

    pub fn bots(&self) -> &[BotIdentity] {
        &self.bots
    }

    pub fn get(&self, username: &str) -> Option<&BotIdentity> {
        self.bots.iter().find(|b| b.username == username)
    }

    pub fn is_bot(&self, username: &str) -> bool {
        self.get(username).is_some()
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn is_creator(&self, username: &str) -> bool {
        self.creator == username
    }

    /// The bot that responds to `username`: the next roster member in cyclic
    /// order. Returns `None` for non-bots and single-bot rosters.
    pub fn peer_of(&self, username: &str) -> Option<&BotIdentity> {
        if self.bots.len() < 2 {
            return None;
        }
        let idx = self.bots.iter().position(|b| b.username == username)?;
        Some(&self.bots[(idx + 1) % self.bots.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> BotRoster {
        BotRoster::from_spec("ethan_k=ethan,elijah_b=elijah", "lamienq").unwrap()
    }

    #[test]
    fn parses_spec_entries() {
        let r = roster();
        assert_eq!(r.bots().len(), 2);
        assert_eq!(r.get("ethan_k").unwrap().webhook_slug, "ethan");
        assert_eq!(r.get("elijah_b").unwrap().webhook_slug, "elijah");
        assert!(r.is_creator("lamienq"));
        assert!(!r.is_bot("lamienq"));
    }

    #[test]
    fn entry_without_slug_uses_username() {
        let r = BotRoster::from_spec("solo_bot", "creator").unwrap();
        assert_eq!(r.get("solo_bot").unwrap().webhook_slug, "solo_bot");
    }

    #[test]
    fn two_bot_peers_are_complements() {
        let r = roster();
        assert_eq!(r.peer_of("ethan_k").unwrap().username, "elijah_b");
        assert_eq!(r.peer_of("elijah_b").unwrap().username, "ethan_k");
        assert!(r.peer_of("lamienq").is_none());
    }

    #[test]
    fn single_bot_has_no_peer() {
        let r = BotRoster::from_spec("solo_bot=solo", "creator").unwrap();
        assert!(r.peer_of("solo_bot").is_none());
    }

    #[test]
    fn rejects_empty_and_creator_entries() {
        assert!(BotRoster::from_spec("", "creator").is_err());
        assert!(BotRoster::from_spec("creator=c", "creator").is_err());
    }
}
