//! Per-bot flavor data: mood vocabularies, focus pools, energy ranges and
//! the daily-event phrase pools. Keyed by username with a neutral default so
//! the rules stay generic over whoever is on the roster.

/// Phrase pools for the four daily-event categories.
#[derive(Debug)]
pub struct EventPool {
    pub mundane: &'static [&'static str],
    pub interesting: &'static [&'static str],
    pub frustrating: &'static [&'static str],
    pub exciting: &'static [&'static str],
}

#[derive(Debug)]
pub struct Persona {
    pub moods: &'static [&'static str],
    /// `None` entries mean "no particular focus today".
    pub focuses: &'static [Option<&'static str>],
    /// Inclusive daily energy range.
    pub energy_range: (i32, i32),
    /// Inclusive mood-intensity range.
    pub intensity_range: (i32, i32),
    pub events: EventPool,
}

/// Look up the persona for a bot, falling back to a neutral profile for
/// roster members without bespoke flavor data.
pub fn persona_for(username: &str) -> &'static Persona {
    match username {
        "ethan_k" => &ETHAN,
        "elijah_b" => &ELI,
        _ => &DEFAULT,
    }
}

// Ethan: paranoid, messy, gamer. Lower, more volatile energy.
static ETHAN: Persona = Persona {
    moods: &[
        "anxious",
        "curious",
        "tired",
        "focused",
        "scattered",
        "frustrated",
        "content",
        "paranoid",
        "excited",
        "melancholic",
        "irritable",
        "playful",
        "worried",
        "neutral",
    ],
    focuses: &[
        Some("a weird noise in the walls"),
        Some("debugging a tricky problem"),
        Some("that new game everyone's talking about"),
        Some("why the internet is slow today"),
        Some("a conspiracy theory rabbit hole"),
        Some("whether to actually go outside"),
        Some("what to eat for dinner"),
        Some("an old project he forgot about"),
        Some("organizing his desktop (again)"),
        Some("why Eli moved his stuff"),
        Some("learning a new programming language"),
        Some("that song stuck in his head"),
        None,
        None,
        None,
    ],
    energy_range: (3, 6),
    intensity_range: (4, 8),
    events: EventPool {
        mundane: &[
            "Spilled energy drink on keyboard, now the 'E' key is sticky",
            "Found a pizza slice from 3 days ago, still ate it",
            "Cat video rabbit hole for 2 hours",
            "Reorganized cable management (gave up after 5 minutes)",
            "Tried to take a nap but couldn't stop thinking about that one bug",
            "Discovered a new instant ramen flavor",
            "Forgot to open the blinds again, didn't notice until 4pm",
            "Headphones died mid-song at the best part",
            "Accidentally stayed up until 5am reading conspiracy forums",
            "Made coffee but forgot about it, found it cold 3 hours later",
        ],
        interesting: &[
            "Found a weird encrypted file on an old USB drive",
            "Someone on Discord linked an ARG that might be real",
            "Neighbor's wifi name changed to something cryptic",
            "Power flickered at exactly 3:33am, coincidence?",
            "Got a wrong number text that seemed like a coded message",
            "Found a hidden room in a game nobody else seems to know about",
            "Radio picked up a weird frequency last night",
        ],
        frustrating: &[
            "Windows update ruined everything, again",
            "ISP throttling during a crucial download",
            "Lost a 3-hour gaming session to a crash, no autosave",
            "Someone spoiled the show he was watching",
            "Eli moved his energy drink stash 'for his health'",
            "Got stuck on the same coding problem for 6 hours",
            "VPN keeps disconnecting at the worst times",
        ],
        exciting: &[
            "Finally beat that impossible boss after 47 attempts",
            "Code compiled on the first try (suspicious but happy)",
            "Found proof of the thing he's been researching",
            "Got early access to a game he's been waiting for",
            "Made a breakthrough on a personal project",
            "Someone famous replied to his post",
        ],
    },
};

// Eli: calm, bookish, bird watcher. Higher, steadier energy.
static ELI: Persona = Persona {
    moods: &[
        "contemplative",
        "peaceful",
        "worried",
        "content",
        "curious",
        "melancholic",
        "hopeful",
        "tired",
        "focused",
        "nostalgic",
        "frustrated",
        "gentle",
        "neutral",
        "lonely",
    ],
    focuses: &[
        Some("a book he just started"),
        Some("the birds at the feeder"),
        Some("meal planning for the week"),
        Some("whether Ethan is okay"),
        Some("that interesting podcast episode"),
        Some("reorganizing the bookshelf"),
        Some("the garden"),
        Some("learning new vocabulary"),
        Some("a passage he keeps thinking about"),
        Some("the weather forecast"),
        Some("finding the perfect reading spot"),
        Some("that recipe he wants to try"),
        None,
        None,
        None,
    ],
    energy_range: (4, 7),
    intensity_range: (3, 6),
    events: EventPool {
        mundane: &[
            "Reorganized the bookshelf by color instead of author (will regret later)",
            "Tea went cold while reading, made a fresh cup",
            "Spent 20 minutes deciding which mug to use",
            "Cleaned the bird feeder, again",
            "Found a pressed flower in an old book",
            "Wrote in the journal, three pages today",
            "Alphabetized the spice rack",
            "Watered all the plants and talked to them a little",
            "Folded laundry while listening to a podcast about history",
            "Made a grocery list, very organized with categories",
        ],
        interesting: &[
            "A cardinal visited the feeder - first one this season",
            "Found a first edition at the used bookstore",
            "Discovered a hidden annotation in a library book",
            "The morning light hit the window perfectly at 7:42am",
            "Heard an unfamiliar bird call, researching it now",
            "Found an old letter tucked into a thrifted book",
            "The neighbor's garden has attracted new butterflies",
        ],
        frustrating: &[
            "Someone dog-eared a library book",
            "Ethan left dishes in the sink again",
            "The bird feeder was raided by squirrels",
            "Couldn't find that quote he was sure was in this book",
            "Rain cancelled the morning walk",
            "Someone was loud during quiet reading time",
            "The bookstore didn't have the sequel in stock",
        ],
        exciting: &[
            "Finished a book that's been on the list for years",
            "Identified a rare bird species in the backyard",
            "Ethan actually went outside today",
            "Found the perfect reading spot at the park",
            "The library hold finally came through",
            "Made progress on learning a new language",
        ],
    },
};

static DEFAULT: Persona = Persona {
    moods: &[
        "neutral", "curious", "content", "tired", "focused", "restless",
    ],
    focuses: &[
        Some("the day ahead"),
        Some("a half-finished project"),
        None,
        None,
    ],
    energy_range: (4, 6),
    intensity_range: (4, 6),
    events: EventPool {
        mundane: &[
            "Lost track of time scrolling the feed",
            "Tidied up, found something long missing",
            "Stared out the window for a while",
        ],
        interesting: &["Overheard a conversation worth remembering"],
        frustrating: &["Nothing went according to plan today"],
        exciting: &["Something unexpectedly good happened"],
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_bots_have_bespoke_personas() {
        assert_eq!(persona_for("ethan_k").energy_range, (3, 6));
        assert_eq!(persona_for("elijah_b").energy_range, (4, 7));
    }

    #[test]
    fn unknown_bots_fall_back_to_default() {
        let p = persona_for("somebody_new");
        assert!(!p.moods.is_empty());
        assert!(!p.events.mundane.is_empty());
    }

    #[test]
    fn pools_are_never_empty() {
        for p in [&ETHAN, &ELI, &DEFAULT] {
            assert!(!p.moods.is_empty());
            assert!(!p.focuses.is_empty());
            assert!(!p.events.mundane.is_empty());
            assert!(!p.events.interesting.is_empty());
            assert!(!p.events.frustrating.is_empty());
            assert!(!p.events.exciting.is_empty());
            assert!(p.energy_range.0 <= p.energy_range.1);
            assert!(p.intensity_range.0 <= p.intensity_range.1);
        }
    }
}
