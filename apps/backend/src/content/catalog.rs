use async_trait::async_trait;
use rand::seq::IndexedRandom;

use super::{ChallengeIdea, Charade, ContentSource};
use crate::entities::missions::MissionOwner;

const CHARADES: &[(&str, &str)] = &[
    ("The Lion King", "🦁👑"),
    ("Finding Nemo", "🔍🐠"),
    ("Frozen", "❄️👸⛄"),
    ("Star Wars", "⭐⚔️🚀"),
    ("Toy Story", "🤠🚀🧸"),
    ("Harry Potter", "⚡👓🧙"),
    ("Jurassic Park", "🦖🌴🚙"),
    ("Spider-Man", "🕷️👨"),
    ("Cars", "🚗⚡🏁"),
    ("Up", "🎈🏠👴"),
    ("Raining cats and dogs", "🌧️🐱🐶"),
    ("Piece of cake", "🧩🍰"),
];

const MISSION_EMOJIS: &[&str] = &["🤪", "🦖", "🚀", "🎨", "🧩", "🎸", "🏃", "🌮", "🎭"];

const OWNERS: &[MissionOwner] = &[MissionOwner::Dad, MissionOwner::Son, MissionOwner::Shared];

/// Static content; always available.
#[derive(Debug, Default, Clone)]
pub struct FallbackCatalog;

impl FallbackCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn random_charade(&self) -> Charade {
        let (phrase, emojis) = CHARADES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(CHARADES[0]);
        Charade {
            phrase: phrase.to_string(),
            emojis: emojis.to_string(),
        }
    }

    pub fn random_owner(&self) -> MissionOwner {
        OWNERS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(MissionOwner::Shared)
    }

    pub fn random_emoji(&self) -> String {
        MISSION_EMOJIS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or("🎭")
            .to_string()
    }

    pub fn default_challenge(&self, owner: MissionOwner, emoji: String) -> ChallengeIdea {
        ChallengeIdea {
            title: "Dance Off!".to_string(),
            description: "Do your best robot dance for 30 seconds.".to_string(),
            duration: "30s".to_string(),
            xp: 50,
            owner,
            emoji,
        }
    }
}

#[async_trait]
impl ContentSource for FallbackCatalog {
    async fn charade(&self) -> Charade {
        self.random_charade()
    }

    async fn challenge(&self) -> ChallengeIdea {
        self.default_challenge(self.random_owner(), self.random_emoji())
    }
}
