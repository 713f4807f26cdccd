//! Puzzle and challenge content. Generation never fails: any upstream
//! problem degrades to the static catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::missions::MissionOwner;

pub mod catalog;
pub mod llm;

pub use catalog::FallbackCatalog;
pub use llm::LlmContentSource;

/// An emoji charade: the phrase to guess and its emoji clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charade {
    pub phrase: String,
    pub emojis: String,
}

/// A suggested mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeIdea {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub xp: i32,
    pub owner: MissionOwner,
    pub emoji: String,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn charade(&self) -> Charade;
    async fn challenge(&self) -> ChallengeIdea;
}
