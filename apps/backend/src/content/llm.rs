//! OpenAI-compatible chat-completions client for content generation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{ChallengeIdea, Charade, ContentSource, FallbackCatalog};
use crate::config::app::LlmConfig;
use crate::error::AppError;
use crate::logging::pii::Redacted;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const TEMPERATURE: f32 = 0.7;
pub const MIN_CHALLENGE_XP: i32 = 20;
pub const MAX_CHALLENGE_XP: i32 = 100;

const CHARADE_PROMPT: &str = r#"Pick a well-known family movie or everyday phrase and describe it with 2 to 4 emojis for a game of emoji charades.
Return ONLY a valid JSON object with no markdown formatting or backticks.
Structure:
{
  "phrase": "string",
  "emojis": "string"
}"#;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("empty completion")]
    Empty,
    #[error("unparseable completion: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CharadeReply {
    #[serde(alias = "title")]
    phrase: String,
    emojis: String,
}

#[derive(Deserialize)]
struct ChallengeReply {
    title: String,
    description: String,
    duration: String,
    xp: i64,
}

/// Models like to wrap JSON in Markdown fences even when told not to.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

fn parse_charade(text: &str) -> Result<Charade, LlmError> {
    let reply: CharadeReply = serde_json::from_str(strip_code_fences(text))?;
    let phrase = reply.phrase.trim();
    let emojis = reply.emojis.trim();
    if phrase.is_empty() || emojis.is_empty() {
        return Err(LlmError::Empty);
    }
    Ok(Charade {
        phrase: phrase.to_string(),
        emojis: emojis.to_string(),
    })
}

fn parse_challenge(text: &str) -> Result<ChallengeReply, LlmError> {
    let reply: ChallengeReply = serde_json::from_str(strip_code_fences(text))?;
    if reply.title.trim().is_empty() {
        return Err(LlmError::Empty);
    }
    Ok(reply)
}

fn clamp_xp(xp: i64) -> i32 {
    xp.clamp(i64::from(MIN_CHALLENGE_XP), i64::from(MAX_CHALLENGE_XP)) as i32
}

pub struct LlmContentSource {
    client: reqwest::Client,
    config: LlmConfig,
    fallback: FallbackCatalog,
}

impl LlmContentSource {
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build LLM HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            fallback: FallbackCatalog::new(),
        })
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LlmError::Status(response.status().as_u16()));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::Empty)
    }
}

#[async_trait]
impl ContentSource for LlmContentSource {
    async fn charade(&self) -> Charade {
        let result = match self.complete(CHARADE_PROMPT, 100).await {
            Ok(text) => parse_charade(&text),
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            warn!(error = %Redacted(&e.to_string()), "Charade generation failed; using catalog");
            self.fallback.random_charade()
        })
    }

    async fn challenge(&self) -> ChallengeIdea {
        let owner = self.fallback.random_owner();
        let emoji = self.fallback.random_emoji();
        let prompt = format!(
            "Suggest a \"Chaos Control\" challenge for a {owner:?} mission. It should be silly, quick (under 10 mins), and gamified.\n\
             Return ONLY a valid JSON object with no markdown formatting or backticks.\n\
             Structure:\n{{\n  \"title\": \"string\",\n  \"description\": \"string\",\n  \"duration\": \"string\",\n  \"xp\": number (between {MIN_CHALLENGE_XP} and {MAX_CHALLENGE_XP})\n}}"
        );

        let result = match self.complete(&prompt, 300).await {
            Ok(text) => parse_challenge(&text),
            Err(e) => Err(e),
        };
        match result {
            Ok(reply) => {
                debug!(title = %reply.title, "Challenge generated");
                ChallengeIdea {
                    title: reply.title.trim().to_string(),
                    description: reply.description.trim().to_string(),
                    duration: reply.duration.trim().to_string(),
                    xp: clamp_xp(reply.xp),
                    owner,
                    emoji,
                }
            }
            Err(e) => {
                warn!(error = %Redacted(&e.to_string()), "Challenge generation failed; using catalog");
                self.fallback.default_challenge(owner, emoji)
            }
        }
    }
}
