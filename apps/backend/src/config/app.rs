use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::progression::CORRECT_GUESS_REWARD_XP;
use crate::error::AppError;

pub const DEFAULT_SESSION_IDLE_DAYS: u64 = 30;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";

/// Outbound LLM endpoint settings. Absent key means "always use the fallback catalog".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Runtime settings read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub reward_xp: i64,
    pub session_idle: Duration,
    pub sweep_interval: Duration,
    pub llm: Option<LlmConfig>,
    pub dev_tokens: bool,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            reward_xp: CORRECT_GUESS_REWARD_XP,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_DAYS * 86_400),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            llm: None,
            dev_tokens: false,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| {
                AppError::config(format!(
                    "Environment variable '{name}' is not valid: '{raw}'"
                ))
            }),
        _ => Ok(None),
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let reward_xp = parse_var::<i64>("KINQUEST_REWARD_XP")?.unwrap_or(defaults.reward_xp);
        if reward_xp <= 0 {
            return Err(AppError::config("KINQUEST_REWARD_XP must be positive"));
        }

        let session_idle = parse_var::<u64>("KINQUEST_SESSION_IDLE_DAYS")?
            .map(|days| Duration::from_secs(days * 86_400))
            .unwrap_or(defaults.session_idle);
        let sweep_interval = parse_var::<u64>("KINQUEST_SWEEP_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.sweep_interval);

        let llm = env::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|api_key| LlmConfig {
                api_key,
                base_url: env::var("LLM_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            });

        let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Ok(Self {
            host: env::var("BACKEND_HOST").unwrap_or(defaults.host),
            port: parse_var::<u16>("BACKEND_PORT")?.unwrap_or(defaults.port),
            reward_xp,
            session_idle,
            sweep_interval,
            llm,
            dev_tokens: flag("KINQUEST_DEV_TOKENS"),
            cors_origins,
        })
    }
}
