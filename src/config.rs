use std::env;
use std::time::Duration;

use log::{debug, error, info};

use crate::error::{BotError, Result};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Model ids used when a user has no override of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefaults {
    pub text: String,
    pub image: String,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub gemini_api_key: String,
    pub gemini_api_base_url: String,
    pub models: ModelDefaults,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = required(&lookup, "GEMINI_API_KEY")?;
        let discord_token = required(&lookup, "DISCORD_TOKEN")?;

        let models = ModelDefaults {
            text: optional(&lookup, "GEMINI_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image: optional(&lookup, "GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        };

        let gemini_api_base_url = optional(&lookup, "GEMINI_API_BASE_URL")
            .map_or_else(
                || DEFAULT_API_BASE_URL.to_string(),
                |url| url.trim_end_matches('/').to_string(),
            );

        let request_timeout = match optional(&lookup, "GEMINI_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("Gemini API key length: {} characters", gemini_api_key.len());
        debug!("Gemini API base URL: {gemini_api_base_url}");
        debug!("Default text model: {}", models.text);
        debug!("Default image model: {}", models.image);
        debug!("Gemini request timeout: {}s", request_timeout.as_secs());

        Ok(Self {
            discord_token,
            gemini_api_key,
            gemini_api_base_url,
            models,
            request_timeout,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            error!("Failed to load {key} from environment");
            Err(BotError::MissingEnv(key))
        }
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(BotError::Config(format!(
            "GEMINI_TIMEOUT_SECS must be a positive number of seconds, got '{raw}'"
        ))),
    }
}
