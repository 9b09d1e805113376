use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::screening::tech_questions::TOPIC_POOL;

const DEFAULT_LLM_TIMEOUT_SECS: u64 = 20;
const DEFAULT_TECH_QUESTION_COUNT: usize = 3;
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if the model credential or model identifier is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub tech_question_count: usize,
    pub enable_answer_scoring: bool,
    /// Idle time after which a session is dropped from memory.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
            .context("Failed to load configuration from environment")
    }

    /// Builds the config from an arbitrary key lookup so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let llm_timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "LLM_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value: raw,
                })?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let tech_question_count = match lookup("TECH_QUESTION_COUNT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=TOPIC_POOL.len()).contains(n))
                .ok_or(ConfigError::Invalid {
                    key: "TECH_QUESTION_COUNT",
                    expected: "a number between 1 and the topic pool size",
                    value: raw,
                })?,
            None => DEFAULT_TECH_QUESTION_COUNT,
        };

        let enable_answer_scoring = match lookup("ENABLE_ANSWER_SCORING") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                key: "ENABLE_ANSWER_SCORING",
                expected: "true or false",
                value: raw,
            })?,
            None => true,
        };

        let session_ttl_secs = match lookup("SESSION_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "SESSION_TTL_SECS",
                    expected: "a positive number of seconds",
                    value: raw,
                })?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                expected: "a valid port number",
                value: raw,
            })?,
            None => 8080,
        };

        Ok(Config {
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            llm_model: require("LLM_MODEL")?,
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            tech_question_count,
            enable_answer_scoring,
            session_ttl: Duration::from_secs(session_ttl_secs),
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
