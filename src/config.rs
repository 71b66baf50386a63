//! Runtime configuration from environment variables (and `.env`)

use crate::error::AssistantError;
use crate::Result;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub database_url: Option<String>,
    pub port: u16,
    /// Overrides the generic budget ceiling for unlisted categories
    pub budget_default_limit: Option<Decimal>,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = GeminiConfig::default();

        let gemini = GeminiConfig {
            api_key: non_empty("GEMINI_API_KEY").unwrap_or_default(),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: match non_empty("GEMINI_TIMEOUT_SECS") {
                Some(raw) => parse_value("GEMINI_TIMEOUT_SECS", &raw)?,
                None => defaults.timeout_secs,
            },
        };

        let database_url = non_empty("DATABASE_URL").or_else(|| non_empty("POSTGRES_URL"));

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => parse_value("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let budget_default_limit = non_empty("BUDGET_DEFAULT_LIMIT")
            .map(|raw| parse_value::<Decimal>("BUDGET_DEFAULT_LIMIT", &raw))
            .transpose()?;

        Ok(Self {
            gemini,
            database_url,
            port,
            budget_default_limit,
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AssistantError::Config(format!("{} has invalid value {:?}: {}", key, raw, e)))
}
