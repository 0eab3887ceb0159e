//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub redis: RedisConfig,
    pub chat: ChatConfig,
    pub stats: StatsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Chat server connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the REST API (without the `/api/v1` suffix)
    pub api_url: String,
    /// WebSocket gateway URL
    pub gateway_url: String,
    /// Bearer token of the bot account
    pub token: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl ChatConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

/// Stats bot behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Messages per channel scanned by `calc-stats` when no limit is given
    #[serde(default = "default_calc_message_limit")]
    pub calc_message_limit: usize,
    /// Entries per reply block for chunked reports
    #[serde(default = "default_response_size")]
    pub response_size: usize,
    /// Count messages as they arrive on the gateway
    #[serde(default = "default_live_counting")]
    pub live_counting: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            admin_role: default_admin_role(),
            calc_message_limit: default_calc_message_limit(),
            response_size: default_response_size(),
            live_counting: default_live_counting(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-stats".to_string()
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

fn default_command_prefix() -> String {
    "~".to_string()
}

fn default_admin_role() -> String {
    "Bot Admin".to_string()
}

fn default_calc_message_limit() -> usize {
    1000
}

fn default_response_size() -> usize {
    50
}

fn default_live_counting() -> bool {
    true
}

/// Read a required variable
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Read an optional variable, rejecting values that do not parse
fn optional<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// an optional one holds an unparsable value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env = match env::var("APP_ENV") {
            Ok(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            Err(_) => Environment::default(),
        };

        let stats_defaults = StatsConfig::default();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env,
            },
            redis: RedisConfig {
                url: required("REDIS_URL")?,
                max_connections: optional("REDIS_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_redis_max_connections),
            },
            chat: ChatConfig {
                api_url: required("CHAT_API_URL")?,
                gateway_url: required("CHAT_GATEWAY_URL")?,
                token: required("CHAT_BOT_TOKEN")?,
                request_timeout_secs: optional("CHAT_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout_secs),
                reconnect_delay_secs: optional("STATS_RECONNECT_DELAY_SECS")?
                    .unwrap_or_else(default_reconnect_delay_secs),
            },
            stats: StatsConfig {
                command_prefix: env::var("STATS_COMMAND_PREFIX")
                    .unwrap_or(stats_defaults.command_prefix),
                admin_role: env::var("STATS_ADMIN_ROLE").unwrap_or(stats_defaults.admin_role),
                calc_message_limit: optional("STATS_CALC_MESSAGE_LIMIT")?
                    .unwrap_or(stats_defaults.calc_message_limit),
                response_size: optional("STATS_RESPONSE_SIZE")?
                    .unwrap_or(stats_defaults.response_size),
                live_counting: optional("STATS_LIVE_COUNTING")?
                    .unwrap_or(stats_defaults.live_counting),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
