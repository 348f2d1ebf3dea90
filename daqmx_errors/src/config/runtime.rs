// RUNTIME PREFERENCES (User Experience)

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level an event needs to be emitted
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or_else(default_log_level),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePreferences {
    /// Whether formatted driver errors carry the registry description
    pub append_description: bool,
}

impl Default for MessagePreferences {
    fn default() -> Self {
        Self {
            append_description: env::var(env_vars::MESSAGE_APPEND_DESCRIPTION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

static MESSAGE_PREFERENCES: OnceLock<MessagePreferences> = OnceLock::new();

/// Install message preferences; only the first call wins
pub fn init_message_preferences(preferences: MessagePreferences) -> Result<(), String> {
    MESSAGE_PREFERENCES
        .set(preferences)
        .map_err(|_| "Message preferences already initialized".to_string())
}

/// Installed message preferences, or the environment-derived defaults
pub fn message_preferences() -> &'static MessagePreferences {
    MESSAGE_PREFERENCES.get_or_init(MessagePreferences::default)
}

/// Level used when no preference is set, taken from the build profile
fn default_log_level() -> LogLevel {
    LogLevel::from_u8(crate::config::compile_time::logging::DEFAULT_MIN_LOG_LEVEL)
}

/// Parse log level from string (used for environment variables)
pub(crate) fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub logging: LoggingPreferences,
    pub message: MessagePreferences,
}

impl RuntimeConfig {
    /// Install both preference sets; fails if either was already installed
    pub fn install(self) -> Result<(), String> {
        crate::logging::config::init_runtime_preferences(self.logging)?;
        init_message_preferences(self.message)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Logging
    pub const LOGGING_STRUCTURED: &str = "DAQMX_ERRORS_STRUCTURED_LOGGING";
    pub const LOGGING_CONSOLE: &str = "DAQMX_ERRORS_CONSOLE_LOGGING";
    pub const LOGGING_LEVEL: &str = "DAQMX_ERRORS_LOG_LEVEL";

    // Message formatting
    pub const MESSAGE_APPEND_DESCRIPTION: &str = "DAQMX_ERRORS_APPEND_DESCRIPTION";
}
