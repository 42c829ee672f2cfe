use directories::ProjectDirs;
use std::path::Path;

use crate::error::{ChatError, ChatResult};

pub const FIRST_NAME_VAR: &str = "SECURECHAT_FIRST_NAME";
pub const SECOND_NAME_VAR: &str = "SECURECHAT_SECOND_NAME";
pub const LOG_FILTER_VAR: &str = "SECURECHAT_LOG";
pub const SHOW_RAW_VAR: &str = "SECURECHAT_SHOW_RAW";

const DEFAULT_FIRST_NAME: &str = "Alice";
const DEFAULT_SECOND_NAME: &str = "Bob";
const DEFAULT_LOG_FILTER: &str = "info";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub first_name: String,
    pub second_name: String,
    pub log_filter: String,
    /// Print each message's base64 ciphertext under it
    pub show_raw: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            first_name: DEFAULT_FIRST_NAME.to_string(),
            second_name: DEFAULT_SECOND_NAME.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            show_raw: false,
        }
    }
}

impl AppConfig {
    /// Create configuration for two named participants
    pub fn new(first_name: impl Into<String>, second_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            second_name: second_name.into(),
            ..Self::default()
        }
    }

    /// Load configuration from `.env` in the working directory, then the
    /// platform config directory, then the process environment.
    pub fn load() -> ChatResult<Self> {
        // Let dotenv load a .env from current dir first, then the platform-specific one
        dotenv::dotenv().ok();
        if let Some(proj_dirs) = ProjectDirs::from("org", "securechat", "securechat") {
            let env_path = proj_dirs.config_dir().join(".env");
            if env_path.exists() {
                let _ = dotenv::from_path(env_path);
            }
        }

        let config = Self::from_vars(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific env file without touching the
    /// process environment
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> ChatResult<Self> {
        #[allow(deprecated)]
        let entries = dotenv::from_path_iter(path.as_ref())
            .map_err(|e| ChatError::Config(format!("{}: {}", path.as_ref().display(), e)))?;

        let mut vars = Vec::new();
        for entry in entries {
            vars.push(entry.map_err(|e| ChatError::Config(e.to_string()))?);
        }

        let config = Self::from_vars(vars)?;
        config.validate()?;
        Ok(config)
    }

    fn from_vars<I: IntoIterator<Item = (String, String)>>(vars: I) -> ChatResult<Self> {
        let mut config = Self::default();
        for (key, value) in vars {
            match key.as_str() {
                FIRST_NAME_VAR => config.first_name = value,
                SECOND_NAME_VAR => config.second_name = value,
                LOG_FILTER_VAR => config.log_filter = value,
                SHOW_RAW_VAR => config.show_raw = parse_flag(SHOW_RAW_VAR, &value)?,
                _ => {}
            }
        }
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ChatResult<()> {
        let first = self.first_name.trim();
        let second = self.second_name.trim();

        if first.is_empty() || second.is_empty() {
            return Err(ChatError::Config("Participant names cannot be empty".to_string()));
        }
        if participant_key(first) == participant_key(second) {
            return Err(ChatError::Config(format!(
                "Participants need distinct names, both are {:?}",
                first
            )));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ChatError::Config("Log filter cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Identity derived from a display name; two names that map to the same key
/// cannot share a conversation
pub(crate) fn participant_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn parse_flag(var: &str, value: &str) -> ChatResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ChatError::Config(format!(
            "{} must be a boolean, got {:?}",
            var, other
        ))),
    }
}
