//! Configuration management for xcli.
//!
//! Configuration is read from `~/.config/xcli/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! API credentials may also come from the environment, which wins over the file.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::tui::feed::FeedKind;

/// Bounds the remote API accepts for `max_results`.
pub const MIN_LIMIT: u8 = 5;
pub const MAX_LIMIT: u8 = 100;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: CredentialsConfig,
    pub api: ApiConfig,
    pub limits: LimitConfig,
    /// Where the unread cursor lives; defaults to the data directory.
    pub state_file: Option<PathBuf>,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

/// OAuth 1.0a user-context credentials as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
}

/// Fully resolved credentials, every field present.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub upload_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.x.com".to_string(),
            upload_url: "https://upload.twitter.com".to_string(),
            timeout_secs: 20,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Default page sizes per command, used when `--limit` is not given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    pub mentions: u8,
    pub interact: u8,
    pub thread: u8,
    pub timeline: u8,
    pub engagement: u8,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            mentions: 20,
            interact: 5,
            thread: 10,
            timeline: 20,
            engagement: 10,
        }
    }
}

impl LimitConfig {
    /// Page size for a list opened in the interactive UI.
    pub fn for_kind(&self, kind: FeedKind) -> u8 {
        match kind {
            FeedKind::Mentions => self.interact,
            FeedKind::Thread => self.thread,
            FeedKind::Timeline => self.timeline,
        }
    }
}

/// Environment variables that override `[credentials]`.
const ENV_API_KEY: &str = "X_API_KEY";
const ENV_API_SECRET: &str = "X_API_SECRET";
const ENV_ACCESS_TOKEN: &str = "X_ACCESS_TOKEN";
const ENV_ACCESS_TOKEN_SECRET: &str = "X_ACCESS_TOKEN_SECRET";

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/xcli/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("xcli").join("config.toml"))
    }

    /// Checks values serde cannot: URL syntax and limit ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.upload_url", &self.api.upload_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::Invalid {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
        }

        let limits = &self.limits;
        for (field, value) in [
            ("limits.mentions", limits.mentions),
            ("limits.interact", limits.interact),
            ("limits.thread", limits.thread),
            ("limits.timeline", limits.timeline),
            ("limits.engagement", limits.engagement),
        ] {
            if !(MIN_LIMIT..=MAX_LIMIT).contains(&value) {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    reason: format!("{} is outside {}..={}", value, MIN_LIMIT, MAX_LIMIT),
                });
            }
        }

        Ok(())
    }

    /// Resolve credentials from the environment, falling back to the file.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with<F>(&self, env: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |var: &'static str, file_value: &Option<String>| {
            env(var)
                .or_else(|| file_value.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential(var))
        };

        let file = &self.credentials;
        Ok(Credentials {
            api_key: pick(ENV_API_KEY, &file.api_key)?,
            api_secret: pick(ENV_API_SECRET, &file.api_secret)?,
            access_token: pick(ENV_ACCESS_TOKEN, &file.access_token)?,
            access_token_secret: pick(ENV_ACCESS_TOKEN_SECRET, &file.access_token_secret)?,
        })
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# xcli configuration
#
# Credentials can also be supplied through X_API_KEY, X_API_SECRET,
# X_ACCESS_TOKEN and X_ACCESS_TOKEN_SECRET, which take precedence.

[credentials]
# api_key = ""
# api_secret = ""
# access_token = ""
# access_token_secret = ""

[api]
base_url = "https://api.x.com"
upload_url = "https://upload.twitter.com"
timeout_secs = 20

# Default --limit per command (5-100)
[limits]
mentions = 20
interact = 5
thread = 10
timeline = 20
engagement = 10

# Unread cursor location (defaults to the user data directory)
# state_file = "/home/me/.local/share/xcli/state.json"

[colors]
# Named colors (Cyan, DarkGray, LightRed, ...) or hex ("#RRGGBB", "#RGB")
border = "Cyan"
selection_bg = "Cyan"
selection_fg = "Black"
read_item = "Gray"
unread_item = "White"
author = "Yellow"
timestamp = "DarkGray"
metrics = "Green"
status_fg = "White"
status_bg = "DarkGray"
error_fg = "LightRed"

[keybindings]
# Single characters, special keys (Enter, Esc, PageUp, ...) and modifiers
# ("Ctrl+c", "Shift+Tab"). While composing, plain characters always type.
quit = ["q", "Ctrl+c"]
back = ["Esc"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
select = ["Enter"]
mark_read = ["m"]
open_in_browser = ["o"]
attach_image = ["Ctrl+v"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Missing credential: set {0} or add it to [credentials] in the config file")]
    MissingCredential(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_credentials() -> CredentialsConfig {
        CredentialsConfig {
            api_key: Some("file-key".into()),
            api_secret: Some("file-secret".into()),
            access_token: Some("file-token".into()),
            access_token_secret: Some("file-token-secret".into()),
        }
    }

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.colors.border, ratatui::style::Color::Cyan);
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
        assert_eq!(config.limits.interact, 5);
        assert_eq!(config.api.base_url, "https://api.x.com");
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.limits.mentions, 20);
        assert!(config.state_file.is_none());
        assert!(config.credentials.api_key.is_none());
    }

    #[test]
    fn test_limit_out_of_range_is_invalid() {
        let config: Config = toml::from_str("[limits]\ntimeline = 150\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "limits.timeline"));
    }

    #[test]
    fn test_limit_for_kind() {
        let limits = LimitConfig::default();
        assert_eq!(limits.for_kind(FeedKind::Mentions), 5);
        assert_eq!(limits.for_kind(FeedKind::Thread), 10);
        assert_eq!(limits.for_kind(FeedKind::Timeline), 20);
    }

    #[test]
    fn test_bad_base_url_is_invalid() {
        let config: Config = toml::from_str("[api]\nbase_url = \"not a url\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_credentials_from_file() {
        let config = Config {
            credentials: full_credentials(),
            ..Default::default()
        };
        let creds = config.credentials_with(|_| None).unwrap();
        assert_eq!(creds.api_key, "file-key");
        assert_eq!(creds.access_token_secret, "file-token-secret");
    }

    #[test]
    fn test_environment_overrides_file() {
        let config = Config {
            credentials: full_credentials(),
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [("X_API_KEY", "env-key")].into_iter().collect();
        let creds = config
            .credentials_with(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(creds.api_key, "env-key");
        assert_eq!(creds.api_secret, "file-secret");
    }

    #[test]
    fn test_missing_credential_names_the_variable() {
        let mut credentials = full_credentials();
        credentials.access_token = Some("   ".into());
        let config = Config {
            credentials,
            ..Default::default()
        };
        let err = config.credentials_with(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential("X_ACCESS_TOKEN")));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            credentials: full_credentials(),
            ..Default::default()
        };
        let creds = config.credentials_with(|_| None).unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("file-secret"));
        assert!(!debug.contains("file-token-secret"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("xcli").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.limits.thread, 10);
    }
}
