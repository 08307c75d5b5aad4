use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Job-board server the client talks to for language validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the job-board server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the inclusive-language validation endpoint.
    /// Older server revisions expose it under /company/ instead.
    #[serde(default = "default_validate_language_path")]
    pub validate_language_path: String,

    /// Anti-forgery token sent with every validation request,
    /// the equivalent of the hidden csrfmiddlewaretoken form field.
    #[serde(default)]
    pub csrf_token: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_validate_language_path() -> String {
    "/companies/validate-language/".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            validate_language_path: default_validate_language_path(),
            csrf_token: String::new(),
        }
    }
}

impl ServerConfig {
    /// Full URL of the validate-language endpoint
    pub fn validate_language_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.validate_language_path
        )
    }
}

/// Repository whose contributors are shown on the contributors screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_repo_owner")]
    pub owner: String,
    #[serde(default = "default_repo_name")]
    pub repo: String,
}

fn default_repo_owner() -> String {
    "Tossy06".to_string()
}

fn default_repo_name() -> String {
    "Bolsa-De-Empleo".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: default_repo_owner(),
            repo: default_repo_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event-loop tick interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Delay before focusing the first field after a step change (default: 300)
    #[serde(default = "default_focus_settle")]
    pub focus_settle_ms: u64,
}

fn default_tick_rate() -> u64 {
    50
}

fn default_focus_settle() -> u64 {
    300
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            focus_settle_ms: default_focus_settle(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Quiescence window before a language check fires (default: 500)
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

fn default_debounce() -> u64 {
    500
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for logs and saved drafts
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".bolsa".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the client works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // User config in ~/.config/bolsa/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("bolsa").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with BOLSA_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("BOLSA")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to ~/.config/bolsa/config.toml
    pub fn save(&self) -> Result<PathBuf> {
        let Some(config_dir) = dirs::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&config_dir.join("bolsa"))
    }

    /// Write the effective config as TOML to `dir/config.toml`
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).context("Failed to create config directory")?;

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        let path = dir.join("config.toml");
        std::fs::write(&path, toml).context("Failed to write config file")?;
        Ok(path)
    }

    /// Directory for saved submission drafts
    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.state)
    }

    /// Directory where log files are written
    pub fn logs_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.state).join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.validation.debounce_ms, 500);
        assert_eq!(config.ui.focus_settle_ms, 300);
        assert_eq!(config.github.owner, "Tossy06");
        assert!(config.logging.to_file);
    }

    #[test]
    fn test_validate_language_url() {
        let mut server = ServerConfig::default();
        server.base_url = "https://jobs.example.org/".to_string();
        assert_eq!(
            server.validate_language_url(),
            "https://jobs.example.org/companies/validate-language/"
        );

        // older page revision
        server.validate_language_path = "/company/validate-language/".to_string();
        assert_eq!(
            server.validate_language_url(),
            "https://jobs.example.org/company/validate-language/"
        );
    }

    #[test]
    fn test_logs_path() {
        let config = Config::default();
        assert!(config.logs_path().ends_with("logs"));
    }

    #[test]
    fn test_save_to_round_trips() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.server.csrf_token = "tok-123".to_string();
        config.server.base_url = "https://jobs.example.org".to_string();

        let path = config.save_to(temp_dir.path()).unwrap();
        assert!(path.ends_with("config.toml"));

        let text = std::fs::read_to_string(path).unwrap();
        let reloaded: Config = toml::from_str(&text).unwrap();
        assert_eq!(reloaded.server.csrf_token, "tok-123");
        assert_eq!(reloaded.server.base_url, "https://jobs.example.org");
        assert_eq!(reloaded.github.owner, "Tossy06");
    }
}
