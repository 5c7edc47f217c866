//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any command
//! runs. Values may also come from a `.env` file loaded by `main.rs`.
//!
//! ## Optional Variables
//!
//! - `NANOLINK_LINKS_DIR` - Directory holding one record per link (default: `./links`)
//! - `RUST_LOG` - Log filter (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `SHUTDOWN_TIMEOUT_SECS` - Grace period for in-flight requests on shutdown (default: 10)
//! - `ID_LENGTH` - Length of generated link ids (default: 8)
//!
//! Listener settings (host, port, TLS) are command-line flags and are
//! validated by [`crate::domain::redirect::RedirectOptions`].

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub links_dir: PathBuf,
    pub log_level: String,
    pub log_format: String,
    pub shutdown_timeout_secs: u64,
    pub id_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            links_dir: PathBuf::from("./links"),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            shutdown_timeout_secs: 10,
            id_length: 8,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let links_dir = env::var("NANOLINK_LINKS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.links_dir);
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        let shutdown_timeout_secs = parse_var("SHUTDOWN_TIMEOUT_SECS")?
            .unwrap_or(defaults.shutdown_timeout_secs);
        let id_length = parse_var("ID_LENGTH")?.unwrap_or(defaults.id_length);

        Ok(Self {
            links_dir,
            log_level,
            log_format,
            shutdown_timeout_secs,
            id_length,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `links_dir` is empty
    /// - `log_format` is not `text` or `json`
    /// - `shutdown_timeout_secs` is outside 1-3600
    /// - `id_length` is outside 1-64
    pub fn validate(&self) -> Result<()> {
        if self.links_dir.as_os_str().is_empty() {
            anyhow::bail!("NANOLINK_LINKS_DIR must not be empty");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.shutdown_timeout_secs == 0 || self.shutdown_timeout_secs > 3600 {
            anyhow::bail!(
                "SHUTDOWN_TIMEOUT_SECS must be between 1 and 3600, got {}",
                self.shutdown_timeout_secs
            );
        }

        if self.id_length == 0 || self.id_length > 64 {
            anyhow::bail!("ID_LENGTH must be between 1 and 64, got {}", self.id_length);
        }

        Ok(())
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Logs configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Links directory: {}", self.links_dir.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Shutdown timeout: {}s", self.shutdown_timeout_secs);
        tracing::info!("  Generated id length: {}", self.id_length);
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(None),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
