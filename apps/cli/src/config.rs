//! CLI configuration
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `ferrum-forms.toml` in the working directory, or the file given with `--config`
//! 3. `FERRUM_FORMS__SECTION__KEY` environment variables (after `.env` is loaded)

use std::path::Path;

use anyhow::Context;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use ferrum_form_datetime::time::{local_offset, parse_utc_offset};

/// Base name of the optional config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ferrum-forms";

const ENV_PREFIX: &str = "FERRUM_FORMS";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level for this CLI and the library; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Offset written into composed date-times: `local` or `±HH:MM`.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_utc_offset() -> String {
    "local".to_string()
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default()).context("Invalid defaults")?);

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
            None => {
                builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
            }
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            ));
        }

        let offset = self.input.utc_offset.trim();
        if !offset.eq_ignore_ascii_case("local") && parse_utc_offset(offset).is_none() {
            return Err(format!(
                "input.utc_offset must be 'local' or ±HH:MM, got '{}'",
                self.input.utc_offset
            ));
        }

        Ok(())
    }

    /// Offset applied when composing FHIR date-times.
    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        let offset = self.input.utc_offset.trim();
        if offset.eq_ignore_ascii_case("local") {
            return Ok(local_offset());
        }
        parse_utc_offset(offset)
            .with_context(|| format!("Invalid input.utc_offset '{}'", self.input.utc_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
        assert_eq!(config.input.utc_offset, "local");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".into();
        let err = config.validate().unwrap_err();
        assert!(err.contains("logging.level"));

        config.logging.level = "DEBUG".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn fixed_offsets() {
        let mut config = Config::default();
        config.input.utc_offset = "+10:00".into();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.utc_offset().unwrap(),
            FixedOffset::east_opt(10 * 3600).unwrap()
        );

        config.input.utc_offset = "Australia/Sydney".into();
        assert!(config.validate().is_err());
        assert!(config.utc_offset().is_err());
    }

    #[test]
    fn loads_file_over_defaults() {
        let path = write_config(
            "ferrum-forms-load",
            "[logging]\njson = true\n\n[input]\nutc_offset = \"-05:00\"\n",
        );
        let config = Config::load(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.input.utc_offset, "-05:00");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("ferrum-forms-does-not-exist.toml");
        assert!(Config::load(Some(path.as_path())).is_err());
    }
}
