//! Client configuration, loaded from TOML.
//!
//! ```toml
//! [database]
//! ticks_per_second = 60
//! first_id = 1
//!
//! [output]
//! form = "both"
//! ```

use std::fs;
use std::path::Path;

use annotdb_core::DatabaseConfig;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Which text forms to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputForm {
    /// Canonical form only.
    #[default]
    Canonical,
    /// Diagnostic form only.
    Diagnostic,
    /// Canonical, then diagnostic.
    Both,
}

/// `[output]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Forms to print unless overridden on the command line.
    pub form: OutputForm,
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Settings for the in-memory schema registry.
    pub database: DatabaseConfig,
    /// Output settings.
    pub output: OutputConfig,
}

impl ClientConfig {
    /// Parses and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid TOML for this layout or the
    /// database settings fail validation.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse client configuration")?;
        config
            .database
            .validate()
            .context("Invalid [database] settings")?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Self::from_toml`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config.database, DatabaseConfig::default());
        assert_eq!(config.output.form, OutputForm::Canonical);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = ClientConfig::from_toml(
            "[database]\nticks_per_second = 1000\n\n[output]\nform = \"both\"\n",
        )
        .unwrap();
        assert_eq!(config.database.ticks_per_second, 1000);
        assert_eq!(config.database.first_id, 1);
        assert_eq!(config.output.form, OutputForm::Both);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(ClientConfig::from_toml("[database]\nticks_per_second = 0\n").is_err());
        assert!(ClientConfig::from_toml("[database]\nfirst_id = 0\n").is_err());
        assert!(ClientConfig::from_toml("[database]\nbogus = 1\n").is_err());
    }
}
