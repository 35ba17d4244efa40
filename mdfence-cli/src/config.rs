//! The `mdfence.toml` configuration file.

use std::path::{Path, PathBuf};

use mdfence_markdown::ExtractOptions;
use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "mdfence.toml";

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists (or was asked for) but could not be read.
    #[error("Failed to read config file at {}: {source}", config_path.display())]
    Read {
        /// The file.
        config_path: PathBuf,
        /// Why reading failed.
        source: std::io::Error,
    },

    /// The file is not valid TOML, or has unknown keys.
    #[error("Failed to parse config file at {}: {source}", config_path.display())]
    Parse {
        /// The file.
        config_path: PathBuf,
        /// Why parsing failed.
        source: toml::de::Error,
    },
}

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The `[extract]` table.
    pub extract: ExtractOptions,
}

impl Config {
    /// Load the file at `config_path`.
    ///
    /// A missing file is only an error when `required`; otherwise the
    /// defaults are used.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its content is invalid.
    pub fn load_from_path(config_path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !config_path.exists() {
            log::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Invalid TOML, or keys this version does not know.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_extract_table() {
        let config = Config::parse(
            r#"
[extract]
languages = ["js", "html"]
directive_prefixes = ["eslint"]
"#,
        )
        .unwrap();
        assert_eq!(config.extract.languages, ["js", "html"]);
        assert_eq!(config.extract.directive_prefixes, ["eslint"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::parse("[extract]\nlangs = []\n").is_err());
        assert!(Config::parse("[other]\n").is_err());
    }

    #[test]
    fn test_missing_optional_file_is_default() {
        let path = Path::new("definitely/not/here/mdfence.toml");
        assert_eq!(Config::load_from_path(path, false).unwrap(), Config::default());
        assert!(matches!(
            Config::load_from_path(path, true),
            Err(ConfigError::Read { .. })
        ));
    }
}
