use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants::{DEFAULT_MAX_SEARCH_SHARES, ENV_PREFIX, MAX_SEARCH_SHARES_CEILING};

/// Tunables of the recovery engine.
///
/// Loaded from an optional TOML file, then overridden by `SCHIAVINATO_*` environment
/// variables, e.g. `SCHIAVINATO_STRICT_VALIDATION=true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Run the BIP39 checksum on every recovered phrase.
    pub strict_validation: bool,
    /// Largest number of shares the consistency search will examine, at most
    /// [`MAX_SEARCH_SHARES_CEILING`].
    pub max_search_shares: usize,
}

impl Default for SharingConfig {
    fn default() -> Self {
        SharingConfig {
            strict_validation: false,
            max_search_shares: DEFAULT_MAX_SEARCH_SHARES,
        }
    }
}

impl SharingConfig {
    /// Loads the configuration from `path` (if it exists) and the environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let defaults = SharingConfig::default();

        let settings = Config::builder()
            .set_default("strict_validation", defaults.strict_validation)?
            .set_default("max_search_shares", defaults.max_search_shares as i64)?
            .add_source(File::from(path).required(false))
            // Eg.. `SCHIAVINATO_MAX_SEARCH_SHARES=12` sets the `max_search_shares` key
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config = SharingConfig::try_from(settings)?;
        debug!("📝 Loaded sharing config from {:?}: {:?}", path, config);
        Ok(config)
    }

    /// Loads the configuration from the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SharingConfig::default();
        let settings = Config::builder()
            .set_default("strict_validation", defaults.strict_validation)?
            .set_default("max_search_shares", defaults.max_search_shares as i64)?
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        SharingConfig::try_from(settings)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Foreign(Box::new(err)))
    }

    /// Writes the configuration as TOML to `path`, creating parent directories.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        }
        fs::write(path, self.to_toml()?).map_err(|err| ConfigError::Foreign(Box::new(err)))
    }
}

impl TryFrom<Config> for SharingConfig {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let max_search_shares = config.get_int("max_search_shares")?;
        let max_search_shares = usize::try_from(max_search_shares)
            .ok()
            .filter(|&limit| limit <= MAX_SEARCH_SHARES_CEILING)
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "max_search_shares must be between 0 and {MAX_SEARCH_SHARES_CEILING}, got {max_search_shares}"
                ))
            })?;

        Ok(SharingConfig {
            strict_validation: config.get_bool("strict_validation")?,
            max_search_shares,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("schiavinato-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = SharingConfig::load(temp_path("does-not-exist.toml")).unwrap();
        assert_eq!(config, SharingConfig::default());
    }

    #[test]
    fn test_write_then_load() {
        let path = temp_path("conf.toml");
        let config = SharingConfig {
            strict_validation: true,
            max_search_shares: 9,
        };
        config.write(&path).unwrap();

        let loaded = SharingConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_search_limit_above_ceiling_is_rejected() {
        let path = temp_path("too-wide.toml");
        SharingConfig {
            strict_validation: false,
            max_search_shares: 40,
        }
        .write(&path)
        .unwrap();

        let err = SharingConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("max_search_shares"));
        let _ = fs::remove_file(&path);

        let path = temp_path("at-ceiling.toml");
        let config = SharingConfig {
            strict_validation: false,
            max_search_shares: MAX_SEARCH_SHARES_CEILING,
        };
        config.write(&path).unwrap();
        assert_eq!(SharingConfig::load(&path).unwrap(), config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_to_toml_lists_both_keys() {
        let toml = SharingConfig::default().to_toml().unwrap();
        assert!(toml.contains("strict_validation = false"));
        assert!(toml.contains("max_search_shares = 16"));
    }
}
