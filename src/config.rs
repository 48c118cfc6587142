use config::{Config, ConfigError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::sss::{MAX_SHARES, MIN_THRESHOLD};

pub const CONFIG_FILE: &str = "conf.toml";

/// Environment variables with this prefix override the file, e.g. `SSS_SHARES=7`.
pub const ENV_PREFIX: &str = "SSS";

pub const DEFAULT_SHARES: usize = 5;
pub const DEFAULT_THRESHOLD: usize = 3;

/// Split parameters used when the command line leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SssConfig {
    pub shares: usize,
    pub threshold: usize,
}

impl Default for SssConfig {
    fn default() -> Self {
        SssConfig {
            shares: DEFAULT_SHARES,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SssConfig {
    /// Loads `<dir>/conf.toml`, writing one with the defaults first if it
    /// does not exist, then applies `SSS_*` environment overrides.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        SssConfig::load_with_prefix(dir, ENV_PREFIX)
    }

    /// Like [`SssConfig::load`], reading overrides from `<prefix>_*` variables.
    pub fn load_with_prefix(dir: impl AsRef<Path>, prefix: &str) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        }

        let conf_file = dir.join(CONFIG_FILE);
        if !conf_file.exists() {
            let toml = toml::to_string_pretty(&SssConfig::default())
                .map_err(|err| ConfigError::Foreign(Box::new(err)))?;
            fs::write(&conf_file, toml).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        }

        debug!("📝 Loaded config at path: {:?}", conf_file);
        let settings = Config::builder()
            .add_source(config::File::from(conf_file.as_path()))
            .add_source(config::Environment::with_prefix(prefix))
            .build()?;

        let my_config: SssConfig = settings.try_into()?;
        my_config.validate()?;
        Ok(my_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_THRESHOLD..=MAX_SHARES).contains(&self.shares) {
            return Err(ConfigError::Message(format!(
                "shares must be between {} and {}, got {}",
                MIN_THRESHOLD, MAX_SHARES, self.shares
            )));
        }
        if self.threshold < MIN_THRESHOLD || self.threshold > self.shares {
            return Err(ConfigError::Message(format!(
                "threshold must be between {} and {}, got {}",
                MIN_THRESHOLD, self.shares, self.threshold
            )));
        }
        Ok(())
    }
}

impl TryFrom<Config> for SssConfig {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let count = |key: &str| -> Result<usize, ConfigError> {
            let value = config.get_int(key)?;
            usize::try_from(value)
                .map_err(|_| ConfigError::Message(format!("{key} must not be negative")))
        };
        Ok(SssConfig {
            shares: count("shares")?,
            threshold: count("threshold")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sss-config-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_creates_default_file_and_env_overrides() {
        let dir = scratch_dir("defaults");
        let config = SssConfig::load_with_prefix(&dir, "SSSTESTDEFAULTS").unwrap();
        assert_eq!(config, SssConfig::default());
        assert!(dir.join(CONFIG_FILE).exists());

        // a prefix no other test reads, so parallel loads are unaffected
        std::env::set_var("SSSTESTOVERRIDE_SHARES", "9");
        let config = SssConfig::load_with_prefix(&dir, "SSSTESTOVERRIDE");
        std::env::remove_var("SSSTESTOVERRIDE_SHARES");
        assert_eq!(config.unwrap(), SssConfig { shares: 9, threshold: DEFAULT_THRESHOLD });

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reads_existing_file() {
        let dir = scratch_dir("existing");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "shares = 10\nthreshold = 4\n").unwrap();
        let config = SssConfig::load_with_prefix(&dir, "SSSTESTEXISTING").unwrap();
        assert_eq!(config, SssConfig { shares: 10, threshold: 4 });
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_invalid_threshold() {
        let dir = scratch_dir("invalid");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "shares = 4\nthreshold = 1\n").unwrap();
        assert!(SssConfig::load_with_prefix(&dir, "SSSTESTINVALID").is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_validate() {
        assert!(SssConfig { shares: 2, threshold: 2 }.validate().is_ok());
        assert!(SssConfig { shares: 256, threshold: 2 }.validate().is_err());
        assert!(SssConfig { shares: 3, threshold: 4 }.validate().is_err());
    }
}
