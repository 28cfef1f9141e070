use core::fmt::{Debug, Display};
use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "fca.toml";
pub const ENV_PREFIX: &str = "FCA_";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding the volunteers and crews to allocate.
    pub roster_path: PathBuf,
    /// Where the allocated roster is written. Standard output if unset.
    pub output_path: Option<PathBuf>,
    /// Default `tracing` filter directive, `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster_path: PathBuf::from("roster.json"),
            output_path: None,
            log_filter: "info".to_owned(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

#[must_use]
pub fn config_figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(config_figment().extract()?)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use figment::Jail;

    use super::{get_config, Config};

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = get_config().map_err(|err| err.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "fca.toml",
                r#"
                    roster_path = "festival.json"
                    output_path = "allocated.json"
                    log_filter = "debug"
                "#,
            )?;
            jail.set_env("FCA_LOG_FILTER", "trace");

            let config = get_config().map_err(|err| err.to_string())?;
            assert_eq!(config.roster_path, PathBuf::from("festival.json"));
            assert_eq!(config.output_path, Some(PathBuf::from("allocated.json")));
            assert_eq!(config.log_filter, "trace");
            Ok(())
        });
    }

    #[test]
    fn malformed_file_is_reported() {
        Jail::expect_with(|jail| {
            jail.create_file("fca.toml", "roster_path = [1, 2]")?;
            assert!(get_config().is_err());
            Ok(())
        });
    }
}
