use log::debug;
use serde::Deserialize;
use std::{fs, path::Path};
use tokio::sync::Semaphore;

use crate::error::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub config: ConfigOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigOptions {
    /// Per-probe deadline. `0` leaves probes bounded only by the HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on concurrent probes. Unset or `0` means one task per site, all at once.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_in_flight: None,
        }
    }
}

impl Config {
    /// Loads `config.toml` if it exists, then applies environment overrides.
    ///
    /// A missing file is not an error; the defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// option is out of range.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            debug!("Reading configuration from {}", path.display());
            Self::from_toml(&fs::read_to_string(path)?)?
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Config::default()
        };

        // dotenvy::var also picks up a .env file in the working directory
        config.apply_overrides(|key| dotenvy::var(key).ok())?;

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error on malformed TOML or out-of-range options.
    pub fn from_toml(content: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(content)?;
        config.config.validate()?;
        Ok(config)
    }

    /// Overrides options from `CHECKER_TIMEOUT_SECS` and `CHECKER_MAX_IN_FLIGHT`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a present variable does not parse or is out of range.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CHECKER_TIMEOUT_SECS") {
            self.config.timeout_secs = value.trim().parse().map_err(|e| {
                Error::Config(format!("CHECKER_TIMEOUT_SECS={value:?} is invalid: {e}"))
            })?;
        }

        if let Some(value) = lookup("CHECKER_MAX_IN_FLIGHT") {
            let max: usize = value.trim().parse().map_err(|e| {
                Error::Config(format!("CHECKER_MAX_IN_FLIGHT={value:?} is invalid: {e}"))
            })?;
            self.config.max_in_flight = Some(max);
        }

        self.config.validate()
    }
}

impl ConfigOptions {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `max_in_flight` exceeds what a semaphore can hold.
    pub fn validate(&self) -> Result<(), Error> {
        match self.max_in_flight {
            Some(max) if max > Semaphore::MAX_PERMITS => Err(Error::Config(format!(
                "max_in_flight = {max} is above the limit of {}",
                Semaphore::MAX_PERMITS
            ))),
            _ => Ok(()),
        }
    }
}
