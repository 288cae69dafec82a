//! Configuration loading for harvest services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`HARVEST__<SECTION>__<KEY>`)
//! 2. Config file (`harvest.toml`, or another prefix given on the command line)
//! 3. Defaults

use serde::de::DeserializeOwned;

use crate::error::HarvestError;

/// Default config file prefix.
pub const DEFAULT_FILE_PREFIX: &str = "harvest";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HARVEST";

/// Load one section of the configuration.
///
/// A missing section yields `T::default()`; a present but malformed section
/// is an error.
pub fn load_section<T>(file_prefix: &str, section: &str) -> Result<T, HarvestError>
where
    T: DeserializeOwned + Default,
{
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| HarvestError::Configuration(e.to_string()))?;

    match cfg.get::<T>(section) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => {
            tracing::debug!(section, "Config section absent, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(HarvestError::Configuration(format!("[{section}]: {e}"))),
    }
}
