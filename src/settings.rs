//! Settings for applications embedding the conversion engine.
//!
//! Values come from an optional settings file (any format the `config` crate
//! recognizes by extension, typically `valtype.toml`) and may be overridden by
//! `VALTYPE_*` environment variables, e.g. `VALTYPE_LOG_FILTER=valtype=debug`.

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::{ValtypeError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// An `EnvFilter` directive, rejected conversions are logged at debug.
    pub log_filter: String,
    pub log_target: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: String::from("warn"),
            log_target: false,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Settings> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix("VALTYPE"))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}

/// Installs the global fmt subscriber. Fails if the filter does not parse or a
/// subscriber is already installed.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_new(&settings.log_filter).map_err(|e| ValtypeError::Settings(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.log_target)
        .try_init()
        .map_err(|e| ValtypeError::Settings(e.to_string()))
}
