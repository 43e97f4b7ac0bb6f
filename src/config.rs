//! Static configuration
//!
//! Loaded once at startup from an optional TOML file, then overlaid with
//! environment variables, validated, and only read afterwards.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::generation::{Defaults, GenerationError, NetworkKind, Pipeline};
use crate::render::RenderMethod;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Error parsing TOML: {0}")]
    TomlParsingError(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid default: {0}")]
    InvalidDefault(#[from] GenerationError),
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidEnv {
        name: String,
        value: String,
        reason: String,
    },
}

/// Directory generated files go to when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where exporters write their files
    pub output_dir: PathBuf,
    /// Renderer used when the command line does not pick one
    pub render: RenderMethod,
    /// Kind applied to descriptions that do not name one
    pub default_kind: Option<NetworkKind>,
    /// Attribute fallbacks for the reconciler
    pub defaults: Defaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            render: RenderMethod::default(),
            default_kind: None,
            defaults: Defaults::default(),
        }
    }
}

impl Settings {
    pub fn load(data: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(data)?)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load(&std::fs::read_to_string(path)?)
    }

    /// Settings from `path` (or built-in defaults) overlaid with the process environment
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };
        let settings = settings.with_env(|name| std::env::var(name).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies environment overrides read through `lookup`
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup("DEFAULT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("DEFAULT_VIZ_METHOD") {
            self.render = RenderMethod::from_str(&value, true)
                .map_err(|reason| invalid_env("DEFAULT_VIZ_METHOD", &value, reason))?;
        }
        if let Some(value) = lookup("DEFAULT_NETWORK_KIND") {
            self.default_kind = Some(
                value
                    .parse()
                    .map_err(|reason| invalid_env("DEFAULT_NETWORK_KIND", &value, reason))?,
            );
        }
        if let Some(value) = lookup("DEFAULT_LANES") {
            self.defaults.lanes = parse_env("DEFAULT_LANES", &value)?;
        }
        if let Some(value) = lookup("DEFAULT_LENGTH") {
            self.defaults.length = parse_env("DEFAULT_LENGTH", &value)?;
        }
        if let Some(value) = lookup("DEFAULT_SPEED") {
            self.defaults.speed = parse_env("DEFAULT_SPEED", &value)?;
        }
        Ok(self)
    }

    /// Checks the defaults with the same rules as description values
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(self.defaults.validate()?)
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.defaults).with_fallback_kind(self.default_kind)
    }
}

fn invalid_env(name: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|err: T::Err| invalid_env(name, value, err))
}
