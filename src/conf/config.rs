use std::path::Path;

use config::Config as CConfig;
use serde::{Deserialize, Serialize};

use crate::conf::{CombineConfig, ServerConfig};
use crate::core::MergeError::{self, ConfigParsingError};

const ENV_PREFIX: &str = "CSVMERGE";

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub combine: CombineConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, MergeError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }

    /// Loads an optional TOML file, then applies `CSVMERGE__SECTION__KEY`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Config, MergeError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))
    }
}
