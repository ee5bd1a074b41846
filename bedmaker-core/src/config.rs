use std::env;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{
    BIGBED_TO_BED, BIGBED_TO_BED_ENV, BIGWIG_TO_BEDGRAPH, BIGWIG_TO_BEDGRAPH_ENV, MACS2, MACS2_ENV,
};

/// Executables used for each conversion. Plain names are resolved through `PATH`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ToolPaths {
    pub macs2: String,
    pub bigwig_to_bedgraph: String,
    pub bigbed_to_bed: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        ToolPaths {
            macs2: MACS2.to_string(),
            bigwig_to_bedgraph: BIGWIG_TO_BEDGRAPH.to_string(),
            bigbed_to_bed: BIGBED_TO_BED.to_string(),
        }
    }
}

impl ToolPaths {
    /// Apply the `BEDMAKER_*` environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(macs2) = non_empty(MACS2_ENV) {
            self.macs2 = macs2;
        }
        if let Some(converter) = non_empty(BIGWIG_TO_BEDGRAPH_ENV) {
            self.bigwig_to_bedgraph = converter;
        }
        if let Some(converter) = non_empty(BIGBED_TO_BED_ENV) {
            self.bigbed_to_bed = converter;
        }
        self
    }
}

/// Contents of a bedmaker TOML config file.
///
/// ```toml
/// [tools]
/// macs2 = "/opt/macs2/bin/macs2"
/// bigwig_to_bedgraph = "bigWigToBedGraph"
/// ```
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct BedmakerConfig {
    #[serde(default)]
    pub tools: ToolPaths,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl TryFrom<&Path> for BedmakerConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> ConfigResult<Self> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
