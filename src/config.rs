use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clustering::{
    ClusteredJets, JetDefinition, ParticleSelection, SelectionKind,
};
use crate::matching::{ClosestJets, Consensus, DEFAULT_MAX_DISTANCE, MAX_JETS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for `{0}`: {1}")]
    Invalid(&'static str, String),
}

/// Analysis settings
///
/// Every setting has a default, so an empty configuration file is valid.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum angular distance between matched jets
    pub max_distance: f64,
    pub consensus: Consensus,
    /// Number of leading jets with their own histograms
    pub histogram_slots: usize,
    /// Ignore the event weights in the input
    pub use_external_weight_only: bool,
    pub external_weight: f64,
    pub generated: ClusteredJets,
    pub reconstructed: ClusteredJets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            consensus: Consensus::default(),
            histogram_slots: 10,
            use_external_weight_only: false,
            external_weight: 1.,
            generated: ClusteredJets::default(),
            reconstructed: ClusteredJets {
                jet_def: JetDefinition::default(),
                selection: ParticleSelection {
                    kind: SelectionKind::Visible,
                    min_pt: 0.15,
                    max_abs_eta: Some(0.9),
                },
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_owned(),
                source,
            })?;
        content.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        use ConfigError::Invalid;
        if !(self.max_distance > 0.) {
            return Err(Invalid(
                "max_distance",
                format!("{} is not positive", self.max_distance),
            ));
        }
        if self.histogram_slots > MAX_JETS {
            return Err(Invalid(
                "histogram_slots",
                format!(
                    "{} exceeds the maximum number of jets {MAX_JETS}",
                    self.histogram_slots
                ),
            ));
        }
        if !self.external_weight.is_finite() {
            return Err(Invalid(
                "external_weight",
                self.external_weight.to_string(),
            ));
        }
        for (name, source) in [
            ("generated.jet_def.radius", &self.generated),
            ("reconstructed.jet_def.radius", &self.reconstructed),
        ] {
            if !(source.jet_def.radius > 0.) {
                return Err(Invalid(
                    name,
                    format!("{} is not positive", source.jet_def.radius),
                ));
            }
        }
        Ok(())
    }

    pub fn matcher(&self) -> ClosestJets {
        ClosestJets::new(self.max_distance).with_consensus(self.consensus)
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
