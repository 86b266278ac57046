//! Pipeline configuration loading and validation.

use crate::error::{DspError, DspResult};
use crate::irf::IrfConfig;
use crate::realization::RealizationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for a full post-processing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Frequency-to-time transform settings.
    #[serde(default)]
    pub irf: IrfConfig,

    /// State-space realization settings.
    #[serde(default)]
    pub realization: RealizationConfig,

    /// Fit state-space models after computing kernels.
    #[serde(default = "default_true")]
    pub realize: bool,

    /// Process DOF pairs on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            irf: IrfConfig::default(),
            realization: RealizationConfig::default(),
            realize: true,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> DspResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| DspError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DspResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded pipeline configuration");
        Self::from_json(&content)
    }

    /// Fail-fast checks of every scalar parameter.
    pub fn validate(&self) -> DspResult<()> {
        self.irf.validate()?;
        if self.realize {
            self.realization.validate()?;
            let max_order = self.realization.max_order;
            if self.irf.num_time_points < 2 * max_order {
                return Err(DspError::InvalidParameter(format!(
                    "{} time points cannot support a realization of order {}",
                    self.irf.num_time_points, max_order
                )));
            }
        }
        Ok(())
    }
}
