use crate::error::{Result, SignalError};
use crate::light::similarity::{ReferencePoint, SimilarityWeights};
use crate::signal::Policy;
use crate::DEFAULT_CLUSTER_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Read-only settings of the decision core, shared by every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub weights: SimilarityWeights,
    pub cluster_threshold: f64,
    pub reference_point: ReferencePoint,
    pub policy: Policy,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            weights: SimilarityWeights::default(),
            cluster_threshold: DEFAULT_CLUSTER_THRESHOLD,
            reference_point: ReferencePoint::default(),
            policy: Policy::default(),
        }
    }
}

impl DecisionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SignalError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: DecisionConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.reference_point.validate()?;
        if !self.cluster_threshold.is_finite() || self.cluster_threshold < 0.0 {
            return Err(SignalError::InvalidThreshold(self.cluster_threshold));
        }
        Ok(())
    }
}
