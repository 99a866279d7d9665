use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use signal_core::DecisionConfig;
use signal_inference::ColorLabels;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub decision: DecisionConfig,
    pub detector: DetectorConfig,
    pub output: OutputConfig,
    pub fallback: Fallback,
    pub parallel: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub detections_path: PathBuf,
    pub confidence: f32,
    pub nms_iou_threshold: f32,
    pub labels: ColorLabels,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detections_path: PathBuf::from("./data/detections.yaml"),
            confidence: 0.25,
            nms_iou_threshold: 0.5,
            labels: ColorLabels::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub result_path: PathBuf,
    pub write_overlays: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            result_path: PathBuf::from("./data/out"),
            write_overlays: false,
        }
    }
}

/// Permissions used for a frame without a relevant traffic light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Keep the last decided permissions; only meaningful for sequential runs.
    #[default]
    Retain,
    /// Start over from the policy's initial permissions.
    PolicyDefault,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.level)
            .with_context(|| format!("invalid logging level `{}`", self.level))
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(contents)?;
        config.decision.validate()?;
        config.logging.level_filter()?;
        Ok(config)
    }
}
