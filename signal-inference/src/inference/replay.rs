use crate::inference::detect::DetectResult;
use crate::inference::LightDetectInference;
use anyhow::{anyhow, Context, Result};
use hashbrown::HashMap;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RecordedDetections {
    frames: Vec<RecordedFrame>,
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    name: String,
    #[serde(default)]
    detections: Vec<RecordedBox>,
}

#[derive(Debug, Deserialize)]
struct RecordedBox {
    class: usize,
    score: f32,
    #[serde(rename = "box")]
    xywh: [f32; 4],
}

/// Detector that replays boxes recorded from a model run.
///
/// Frames are read from a YAML file of the form
///
/// ```yaml
/// frames:
///   - name: crossing.jpg
///     detections:
///       - { class: 0, score: 0.91, box: [100, 100, 20, 20] }
/// ```
pub struct ReplayDetectSession {
    names: Vec<String>,
    frames: HashMap<String, Vec<DetectResult>>,
}

impl ReplayDetectSession {
    pub fn new(folder_path: impl AsRef<Path>) -> Result<Self> {
        Self::open(folder_path.as_ref().join("detections.yaml"))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read recorded detections {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse recorded detections {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let recorded: RecordedDetections = serde_yaml::from_str(contents)?;

        let mut names = Vec::with_capacity(recorded.frames.len());
        let mut frames = HashMap::with_capacity(recorded.frames.len());
        for frame in recorded.frames {
            let detections = frame
                .detections
                .into_iter()
                .map(|recorded| DetectResult::new(recorded.class, recorded.score, recorded.xywh))
                .collect::<Vec<_>>();

            if frames.insert(frame.name.clone(), detections).is_some() {
                return Err(anyhow!("frame `{}` is recorded twice", frame.name));
            }
            names.push(frame.name);
        }

        debug!("Loaded {} recorded frames", names.len());
        Ok(Self { names, frames })
    }

    /// Frame names in recording order.
    pub fn frames(&self) -> &[String] {
        &self.names
    }
}

impl LightDetectInference for ReplayDetectSession {
    fn inference_lights(&self, frame: &str, confidence: f32) -> Result<Vec<DetectResult>> {
        let detections = self
            .frames
            .get(frame)
            .ok_or_else(|| anyhow!("no recorded detections for frame `{}`", frame))?;

        Ok(detections
            .iter()
            .filter(|result| result.confidence() > confidence)
            .cloned()
            .collect())
    }
}
