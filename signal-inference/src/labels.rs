use crate::inference::detect::DetectResult;
use serde::{Deserialize, Serialize};
use signal_core::{LightColor, TrafficLight};

/// What one detector class means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLabel {
    pub color: LightColor,
    #[serde(default)]
    pub shape: Option<String>,
}

impl ClassLabel {
    pub fn new(color: LightColor) -> Self {
        Self { color, shape: None }
    }
}

/// Class index to light color (and optional shape) table of a detector model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorLabels(Vec<ClassLabel>);

impl Default for ColorLabels {
    fn default() -> Self {
        ColorLabels(vec![
            ClassLabel::new(LightColor::Red),
            ClassLabel::new(LightColor::Yellow),
            ClassLabel::new(LightColor::Green),
        ])
    }
}

impl ColorLabels {
    pub fn new(labels: Vec<ClassLabel>) -> Self {
        ColorLabels(labels)
    }

    /// Label of `class_index`; classes the table does not know read as an
    /// unknown color so the signal policy decides how to treat them.
    pub fn label(&self, class_index: usize) -> ClassLabel {
        self.0.get(class_index).cloned().unwrap_or_else(|| {
            ClassLabel::new(LightColor::Unknown(format!("class {}", class_index)))
        })
    }

    pub fn to_traffic_light(&self, result: &DetectResult) -> signal_core::Result<TrafficLight> {
        let ClassLabel { color, shape } = self.label(result.class_index());
        let light = TrafficLight::from_xywh(result.xywh(), color)?;
        Ok(match shape {
            Some(shape) => light.with_shape(shape),
            None => light,
        })
    }
}
