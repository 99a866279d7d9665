use anyhow::Result;
use detect::DetectResult;

pub mod detect;
pub mod replay;

/// Source of raw traffic-light boxes for one frame.
pub trait LightDetectInference {
    /// Runs detection on `frame`, keeping boxes whose best class scores
    /// strictly above `confidence`.
    fn inference_lights(&self, frame: &str, confidence: f32) -> Result<Vec<DetectResult>>;
}
