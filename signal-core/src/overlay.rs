use crate::light::TrafficLight;
use crate::signal::TrafficSignal;
use crate::{LEFT_INDICATOR_OFFSET, RIGHT_INDICATOR_OFFSET, STRAIGHT_INDICATOR_OFFSET};

/// Box of one detected light, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightOverlay {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub color: String,
    pub shape: Option<String>,
}

impl From<&TrafficLight> for LightOverlay {
    fn from(light: &TrafficLight) -> Self {
        let (x1, y1, x2, y2) = light.rect_xyxy();
        Self {
            x1,
            y1,
            x2,
            y2,
            color: light.color().to_string(),
            shape: light.shape().map(str::to_string),
        }
    }
}

/// One maneuver flag. `offset` is a horizontal layout hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalIndicator {
    pub label: &'static str,
    pub offset: u32,
    pub allowed: bool,
}

impl SignalIndicator {
    pub fn for_signal(signal: &TrafficSignal) -> [SignalIndicator; 3] {
        [
            SignalIndicator {
                label: "Straight",
                offset: STRAIGHT_INDICATOR_OFFSET,
                allowed: signal.straight,
            },
            SignalIndicator {
                label: "Left",
                offset: LEFT_INDICATOR_OFFSET,
                allowed: signal.left,
            },
            SignalIndicator {
                label: "Right",
                offset: RIGHT_INDICATOR_OFFSET,
                allowed: signal.right,
            },
        ]
    }
}

/// Everything a renderer needs to annotate one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub lights: Vec<LightOverlay>,
    pub indicators: [SignalIndicator; 3],
}

impl Overlay {
    pub fn for_frame(lights: &[TrafficLight], signal: &TrafficSignal) -> Self {
        Self {
            lights: lights.iter().map(LightOverlay::from).collect(),
            indicators: SignalIndicator::for_signal(signal),
        }
    }
}
