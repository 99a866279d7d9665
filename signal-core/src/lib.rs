pub mod config;
pub mod error;
pub mod light;
pub mod overlay;
pub mod pipeline;
pub mod signal;

pub use config::DecisionConfig;
pub use error::{Result, SignalError};
pub use light::cluster::{Cluster, ClusteringEngine};
pub use light::color::LightColor;
pub use light::TrafficLight;
pub use pipeline::{Decision, SignalDecider, SignalDecision};
pub use signal::{Policy, TrafficSignal};

pub(crate) const DEFAULT_WEIGHT_X: f64 = 0.05;
pub(crate) const DEFAULT_WEIGHT_Y: f64 = 5.0;
pub(crate) const DEFAULT_WEIGHT_SIZE: f64 = 2.0;
pub(crate) const DEFAULT_CLUSTER_THRESHOLD: f64 = 30.0;

// Horizontal center and signal-height anchor of a 640x480 frame.
pub(crate) const DEFAULT_REFERENCE_X: f64 = 320.0;
pub(crate) const DEFAULT_REFERENCE_Y: f64 = 240.0;

// Renderer layout hints, in pixels from the left edge.
pub(crate) const STRAIGHT_INDICATOR_OFFSET: u32 = 55;
pub(crate) const LEFT_INDICATOR_OFFSET: u32 = 5;
pub(crate) const RIGHT_INDICATOR_OFFSET: u32 = 145;
