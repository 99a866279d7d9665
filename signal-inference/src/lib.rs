pub mod inference;
pub mod labels;

pub use inference::detect::{DetectResult, NMSImplement};
pub use inference::replay::ReplayDetectSession;
pub use inference::LightDetectInference;
pub use labels::{ClassLabel, ColorLabels};
