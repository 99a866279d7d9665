use std::path::PathBuf;

pub type Result<T, E = SignalError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("traffic light size must be positive, got {width}x{height}")]
    InvalidSize { width: i64, height: i64 },

    #[error("traffic light box has a non-finite value: {0:?}")]
    NonFiniteCoordinate([f32; 4]),

    #[error("traffic light box does not fit the pixel grid: {0:?}")]
    CoordinateOutOfRange([f32; 4]),

    #[error("traffic light box corners overflow the pixel grid: center ({center_x}, {center_y}), size {width}x{height}")]
    BoxOutOfRange {
        center_x: i32,
        center_y: i32,
        width: i32,
        height: i32,
    },

    #[error("unknown signal policy `{0}`, expected `radical` or `conservative`")]
    UnknownPolicy(String),

    #[error("cluster threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("similarity weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("reference point must be finite, got ({x}, {y})")]
    InvalidReferencePoint { x: f64, y: f64 },

    #[error("cluster has no traffic lights")]
    EmptyCluster,

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}
