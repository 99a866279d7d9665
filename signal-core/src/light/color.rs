use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Color read off a traffic light by the detector.
///
/// Labels the detector emits that are not one of the three lamp colors are
/// kept as `Unknown` rather than rejected; the signal policy decides how they
/// are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LightColor {
    Red,
    Yellow,
    Green,
    Unknown(String),
}

impl LightColor {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "red" => LightColor::Red,
            "yellow" => LightColor::Yellow,
            "green" => LightColor::Green,
            _ => LightColor::Unknown(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LightColor::Red => "red",
            LightColor::Yellow => "yellow",
            LightColor::Green => "green",
            LightColor::Unknown(label) => label,
        }
    }

    /// Rank used to break ties in favour of stopping: red > yellow > green > unknown.
    pub fn restrictiveness(&self) -> u8 {
        match self {
            LightColor::Red => 3,
            LightColor::Yellow => 2,
            LightColor::Green => 1,
            LightColor::Unknown(_) => 0,
        }
    }

    /// Permissive reading: keeps red, everything else goes.
    pub fn radical(&self) -> LightColor {
        match self {
            LightColor::Red => LightColor::Red,
            _ => LightColor::Green,
        }
    }

    /// Restrictive reading: keeps green, everything else stops.
    pub fn conservative(&self) -> LightColor {
        match self {
            LightColor::Green => LightColor::Green,
            _ => LightColor::Red,
        }
    }
}

impl From<String> for LightColor {
    fn from(label: String) -> Self {
        LightColor::from_label(&label)
    }
}

impl From<LightColor> for String {
    fn from(color: LightColor) -> Self {
        color.label().to_string()
    }
}

impl Display for LightColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LightColor::Unknown(label) if label.is_empty() => write!(f, "unknown"),
            color => write!(f, "{}", color.label()),
        }
    }
}
