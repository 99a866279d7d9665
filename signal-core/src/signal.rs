use crate::error::SignalError;
use crate::light::color::LightColor;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Risk policy deciding how permissive the derived permissions start out and
/// how an ambiguous light reading is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Radical,
    #[default]
    Conservative,
}

impl Policy {
    /// Collapses any reading to red or green under this policy.
    pub fn normalize(&self, color: &LightColor) -> LightColor {
        match self {
            Policy::Radical => color.radical(),
            Policy::Conservative => color.conservative(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Radical => "radical",
            Policy::Conservative => "conservative",
        }
    }
}

impl FromStr for Policy {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "radical" => Ok(Policy::Radical),
            "conservative" => Ok(Policy::Conservative),
            other => Err(SignalError::UnknownPolicy(other.to_string())),
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Maneuvers permitted for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrafficSignal {
    pub straight: bool,
    pub left: bool,
    pub right: bool,
}

impl TrafficSignal {
    pub fn new(policy: Policy) -> Self {
        match policy {
            Policy::Radical => Self {
                straight: true,
                left: true,
                right: true,
            },
            // Right stays open, like turning right on red.
            Policy::Conservative => Self {
                straight: false,
                left: false,
                right: true,
            },
        }
    }

    pub fn from_policy_name(name: &str) -> Result<Self, SignalError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn allow_all(&mut self) {
        self.straight = true;
        self.left = true;
        self.right = true;
    }

    /// Closes straight and left. Right turns are not gated by the signal phase.
    pub fn forbid_all(&mut self) {
        self.straight = false;
        self.left = false;
        self.right = true;
    }

    /// Applies a resolved light color under `policy` and returns the color
    /// the decision was taken on.
    pub fn apply(&mut self, policy: Policy, color: &LightColor) -> LightColor {
        let normalized = policy.normalize(color);
        match normalized {
            LightColor::Red => self.forbid_all(),
            LightColor::Green => self.allow_all(),
            // normalize only yields red or green
            _ => {}
        }
        normalized
    }

    pub fn permissions(&self) -> (bool, bool, bool) {
        (self.straight, self.left, self.right)
    }
}

impl Default for TrafficSignal {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

/// Flags are spelled `True` / `False` in frame reports.
fn flag(allowed: bool) -> &'static str {
    if allowed {
        "True"
    } else {
        "False"
    }
}

impl Display for TrafficSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Straight: {:<8}Left: {:<8}Right: {:<8}",
            flag(self.straight),
            flag(self.left),
            flag(self.right)
        )
    }
}
