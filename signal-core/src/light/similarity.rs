use crate::error::{Result, SignalError};
use crate::light::TrafficLight;
use crate::{DEFAULT_REFERENCE_X, DEFAULT_REFERENCE_Y, DEFAULT_WEIGHT_SIZE, DEFAULT_WEIGHT_X, DEFAULT_WEIGHT_Y};
use serde::{Deserialize, Serialize};

/// Scale factors of the light-to-light pseudo-distance.
///
/// Vertical offset and size mismatch dominate: two heads stacked at different
/// heights or drawn at different sizes are rarely the same fixture, while a
/// gantry can spread one signal group across the whole frame width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityWeights {
    pub weight_x: f64,
    pub weight_y: f64,
    pub weight_size: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            weight_x: DEFAULT_WEIGHT_X,
            weight_y: DEFAULT_WEIGHT_Y,
            weight_size: DEFAULT_WEIGHT_SIZE,
        }
    }
}

impl SimilarityWeights {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("weight_x", self.weight_x),
            ("weight_y", self.weight_y),
            ("weight_size", self.weight_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SignalError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }

    /// Weighted distance between two lights. Symmetric and non-negative, but
    /// not a metric: the size term breaks the triangle inequality.
    pub fn distance(&self, a: &TrafficLight, b: &TrafficLight) -> f64 {
        // Differences of two `i32` can overflow, so they are taken in `f64`.
        let delta = |a: i32, b: i32| a as f64 - b as f64;
        let distance_x = self.weight_x * delta(a.center_x(), b.center_x());
        let distance_y = self.weight_y * delta(a.center_y(), b.center_y());
        let distance_size = self.weight_size
            * (delta(a.width(), b.width()).abs() + delta(a.height(), b.height()).abs());

        (distance_x * distance_x + distance_y * distance_y).sqrt() + distance_size
    }

    /// Single-linkage distance: the closest pair across the two groups.
    pub fn cluster_similarity(&self, a: &[TrafficLight], b: &[TrafficLight]) -> Result<f64> {
        if a.is_empty() || b.is_empty() {
            return Err(SignalError::EmptyCluster);
        }

        let min_distance = a
            .iter()
            .flat_map(|light_a| b.iter().map(move |light_b| self.distance(light_a, light_b)))
            .fold(f64::INFINITY, f64::min);

        Ok(min_distance)
    }
}

/// Image location where the ego lane's signal is expected to appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self {
            x: DEFAULT_REFERENCE_X,
            y: DEFAULT_REFERENCE_Y,
        }
    }
}

impl ReferencePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn validate(&self) -> Result<()> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(())
        } else {
            Err(SignalError::InvalidReferencePoint {
                x: self.x,
                y: self.y,
            })
        }
    }

    pub fn distance_to(&self, (x, y): (f64, f64)) -> f64 {
        ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt()
    }
}

/// Mean of the light centers.
pub fn mean_center(lights: &[TrafficLight]) -> Result<(f64, f64)> {
    if lights.is_empty() {
        return Err(SignalError::EmptyCluster);
    }

    let count = lights.len() as f64;
    let (sum_x, sum_y) = lights.iter().fold((0.0, 0.0), |(x, y), light| {
        (x + light.center_x() as f64, y + light.center_y() as f64)
    });

    Ok((sum_x / count, sum_y / count))
}

/// Euclidean distance from the mean light center to `reference`.
pub fn center_distance(lights: &[TrafficLight], reference: &ReferencePoint) -> Result<f64> {
    Ok(reference.distance_to(mean_center(lights)?))
}
