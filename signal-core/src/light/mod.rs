pub mod cluster;
pub mod color;
pub mod resolve;
pub mod select;
pub mod similarity;

use crate::error::{Result, SignalError};
use crate::light::color::LightColor;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// One recognized traffic-light box.
///
/// Identity is the `(center_x, center_y, width, height)` quadruple only, so two
/// detections of the same box with different colors compare equal and collapse
/// into one cluster member.
#[derive(Debug, Clone)]
pub struct TrafficLight {
    center_x: i32,
    center_y: i32,
    width: i32,
    height: i32,
    color: LightColor,
    shape: Option<String>,
}

impl TrafficLight {
    pub fn new(
        center_x: i32,
        center_y: i32,
        width: i32,
        height: i32,
        color: LightColor,
    ) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(SignalError::InvalidSize {
                width: width as i64,
                height: height as i64,
            });
        }

        // Corners must stay addressable, see `rect_xyxy`.
        let (half_width, half_height) = (width / 2, height / 2);
        let corners = center_x
            .checked_sub(half_width)
            .and(center_x.checked_add(half_width))
            .and(center_y.checked_sub(half_height))
            .and(center_y.checked_add(half_height));
        if corners.is_none() {
            return Err(SignalError::BoxOutOfRange {
                center_x,
                center_y,
                width,
                height,
            });
        }

        Ok(Self {
            center_x,
            center_y,
            width,
            height,
            color,
            shape: None,
        })
    }

    /// Builds a light from a detector box in center/size form.
    ///
    /// Values are truncated toward zero, matching how the detector's float
    /// boxes are snapped to the pixel grid. Non-finite values, values outside
    /// the `i32` range and sizes that truncate to zero or below are rejected.
    pub fn from_xywh(xywh: [f32; 4], color: LightColor) -> Result<Self> {
        if xywh.iter().any(|value| !value.is_finite()) {
            return Err(SignalError::NonFiniteCoordinate(xywh));
        }
        // `i32::MAX as f32` rounds up to 2^31, so the upper bound is exclusive.
        let grid = i32::MIN as f32..i32::MAX as f32;
        if xywh.iter().any(|value| !grid.contains(value)) {
            return Err(SignalError::CoordinateOutOfRange(xywh));
        }

        let [center_x, center_y, width, height] = xywh;
        Self::new(
            center_x as i32,
            center_y as i32,
            width as i32,
            height as i32,
            color,
        )
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    /// Returns a copy carrying `color`; the original keeps its detected color.
    pub fn with_color(&self, color: LightColor) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    pub fn center_x(&self) -> i32 {
        self.center_x
    }

    pub fn center_y(&self) -> i32 {
        self.center_y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn color(&self) -> &LightColor {
        &self.color
    }

    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    pub fn rect_xywh(&self) -> (i32, i32, i32, i32) {
        (self.center_x, self.center_y, self.width, self.height)
    }

    pub fn rect_xyxy(&self) -> (i32, i32, i32, i32) {
        // Sizes are positive, so `/` is floor division here. Construction
        // guarantees the corners fit in `i32`.
        let half_width = self.width / 2;
        let half_height = self.height / 2;
        (
            self.center_x - half_width,
            self.center_y - half_height,
            self.center_x + half_width,
            self.center_y + half_height,
        )
    }

    /// Color under the radical strategy: anything that is not red reads as green.
    pub fn radical_color(&self) -> LightColor {
        self.color.radical()
    }

    /// Color under the conservative strategy: anything that is not green reads as red.
    pub fn conservative_color(&self) -> LightColor {
        self.color.conservative()
    }
}

impl PartialEq for TrafficLight {
    fn eq(&self, other: &Self) -> bool {
        self.rect_xywh() == other.rect_xywh()
    }
}

impl Eq for TrafficLight {}

impl Hash for TrafficLight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rect_xywh().hash(state);
    }
}

impl Display for TrafficLight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.center_x,
            self.center_y,
            self.width,
            self.height,
            self.color,
            self.shape.as_deref().unwrap_or("None")
        )
    }
}
