use serde::{Deserialize, Serialize};

/// One raw box from a light detector.
///
/// `x`/`y` are the box center, like the detector head emits them, and
/// `score` is `(class index, confidence)` of the best class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResult {
    pub score: (usize, f32),

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DetectResult {
    pub fn new(class_index: usize, confidence: f32, xywh: [f32; 4]) -> Self {
        let [x, y, width, height] = xywh;
        Self {
            score: (class_index, confidence),
            x,
            y,
            width,
            height,
        }
    }

    pub fn class_index(&self) -> usize {
        self.score.0
    }

    pub fn confidence(&self) -> f32 {
        self.score.1
    }

    pub fn xywh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    fn corners(&self) -> (f32, f32, f32, f32) {
        (
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
        )
    }

    /// Intersection over union of two center/size boxes.
    pub fn iou(&self, other: &DetectResult) -> f32 {
        let (a_x1, a_y1, a_x2, a_y2) = self.corners();
        let (b_x1, b_y1, b_x2, b_y2) = other.corners();

        let intersection_width = (a_x2.min(b_x2) - a_x1.max(b_x1)).max(0.0);
        let intersection_height = (a_y2.min(b_y2) - a_y1.max(b_y1)).max(0.0);
        let intersection = intersection_width * intersection_height;

        let union = self.width * self.height + other.width * other.height - intersection;
        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

pub trait NMSImplement {
    /// Drops boxes under `score_threshold`, then keeps the best-scoring box of
    /// every overlapping group. Boxes of different classes never suppress each
    /// other, so a red and a green lamp on one head both survive.
    fn non_maximum_suppression(self, iou_threshold: f32, score_threshold: f32) -> Vec<DetectResult>;
}

impl NMSImplement for Vec<DetectResult> {
    fn non_maximum_suppression(self, iou_threshold: f32, score_threshold: f32) -> Vec<DetectResult> {
        let mut filtered_detections: Vec<DetectResult> = self
            .into_iter()
            .filter(|d| d.confidence() >= score_threshold)
            .collect();

        // Stable sort, so equal scores keep detector order.
        filtered_detections.sort_by(|a, b| {
            b.confidence()
                .partial_cmp(&a.confidence())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut result: Vec<DetectResult> = Vec::new();

        while !filtered_detections.is_empty() {
            let best = filtered_detections.remove(0);
            filtered_detections
                .retain(|d| d.class_index() != best.class_index() || best.iou(d) < iou_threshold);
            result.push(best);
        }

        result
    }
}
