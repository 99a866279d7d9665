use crate::light::cluster::Cluster;
use crate::light::color::LightColor;
use hashbrown::HashMap;
use std::cmp::{Ordering, Reverse};

/// Consensus color of a cluster.
///
/// Majority vote over member colors. A tied vote goes to the most restrictive
/// color among the tied ones (red, then yellow, then green, then unknown
/// labels), so disagreement between detections always leans toward stopping.
pub fn resolve_color(cluster: &Cluster) -> LightColor {
    let mut votes: HashMap<&LightColor, usize> = HashMap::new();
    for light in cluster.iter() {
        *votes.entry(light.color()).or_insert(0) += 1;
    }

    votes
        .into_iter()
        .max_by(|(color_a, count_a), (color_b, count_b)| {
            count_a
                .cmp(count_b)
                .then_with(|| color_a.restrictiveness().cmp(&color_b.restrictiveness()))
                .then_with(|| tie_on_label(color_a, color_b))
        })
        .map(|(color, _)| color.clone())
        // Clusters are never empty.
        .unwrap_or_else(|| LightColor::Unknown(String::new()))
}

fn tie_on_label(a: &LightColor, b: &LightColor) -> Ordering {
    Reverse(a.label()).cmp(&Reverse(b.label()))
}
