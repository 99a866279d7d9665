use crate::light::cluster::Cluster;
use crate::light::similarity::ReferencePoint;
use std::cmp::Ordering;

/// Picks the cluster most relevant to the ego lane.
///
/// The winner is the cluster whose mean center lies closest to `reference`.
/// Equal distances go to the cluster with more members, then to the one that
/// comes first in `clusters`. Returns `None` when there is nothing to pick.
pub fn select_cluster<'a>(clusters: &'a [Cluster], reference: &ReferencePoint) -> Option<&'a Cluster> {
    let mut best: Option<(&Cluster, f64)> = None;

    for cluster in clusters {
        let distance = cluster.center_distance(reference);
        let better = match best {
            None => true,
            Some((current, current_distance)) => {
                match distance.partial_cmp(&current_distance) {
                    Some(Ordering::Less) => true,
                    Some(Ordering::Equal) => cluster.len() > current.len(),
                    _ => false,
                }
            }
        };
        if better {
            best = Some((cluster, distance));
        }
    }

    best.map(|(cluster, _)| cluster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::color::LightColor;
    use crate::light::TrafficLight;

    fn cluster(centers: &[(i32, i32)]) -> Cluster {
        Cluster::from_lights(
            centers
                .iter()
                .map(|&(x, y)| TrafficLight::new(x, y, 10, 10, LightColor::Red).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn picks_nearest_cluster() {
        let reference = ReferencePoint::new(0.0, 0.0);
        let far = cluster(&[(10, 0)]);
        let near = cluster(&[(0, 2)]);
        let clusters = [far, near.clone()];

        assert_eq!(select_cluster(&clusters, &reference), Some(&near));
    }

    #[test]
    fn nothing_to_pick_from_empty_set() {
        assert!(select_cluster(&[], &ReferencePoint::default()).is_none());
    }

    #[test]
    fn ties_prefer_more_members_then_input_order() {
        let reference = ReferencePoint::new(0.0, 0.0);
        let single = cluster(&[(0, 5)]);
        let pair = cluster(&[(5, -3), (5, 3)]);
        let other_single = cluster(&[(5, 0)]);
        let clusters = [single.clone(), pair.clone(), other_single];
        assert_eq!(select_cluster(&clusters, &reference), Some(&pair));

        let clusters = [single.clone(), cluster(&[(0, -5)])];
        let picked = select_cluster(&clusters, &reference).unwrap();
        assert_eq!(picked[0].rect_xywh(), single[0].rect_xywh());
    }
}
