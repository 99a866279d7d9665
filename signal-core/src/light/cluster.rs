use crate::error::{Result, SignalError};
use crate::light::similarity::{mean_center, ReferencePoint, SimilarityWeights};
use crate::light::TrafficLight;
use bitvec::prelude::*;
use hashbrown::HashMap;
use log::debug;
use std::ops::Deref;

/// Lights believed to belong to one physical signal head or signal group.
///
/// Never empty, never holds two equal lights, and keeps insertion order so
/// that everything derived from it is reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster(Vec<TrafficLight>);

impl Deref for Cluster {
    type Target = [TrafficLight];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Cluster {
    pub fn singleton(light: TrafficLight) -> Self {
        Cluster(vec![light])
    }

    /// Builds a cluster from `lights`, dropping later duplicates.
    pub fn from_lights(lights: Vec<TrafficLight>) -> Result<Self> {
        let mut members: Vec<TrafficLight> = Vec::with_capacity(lights.len());
        for light in lights {
            if !members.contains(&light) {
                members.push(light);
            }
        }

        if members.is_empty() {
            return Err(SignalError::EmptyCluster);
        }
        Ok(Cluster(members))
    }

    pub fn lights(&self) -> &[TrafficLight] {
        &self.0
    }

    pub fn into_lights(self) -> Vec<TrafficLight> {
        self.0
    }

    pub fn centroid(&self) -> (f64, f64) {
        // A cluster always has at least one member.
        mean_center(&self.0).unwrap_or_default()
    }

    pub fn center_distance(&self, reference: &ReferencePoint) -> f64 {
        reference.distance_to(self.centroid())
    }

    fn absorb(&mut self, other: Cluster) {
        for light in other.0 {
            if !self.0.contains(&light) {
                self.0.push(light);
            }
        }
    }
}

/// Agglomerative single-linkage clustering with a merge cutoff.
#[derive(Debug, Clone, Copy)]
pub struct ClusteringEngine {
    weights: SimilarityWeights,
    threshold: f64,
}

impl ClusteringEngine {
    pub fn new(weights: SimilarityWeights, threshold: f64) -> Result<Self> {
        weights.validate()?;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(SignalError::InvalidThreshold(threshold));
        }

        Ok(Self { weights, threshold })
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Groups `lights` into disjoint clusters.
    ///
    /// Starts from one cluster per distinct light and repeatedly merges the
    /// closest pair while its single-linkage distance is within the threshold.
    /// Pairs are scanned in input order and the first strict minimum wins, so
    /// the same input always yields the same partition. Output clusters are in
    /// the order of their first member in the input.
    pub fn cluster(&self, lights: &[TrafficLight]) -> Vec<Cluster> {
        let mut clusters: Vec<Option<Cluster>> = Vec::with_capacity(lights.len());
        for light in lights {
            let duplicate = clusters
                .iter()
                .flatten()
                .any(|cluster| cluster.contains(light));
            if duplicate {
                debug!("Dropping duplicate traffic light {}", light);
                continue;
            }
            clusters.push(Some(Cluster::singleton(light.clone())));
        }

        let count = clusters.len();
        if count < 2 {
            return clusters.into_iter().flatten().collect();
        }

        // Distances between live clusters, keyed by (lower id, higher id).
        let mut cache: HashMap<(usize, usize), f64> = HashMap::with_capacity(count * count / 2);
        for i in 0..count {
            for j in (i + 1)..count {
                if let (Some(a), Some(b)) = (&clusters[i], &clusters[j]) {
                    cache.insert((i, j), self.weights.distance(&a[0], &b[0]));
                }
            }
        }

        let mut alive = bitvec![1; count];
        let mut live_count = count;

        while live_count > 1 {
            let mut best: Option<(usize, usize, f64)> = None;
            for i in alive.iter_ones() {
                for j in alive.iter_ones().filter(|&j| j > i) {
                    let distance = cache[&(i, j)];
                    if best.map_or(true, |(_, _, min)| distance < min) {
                        best = Some((i, j, distance));
                    }
                }
            }

            let Some((keep, merged, distance)) = best else {
                break;
            };
            if distance > self.threshold {
                break;
            }

            debug!(
                "Merging light cluster {} into {} at distance {:.3}",
                merged, keep, distance
            );

            if let Some(absorbed) = clusters[merged].take() {
                if let Some(target) = clusters[keep].as_mut() {
                    target.absorb(absorbed);
                }
            }
            alive.set(merged, false);
            live_count -= 1;

            // Single linkage: the merged cluster is as close to k as the
            // closer of its two halves was.
            for k in alive.iter_ones().filter(|&k| k != keep) {
                let via_merged = cache[&ordered(merged, k)];
                let entry = cache.entry(ordered(keep, k)).or_insert(f64::INFINITY);
                *entry = entry.min(via_merged);
            }
            cache.retain(|&(i, j), _| i != merged && j != merged);
        }

        clusters.into_iter().flatten().collect()
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::color::LightColor;
    use hashbrown::HashSet;

    fn light(cx: i32, cy: i32, w: i32, h: i32) -> TrafficLight {
        TrafficLight::new(cx, cy, w, h, LightColor::Red).unwrap()
    }

    fn engine(threshold: f64) -> ClusteringEngine {
        ClusteringEngine::new(SimilarityWeights::default(), threshold).unwrap()
    }

    fn scene() -> Vec<TrafficLight> {
        vec![
            light(100, 100, 20, 20),
            light(105, 98, 22, 19),
            light(400, 400, 20, 20),
            light(160, 101, 20, 20),
            light(402, 396, 20, 21),
            light(600, 40, 12, 30),
            light(250, 100, 20, 20),
        ]
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        assert!(engine(30.0).cluster(&[]).is_empty());
    }

    #[test]
    fn single_light_is_its_own_cluster() {
        let clusters = engine(30.0).cluster(&[light(1, 1, 2, 2)]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 1);
    }

    #[test]
    fn clusters_partition_the_input() {
        let lights = scene();
        for threshold in [0.0, 5.0, 17.0, 30.0, 100.0, 10_000.0] {
            let clusters = engine(threshold).cluster(&lights);
            let members: Vec<&TrafficLight> = clusters.iter().flat_map(|c| c.iter()).collect();

            assert!(clusters.iter().all(|c| !c.is_empty()));
            assert_eq!(members.len(), lights.len());
            let unique: HashSet<&TrafficLight> = members.iter().copied().collect();
            assert_eq!(unique.len(), lights.len());
            assert!(lights.iter().all(|light| unique.contains(light)));
        }
    }

    #[test]
    fn chains_merge_through_single_linkage() {
        // 0-1 and 1-2 are within the threshold, 0-2 is not.
        let lights = [light(0, 0, 10, 10), light(0, 5, 10, 10), light(0, 10, 10, 10)];
        let clusters = engine(25.0).cluster(&lights);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].lights(), &lights[..]);
    }

    #[test]
    fn threshold_is_inclusive() {
        // exactly 10.0 apart vertically
        let lights = [light(0, 0, 10, 10), light(0, 2, 10, 10)];
        assert_eq!(engine(10.0).cluster(&lights).len(), 1);
        assert_eq!(engine(9.999).cluster(&lights).len(), 2);
    }

    #[test]
    fn clustering_is_deterministic() {
        let lights = scene();
        let first = engine(30.0).cluster(&lights);
        for _ in 0..10 {
            assert_eq!(engine(30.0).cluster(&lights), first);
        }
    }

    #[test]
    fn larger_threshold_only_coarsens() {
        let lights = scene();
        let thresholds = [0.0, 5.0, 12.0, 17.0, 30.0, 60.0, 400.0, 5_000.0];
        for pair in thresholds.windows(2) {
            let fine = engine(pair[0]).cluster(&lights);
            let coarse = engine(pair[1]).cluster(&lights);
            assert!(fine.len() >= coarse.len());
            for cluster in &fine {
                let holder = coarse
                    .iter()
                    .find(|candidate| candidate.contains(&cluster[0]))
                    .unwrap();
                assert!(cluster.iter().all(|light| holder.contains(light)));
            }
        }
    }

    #[test]
    fn duplicates_collapse() {
        let lights = [
            light(10, 10, 5, 5),
            TrafficLight::new(10, 10, 5, 5, LightColor::Green).unwrap(),
            light(10, 300, 5, 5),
        ];
        let clusters = engine(0.0).cluster(&lights);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0][0].color(), &LightColor::Red);
    }

    #[test]
    fn rejects_invalid_threshold() {
        let weights = SimilarityWeights::default();
        assert!(matches!(
            ClusteringEngine::new(weights, -1.0),
            Err(SignalError::InvalidThreshold(_))
        ));
        assert!(ClusteringEngine::new(weights, f64::NAN).is_err());
    }

    #[test]
    fn cluster_from_lights_requires_members() {
        assert!(matches!(
            Cluster::from_lights(Vec::new()),
            Err(SignalError::EmptyCluster)
        ));
        let cluster =
            Cluster::from_lights(vec![light(1, 1, 2, 2), light(1, 1, 2, 2), light(3, 3, 2, 2)])
                .unwrap();
        assert_eq!(cluster.len(), 2);
        assert_eq!(cluster.centroid(), (2.0, 2.0));
    }
}
