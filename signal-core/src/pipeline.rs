use crate::config::DecisionConfig;
use crate::error::Result;
use crate::light::cluster::{Cluster, ClusteringEngine};
use crate::light::color::LightColor;
use crate::light::resolve::resolve_color;
use crate::light::select::select_cluster;
use crate::light::similarity::ReferencePoint;
use crate::light::TrafficLight;
use crate::signal::{Policy, TrafficSignal};
use log::{debug, info};
use rayon::prelude::*;

/// Outcome of one decision cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalDecision {
    Decided(Decision),
    /// Nothing in the frame looked like a relevant traffic light.
    NoRelevantSignal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub signal: TrafficSignal,
    /// Cluster the decision was taken from.
    pub cluster: Cluster,
    /// Majority color of the cluster as detected.
    pub consensus: LightColor,
    /// Consensus after policy normalization; always red or green.
    pub applied: LightColor,
}

impl SignalDecision {
    pub fn signal(&self) -> Option<TrafficSignal> {
        match self {
            SignalDecision::Decided(decision) => Some(decision.signal),
            SignalDecision::NoRelevantSignal => None,
        }
    }

    /// Decided permissions, or `fallback` when the frame had no relevant light.
    pub fn signal_or(&self, fallback: TrafficSignal) -> TrafficSignal {
        self.signal().unwrap_or(fallback)
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, SignalDecision::Decided(_))
    }
}

/// Wires clustering, selection, color resolution and the signal update.
#[derive(Debug, Clone)]
pub struct SignalDecider {
    engine: ClusteringEngine,
    reference: ReferencePoint,
    policy: Policy,
}

impl SignalDecider {
    pub fn new(config: &DecisionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: ClusteringEngine::new(config.weights, config.cluster_threshold)?,
            reference: config.reference_point,
            policy: config.policy,
        })
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Permissions this decider starts every frame with.
    pub fn initial_signal(&self) -> TrafficSignal {
        TrafficSignal::new(self.policy)
    }

    pub fn cluster(&self, lights: &[TrafficLight]) -> Vec<Cluster> {
        self.engine.cluster(lights)
    }

    pub fn decide(&self, lights: &[TrafficLight]) -> SignalDecision {
        let clusters = self.engine.cluster(lights);
        debug!(
            "Grouped {} traffic lights into {} clusters",
            lights.len(),
            clusters.len()
        );

        let Some(cluster) = select_cluster(&clusters, &self.reference) else {
            debug!("No traffic light cluster in frame");
            return SignalDecision::NoRelevantSignal;
        };

        let consensus = resolve_color(cluster);
        let mut signal = self.initial_signal();
        let applied = signal.apply(self.policy, &consensus);

        info!(
            "Selected {} light(s) around {:?}: {} read as {} under {} policy -> {}",
            cluster.len(),
            cluster.centroid(),
            consensus,
            applied,
            self.policy,
            signal
        );

        SignalDecision::Decided(Decision {
            signal,
            cluster: cluster.clone(),
            consensus,
            applied,
        })
    }

    /// Decides many independent frames in parallel; results keep input order.
    pub fn decide_batch(&self, frames: &[Vec<TrafficLight>]) -> Vec<SignalDecision> {
        frames
            .par_iter()
            .map(|lights| self.decide(lights))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(cx: i32, cy: i32, w: i32, h: i32, color: &str) -> TrafficLight {
        TrafficLight::new(cx, cy, w, h, LightColor::from_label(color)).unwrap()
    }

    #[test]
    fn empty_frame_is_not_an_error() {
        let decider = SignalDecider::new(&DecisionConfig::default()).unwrap();
        let decision = decider.decide(&[]);
        assert_eq!(decision, SignalDecision::NoRelevantSignal);

        let fallback = TrafficSignal::new(Policy::Radical);
        assert_eq!(decision.signal_or(fallback), fallback);
    }

    #[test]
    fn yellow_reading_depends_on_policy() {
        let lights = [light(320, 240, 20, 20, "yellow")];

        let conservative = SignalDecider::new(&DecisionConfig::default()).unwrap();
        let decision = conservative.decide(&lights);
        assert_eq!(decision.signal().unwrap().permissions(), (false, false, true));

        let radical = SignalDecider::new(&DecisionConfig {
            policy: Policy::Radical,
            ..DecisionConfig::default()
        })
        .unwrap();
        let SignalDecision::Decided(decision) = radical.decide(&lights) else {
            panic!("expected a decision");
        };
        assert_eq!(decision.consensus, LightColor::Yellow);
        assert_eq!(decision.applied, LightColor::Green);
        assert_eq!(decision.signal.permissions(), (true, true, true));
    }

    #[test]
    fn decision_does_not_touch_detected_colors() {
        let lights = vec![light(320, 240, 20, 20, "yellow"), light(322, 241, 20, 20, "red")];
        let decider = SignalDecider::new(&DecisionConfig::default()).unwrap();

        let SignalDecision::Decided(decision) = decider.decide(&lights) else {
            panic!("expected a decision");
        };
        assert_eq!(decision.cluster.len(), 2);
        assert_eq!(decision.consensus, LightColor::Red);
        assert_eq!(decision.cluster[0].color(), &LightColor::Yellow);
        assert_eq!(lights[0].color(), &LightColor::Yellow);
    }

    #[test]
    fn batch_matches_sequential() {
        let decider = SignalDecider::new(&DecisionConfig::default()).unwrap();
        let frames = vec![
            vec![light(320, 240, 20, 20, "green")],
            vec![],
            vec![light(100, 100, 20, 20, "red"), light(105, 98, 22, 19, "red")],
            vec![light(330, 250, 20, 20, "flashing")],
        ];

        let batch = decider.decide_batch(&frames);
        let sequential: Vec<_> = frames.iter().map(|lights| decider.decide(lights)).collect();
        assert_eq!(batch, sequential);
        assert!(!batch[1].is_decided());
    }
}
