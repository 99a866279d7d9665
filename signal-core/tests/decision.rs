use signal_core::light::resolve::resolve_color;
use signal_core::light::similarity::{center_distance, ReferencePoint};
use signal_core::{
    DecisionConfig, LightColor, Policy, SignalDecider, SignalDecision, TrafficLight, TrafficSignal,
};

fn scene() -> Vec<TrafficLight> {
    vec![
        TrafficLight::new(100, 100, 20, 20, LightColor::Red).unwrap(),
        TrafficLight::new(105, 98, 22, 19, LightColor::Red).unwrap(),
        TrafficLight::new(400, 400, 20, 20, LightColor::Green).unwrap(),
    ]
}

#[test]
fn three_light_scene_splits_into_two_clusters() {
    let lights = scene();
    let decider = SignalDecider::new(&DecisionConfig::default()).unwrap();

    let clusters = decider.cluster(&lights);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].lights(), &lights[..2]);
    assert_eq!(clusters[1].lights(), &lights[2..]);
    assert_eq!(resolve_color(&clusters[0]), LightColor::Red);
    assert_eq!(resolve_color(&clusters[1]), LightColor::Green);
}

#[test]
fn default_reference_picks_the_nearer_cluster() {
    let lights = scene();
    let reference = ReferencePoint::default();

    // mean (102.5, 99) vs (400, 400) measured from (320, 240)
    let red_distance = center_distance(&lights[..2], &reference).unwrap();
    let green_distance = center_distance(&lights[2..], &reference).unwrap();
    assert!((red_distance - 259.205).abs() < 1e-3);
    assert!((green_distance - 178.885).abs() < 1e-3);

    let decider = SignalDecider::new(&DecisionConfig::default()).unwrap();
    let SignalDecision::Decided(decision) = decider.decide(&lights) else {
        panic!("expected a decision");
    };
    assert_eq!(decision.cluster.lights(), &lights[2..]);
    assert_eq!(decision.consensus, LightColor::Green);
    assert_eq!(decision.signal.permissions(), (true, true, true));
}

#[test]
fn red_cluster_under_conservative_policy_forbids() {
    let lights = scene();
    let config = DecisionConfig {
        reference_point: ReferencePoint::new(100.0, 100.0),
        policy: Policy::Conservative,
        ..DecisionConfig::default()
    };
    let decider = SignalDecider::new(&config).unwrap();

    let SignalDecision::Decided(decision) = decider.decide(&lights) else {
        panic!("expected a decision");
    };
    assert_eq!(decision.cluster.lights(), &lights[..2]);
    assert_eq!(decision.consensus, LightColor::Red);
    assert_eq!(decision.applied, LightColor::Red);
    assert_eq!(decision.signal.permissions(), (false, false, true));
}

#[test]
fn red_cluster_under_radical_policy_still_forbids() {
    let config = DecisionConfig {
        reference_point: ReferencePoint::new(100.0, 100.0),
        policy: Policy::Radical,
        ..DecisionConfig::default()
    };
    let decider = SignalDecider::new(&config).unwrap();
    let signal = decider.decide(&scene()).signal().unwrap();
    assert_eq!(signal.permissions(), (false, false, true));
}

#[test]
fn no_lights_keeps_caller_fallback() {
    let decider = SignalDecider::new(&DecisionConfig::default()).unwrap();
    let previous = TrafficSignal::new(Policy::Radical);
    assert_eq!(decider.decide(&[]).signal_or(previous), previous);
}

#[test]
fn tighter_threshold_keeps_heads_apart() {
    let config = DecisionConfig {
        cluster_threshold: 10.0,
        ..DecisionConfig::default()
    };
    let decider = SignalDecider::new(&config).unwrap();
    // the two red heads are ~16.0 apart
    assert_eq!(decider.cluster(&scene()).len(), 3);
}

#[test]
fn lights_at_the_grid_edges_are_decided_and_drawn() {
    let lights = vec![
        TrafficLight::new(i32::MAX - 10, 240, 20, 20, LightColor::Green).unwrap(),
        TrafficLight::new(-10, 240, 20, 20, LightColor::Red).unwrap(),
        TrafficLight::new(i32::MIN + 10, i32::MIN + 10, 20, 20, LightColor::Green).unwrap(),
    ];
    let decider = SignalDecider::new(&DecisionConfig::default()).unwrap();

    assert_eq!(decider.cluster(&lights).len(), 3);
    let SignalDecision::Decided(decision) = decider.decide(&lights) else {
        panic!("expected a decision");
    };
    assert_eq!(decision.cluster.lights(), &lights[1..2]);
    assert_eq!(decision.signal.permissions(), (false, false, true));

    let overlay = signal_core::overlay::Overlay::for_frame(&lights, &decision.signal);
    assert_eq!(overlay.lights[0].x2, i32::MAX);
    assert_eq!(overlay.lights[2].y1, i32::MIN);
}
