use crate::config::{AppConfig, Fallback};
use anyhow::Result;
use log::{debug, warn};
use rayon::prelude::*;
use signal_core::overlay::Overlay;
use signal_core::{SignalDecider, SignalDecision, TrafficLight, TrafficSignal};
use signal_inference::{ColorLabels, LightDetectInference, NMSImplement};
use std::time::{Duration, Instant};

/// Result of one processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub name: String,
    pub decision: SignalDecision,
    /// Permissions after the fallback has been applied.
    pub signal: TrafficSignal,
    pub overlay: Overlay,
    /// Detections the detector reported but that were not valid light boxes.
    pub rejected: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub reports: Vec<FrameReport>,
}

impl BatchSummary {
    /// Mean frame time, leaving out the first frame as warm-up.
    pub fn average_time(&self) -> Duration {
        let measured = self.reports.iter().skip(1).collect::<Vec<_>>();
        if measured.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = measured.iter().map(|report| report.elapsed).sum();
        total / measured.len() as u32
    }
}

/// Runs detector and decision core over a sequence of frames.
pub struct FrameDriver<'a, D: LightDetectInference> {
    detector: &'a D,
    decider: SignalDecider,
    labels: ColorLabels,
    confidence: f32,
    nms_iou_threshold: f32,
    fallback: Fallback,
    last_signal: Option<TrafficSignal>,
}

impl<'a, D: LightDetectInference> FrameDriver<'a, D> {
    pub fn new(detector: &'a D, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            detector,
            decider: SignalDecider::new(&config.decision)?,
            labels: config.detector.labels.clone(),
            confidence: config.detector.confidence,
            nms_iou_threshold: config.detector.nms_iou_threshold,
            fallback: config.fallback,
            last_signal: None,
        })
    }

    /// Detects, suppresses overlapping boxes and converts them to lights.
    /// Invalid boxes are logged and counted, never coerced.
    pub fn detect_lights(&self, frame: &str) -> Result<(Vec<TrafficLight>, usize)> {
        let results = self
            .detector
            .inference_lights(frame, self.confidence)?
            .non_maximum_suppression(self.nms_iou_threshold, self.confidence);

        let mut rejected = 0;
        let mut lights = Vec::with_capacity(results.len());
        for result in &results {
            match self.labels.to_traffic_light(result) {
                Ok(light) => lights.push(light),
                Err(error) => {
                    warn!("Skipping detection {:?} in {}: {}", result, frame, error);
                    rejected += 1;
                }
            }
        }

        debug!("Frame {}: {} traffic lights", frame, lights.len());
        Ok((lights, rejected))
    }

    fn fallback_signal(&self) -> TrafficSignal {
        match self.fallback {
            Fallback::Retain => self.last_signal.unwrap_or_else(|| self.decider.initial_signal()),
            Fallback::PolicyDefault => self.decider.initial_signal(),
        }
    }

    /// Processes one frame, carrying the last decided signal forward.
    pub fn run_frame(&mut self, frame: &str) -> Result<FrameReport> {
        let start = Instant::now();
        let (lights, rejected) = self.detect_lights(frame)?;
        let decision = self.decider.decide(&lights);
        let signal = decision.signal_or(self.fallback_signal());
        let elapsed = start.elapsed();

        if decision.is_decided() {
            self.last_signal = Some(signal);
        }

        Ok(FrameReport {
            name: frame.to_string(),
            overlay: Overlay::for_frame(&lights, &signal),
            decision,
            signal,
            rejected,
            elapsed,
        })
    }

    pub fn run_sequential(&mut self, frames: &[String]) -> Result<BatchSummary> {
        let reports = frames
            .iter()
            .map(|frame| self.run_frame(frame))
            .collect::<Result<Vec<_>>>()?;
        Ok(BatchSummary { reports })
    }

    /// Detects frames in order, then decides them in parallel. Frames do not
    /// see each other, so an empty frame falls back to the policy default.
    pub fn run_parallel(&self, frames: &[String]) -> Result<BatchSummary>
    where
        D: Sync,
    {
        let detected = frames
            .iter()
            .map(|frame| {
                let start = Instant::now();
                let (lights, rejected) = self.detect_lights(frame)?;
                Ok((frame, lights, rejected, start.elapsed()))
            })
            .collect::<Result<Vec<_>>>()?;

        let initial = self.decider.initial_signal();
        let reports = detected
            .into_par_iter()
            .map(|(frame, lights, rejected, detect_time)| {
                let start = Instant::now();
                let decision = self.decider.decide(&lights);
                let signal = decision.signal_or(initial);
                FrameReport {
                    name: frame.clone(),
                    overlay: Overlay::for_frame(&lights, &signal),
                    decision,
                    signal,
                    rejected,
                    elapsed: detect_time + start.elapsed(),
                }
            })
            .collect();

        Ok(BatchSummary { reports })
    }
}
