#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic leak geometry generator.
//!
//! Two water streams fall from the crack tip as chains of capsules. The chain
//! is a pure function of the form fraction; the optional [`FlowDecorator`]
//! layers a time-driven running-water effect on top without feeding anything
//! back into the generator.

mod flow;

pub use flow::FlowDecorator;

use std::f32::consts::PI;

use glam::Vec3;

/// Capsule radius of every leak segment.
pub const SEGMENT_RADIUS: f32 = 0.055;

const SEGMENT_OVERLAP: f32 = 0.02;
const MIN_SEGMENT_SPAN: f32 = 0.01;
const ARC_EXPONENT: f32 = 1.09;
const SPREAD_ANGLE: f32 = PI / 8.0;

/// Shape parameters of one stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamProfile {
    /// Initial outward push away from the wall.
    pub outward: f32,
    /// Sideways drift gained while falling.
    pub sideways: f32,
    /// Number of sample points along the stream.
    pub samples: usize,
    /// Fraction of the leak length the stream falls.
    pub fall: f32,
}

/// The two streams leaving the crack.
pub const STREAMS: [StreamProfile; 2] = [
    StreamProfile {
        outward: 0.15,
        sideways: -0.10,
        samples: 18,
        fall: 0.72,
    },
    StreamProfile {
        outward: 0.14,
        sideways: 0.12,
        samples: 20,
        fall: 0.68,
    },
];

/// Form fraction at or below which the leak is hidden.
pub const HIDDEN_BELOW: f32 = 0.01;

/// One capsule of a leak stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeakSegment {
    /// Index of the stream the capsule belongs to.
    pub stream: usize,
    /// Sample index along the stream, starting at `1`.
    pub index: usize,
    /// Position along the stream in `0.0..=1.0`.
    pub fraction: f32,
    /// Capsule centre.
    pub center: Vec3,
    /// Point the capsule axis is aimed at.
    pub target: Vec3,
    /// Capsule length including overlap with its neighbours.
    pub length: f32,
    /// Opacity before flow modulation.
    pub opacity: f32,
}

impl LeakSegment {
    /// Both ends of the capsule axis.
    #[must_use]
    pub fn endpoints(&self) -> (Vec3, Vec3) {
        let axis = (self.target - self.center).normalize_or_zero();
        let half = axis * (self.length / 2.0);
        (self.center - half, self.center + half)
    }
}

/// Builds both streams for `form`.
///
/// Samples past the form fraction are omitted, as are spans too short to
/// orient a capsule.
#[must_use]
pub fn generate(origin: Vec3, leak_length: f32, form: f32) -> Vec<LeakSegment> {
    let mut segments = Vec::new();
    for (stream, profile) in STREAMS.iter().enumerate() {
        let mut previous = origin;
        for index in 1..profile.samples {
            let fraction = index as f32 / (profile.samples - 1) as f32;
            if fraction > form {
                break;
            }
            let arc = fraction.powf(ARC_EXPONENT);
            let local = origin
                + Vec3::new(
                    profile.outward * (0.5 - arc) + profile.sideways * arc * arc,
                    -arc * leak_length * profile.fall,
                    SPREAD_ANGLE.sin() * profile.outward * (1.0 - arc),
                );
            let span = local.distance(previous);
            if span > MIN_SEGMENT_SPAN {
                segments.push(LeakSegment {
                    stream,
                    index,
                    fraction,
                    center: previous.lerp(local, 0.5),
                    target: local,
                    length: span + SEGMENT_OVERLAP,
                    opacity: 0.68 + 0.22 * (fraction - 0.1).max(0.0),
                });
            }
            previous = local;
        }
    }
    segments
}

/// When the generator rebuilds its capsule chain.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RegenerationPolicy {
    /// Rebuild on every update. Fully deterministic.
    #[default]
    Always,
    /// Keep the chain unless the form moved by more than the tolerance, or
    /// the leak just became fully formed.
    Threshold(f32),
}

impl RegenerationPolicy {
    /// Tolerance used by the threshold policy.
    pub const DEFAULT_TOLERANCE: f32 = 0.05;
}

/// Owns the capsule chain and rebuilds it as the form fraction changes.
#[derive(Clone, Debug)]
pub struct LeakGenerator {
    origin: Vec3,
    leak_length: f32,
    policy: RegenerationPolicy,
    segments: Vec<LeakSegment>,
    built_form: f32,
    fully_formed: bool,
}

impl LeakGenerator {
    /// Creates a generator anchored at the crack tip.
    #[must_use]
    pub fn new(origin: Vec3, leak_length: f32) -> Self {
        Self {
            origin,
            leak_length,
            policy: RegenerationPolicy::default(),
            segments: Vec::new(),
            built_form: 0.0,
            fully_formed: false,
        }
    }

    /// Selects the regeneration policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RegenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current capsule chain.
    #[must_use]
    pub fn segments(&self) -> &[LeakSegment] {
        &self.segments
    }

    /// Form fraction the current chain was built for.
    #[must_use]
    pub fn built_form(&self) -> f32 {
        self.built_form
    }

    /// Vertical reach of a fully formed leak.
    #[must_use]
    pub fn leak_length(&self) -> f32 {
        self.leak_length
    }

    /// Brings the chain in line with `form`; returns whether it was rebuilt.
    pub fn update(&mut self, form: f32) -> bool {
        if form <= HIDDEN_BELOW {
            let had_segments = !self.segments.is_empty();
            self.segments.clear();
            self.built_form = 0.0;
            self.fully_formed = false;
            return had_segments;
        }

        let rebuild = match self.policy {
            RegenerationPolicy::Always => true,
            RegenerationPolicy::Threshold(tolerance) => {
                self.segments.is_empty()
                    || (form - self.built_form).abs() > tolerance
                    || (!self.fully_formed && form >= 1.0)
            }
        };
        if !rebuild {
            return false;
        }

        self.segments = generate(self.origin, self.leak_length, form);
        self.built_form = form;
        self.fully_formed = form >= 1.0;
        tracing::trace!(form, segments = self.segments.len(), "leak rebuilt");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vec3 = Vec3::new(9.1, 1.45, 1.0);
    const LENGTH: f32 = 2.295;

    #[test]
    fn fully_formed_leak_has_every_capsule() {
        let segments = generate(ORIGIN, LENGTH, 1.0);
        let first = segments.iter().filter(|s| s.stream == 0).count();
        let second = segments.iter().filter(|s| s.stream == 1).count();
        assert_eq!(first, 17);
        assert_eq!(second, 19);
    }

    #[test]
    fn partial_form_truncates_each_stream() {
        let segments = generate(ORIGIN, LENGTH, 0.5);
        assert!(segments.iter().all(|segment| segment.fraction <= 0.5));
        assert!(!segments.is_empty());
        assert!(segments.len() < generate(ORIGIN, LENGTH, 1.0).len());
    }

    #[test]
    fn streams_fall_below_the_crack() {
        let segments = generate(ORIGIN, LENGTH, 1.0);
        let lowest = segments
            .iter()
            .map(|segment| segment.target.y)
            .fold(f32::INFINITY, f32::min);
        assert!((lowest - (ORIGIN.y - LENGTH * 0.72)).abs() < 1e-4);
        assert!(segments
            .iter()
            .all(|segment| segment.length > MIN_SEGMENT_SPAN));
    }

    #[test]
    fn opacity_thickens_towards_the_tail() {
        let segments = generate(ORIGIN, LENGTH, 1.0);
        let head = segments.first().expect("segments exist");
        let tail = segments
            .iter()
            .filter(|segment| segment.stream == 0)
            .last()
            .expect("stream 0 has segments");
        assert!((head.opacity - 0.68).abs() < 1e-6);
        assert!((tail.opacity - (0.68 + 0.22 * 0.9)).abs() < 1e-5);
    }

    #[test]
    fn endpoints_straddle_the_centre() {
        let segment = generate(ORIGIN, LENGTH, 1.0)[3];
        let (start, end) = segment.endpoints();
        assert!((start.distance(end) - segment.length).abs() < 1e-4);
        assert!((start.lerp(end, 0.5) - segment.center).length() < 1e-5);
    }

    #[test]
    fn hidden_form_clears_the_chain() {
        let mut generator = LeakGenerator::new(ORIGIN, LENGTH);
        assert!(generator.update(0.8));
        assert!(!generator.segments().is_empty());
        assert!(generator.update(0.005));
        assert!(generator.segments().is_empty());
        assert!(!generator.update(0.0));
    }

    #[test]
    fn threshold_policy_skips_small_changes_but_completes_formation() {
        let mut generator = LeakGenerator::new(ORIGIN, LENGTH)
            .with_policy(RegenerationPolicy::Threshold(RegenerationPolicy::DEFAULT_TOLERANCE));
        assert!(generator.update(0.5));
        assert!(!generator.update(0.53));
        assert_eq!(generator.built_form(), 0.5);
        assert!(generator.update(0.6));
        assert!(generator.update(1.0));
        assert!(!generator.update(1.0));
    }

    #[test]
    fn always_policy_matches_direct_generation() {
        let mut generator = LeakGenerator::new(ORIGIN, LENGTH);
        let _ = generator.update(0.3);
        let _ = generator.update(0.7);
        let _ = generator.update(0.3);
        assert_eq!(generator.segments(), generate(ORIGIN, LENGTH, 0.3).as_slice());
    }
}
