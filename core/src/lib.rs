#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the facility narrative engine.
//!
//! This crate defines the vocabulary that connects the static facility, the
//! pure channel systems, the frame driver and the rendering adapters. A single
//! [`Progress`] value is mapped to a [`PhaseSample`] and to per-channel values
//! produced by [`Segments`] interpolators. Nothing in this crate reads the
//! clock: every function is a pure mapping of its inputs.

mod easing;
mod segments;

pub use easing::Easing;
pub use segments::{Segment, Segments, Shape};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Wastewater facility narrative.";

/// Normalised scroll position that drives every animated element.
///
/// Values are clamped into `0.0..=1.0` on construction and non-finite input
/// collapses to zero, so every consumer can assume a valid domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Progress(f32);

impl Progress {
    /// Progress at the very top of the scroll container.
    pub const START: Self = Self(0.0);

    /// Progress at the very bottom of the scroll container.
    pub const END: Self = Self(1.0);

    /// Creates a new progress value, clamping it into the unit interval.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    /// Retrieves the clamped scalar.
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }

    /// Returns the progress shifted by `delta`, clamped to the unit interval.
    #[must_use]
    pub fn offset(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }
}

impl From<f32> for Progress {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Progress> for f32 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

/// Narrative stage of the facility story.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Plant operating normally.
    Healthy,
    /// Reactor wall cracks and starts leaking.
    Leak,
    /// Water level and quality deteriorate.
    Degraded,
    /// Sensors are mounted on the reactor.
    SensorsAttached,
    /// The leak is sealed and water recovers.
    CorrectiveAction,
    /// The plant is stable again.
    Resolved,
}

impl Phase {
    /// Every phase in progress order.
    pub const ALL: [Phase; 6] = [
        Phase::Healthy,
        Phase::Leak,
        Phase::Degraded,
        Phase::SensorsAttached,
        Phase::CorrectiveAction,
        Phase::Resolved,
    ];

    /// Progress window occupied by the phase as `(start, end)`.
    ///
    /// Lower edges are inclusive, upper edges exclusive except for
    /// [`Phase::Resolved`], which also owns `1.0`.
    #[must_use]
    pub const fn window(self) -> (f32, f32) {
        match self {
            Phase::Healthy => (0.0, 0.2),
            Phase::Leak => (0.2, 0.4),
            Phase::Degraded => (0.4, 0.6),
            Phase::SensorsAttached => (0.6, 0.75),
            Phase::CorrectiveAction => (0.75, 0.9),
            Phase::Resolved => (0.9, 1.0),
        }
    }

    /// Maps a progress value onto its phase and the sub-progress inside it.
    #[must_use]
    pub fn sample(progress: Progress) -> PhaseSample {
        let p = progress.get();
        let phase = Phase::ALL
            .into_iter()
            .find(|phase| p < phase.window().1)
            .unwrap_or(Phase::Resolved);
        let (start, end) = phase.window();
        let local = ((p - start) / (end - start)).clamp(0.0, 1.0);
        PhaseSample { phase, local }
    }

    /// Stable snake-case label used in logs and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Phase::Healthy => "healthy",
            Phase::Leak => "leak",
            Phase::Degraded => "degraded",
            Phase::SensorsAttached => "sensors_attached",
            Phase::CorrectiveAction => "corrective_action",
            Phase::Resolved => "resolved",
        }
    }
}

/// Phase paired with the normalised position inside its window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PhaseSample {
    /// Phase that owns the sampled progress.
    pub phase: Phase,
    /// Position inside the phase window in `0.0..=1.0`.
    pub local: f32,
}

/// Material keying stage used when tinting tanks.
///
/// Runs on its own edges, independent of [`Phase`]: the plant fades out
/// around the reactor while the sensors attach, then the reactor keeps a calm
/// highlight until the end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum AttentionStage {
    /// Nothing is emphasised.
    Ambient,
    /// Surrounding tanks are fading out.
    Isolating {
        /// Position inside the isolating window.
        progress: f32,
    },
    /// Reactor highlighted while analysis runs.
    Focused,
    /// Reactor stays highlighted while the fix is applied.
    Corrective,
}

impl AttentionStage {
    const ISOLATING_START: f32 = 0.6;
    const FOCUSED_START: f32 = 0.65;
    const CORRECTIVE_START: f32 = 0.75;

    /// Maps progress onto the attention stage.
    #[must_use]
    pub fn at(progress: Progress) -> Self {
        let p = progress.get();
        if p < Self::ISOLATING_START {
            Self::Ambient
        } else if p < Self::FOCUSED_START {
            Self::Isolating {
                progress: (p - Self::ISOLATING_START)
                    / (Self::FOCUSED_START - Self::ISOLATING_START),
            }
        } else if p < Self::CORRECTIVE_START {
            Self::Focused
        } else {
            Self::Corrective
        }
    }

    /// Ordinal of the stage, `0` for ambient through `3` for corrective.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Ambient => 0,
            Self::Isolating { .. } => 1,
            Self::Focused => 2,
            Self::Corrective => 3,
        }
    }
}

/// RGBA color with floating point channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity.
    pub red: f32,
    /// Green channel intensity.
    pub green: f32,
    /// Blue channel intensity.
    pub blue: f32,
    /// Alpha channel intensity.
    pub alpha: f32,
}

impl Color {
    /// Opaque black, used as "no emission".
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            red: ((hex >> 16) & 0xff) as f32 / 255.0,
            green: ((hex >> 8) & 0xff) as f32 / 255.0,
            blue: (hex & 0xff) as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Linearly interpolates every channel towards `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            red: self.red + (other.red - self.red) * t,
            green: self.green + (other.green - self.green) * t,
            blue: self.blue + (other.blue - self.blue) * t,
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }

    /// Multiplies the RGB channels by `factor`, leaving alpha untouched.
    ///
    /// Channels may exceed `1.0`; backends clamp when presenting.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

/// Process role played by a tank in the treatment line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankRole {
    /// Raw water enters the plant here.
    Influent,
    /// Sequencing batch reactor where the leak happens.
    Reactor,
    /// Treated water leaves the plant here.
    Effluent,
}

/// Kind tag attached to every sensor descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Puck-shaped probe mounted flush with the inner wall.
    Probe,
    /// Ultrasonic level sensor seated on the lid.
    Level,
}

/// Colour of the dashboard status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardStatus {
    /// Dashboard hidden; no indicator shown.
    None,
    /// Leak detected.
    Red,
    /// Root-cause analysis running.
    Amber,
    /// System stable.
    Green,
}

/// Text state shown by a dashboard field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeState {
    /// Leak detected / anomaly identified.
    Leak,
    /// Analysis running.
    Analyzing,
    /// System stable.
    Stable,
}

impl NarrativeState {
    /// Every state in the order they appear while scrolling down.
    pub const ALL: [NarrativeState; 3] = [
        NarrativeState::Leak,
        NarrativeState::Analyzing,
        NarrativeState::Stable,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_out_of_range_and_non_finite_input() {
        assert_eq!(Progress::new(-0.5).get(), 0.0);
        assert_eq!(Progress::new(1.7).get(), 1.0);
        assert_eq!(Progress::new(f32::NAN).get(), 0.0);
        assert_eq!(Progress::new(f32::INFINITY).get(), 0.0);
        assert_eq!(Progress::new(0.25).offset(-1.0), Progress::START);
    }

    #[test]
    fn progress_deserialisation_clamps_through_bincode() {
        let bytes = bincode::serialize(&3.5_f32).expect("serialize");
        let restored: Progress = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, Progress::END);
    }

    #[test]
    fn phase_boundaries_are_inclusive_below_and_exclusive_above() {
        let cases = [
            (0.0, Phase::Healthy),
            (0.199, Phase::Healthy),
            (0.2, Phase::Leak),
            (0.4, Phase::Degraded),
            (0.6, Phase::SensorsAttached),
            (0.75, Phase::CorrectiveAction),
            (0.9, Phase::Resolved),
            (1.0, Phase::Resolved),
        ];
        for (p, expected) in cases {
            assert_eq!(Phase::sample(Progress::new(p)).phase, expected, "p = {p}");
        }
    }

    #[test]
    fn phase_local_progress_spans_window() {
        let sample = Phase::sample(Progress::new(0.5));
        assert_eq!(sample.phase, Phase::Degraded);
        assert!((sample.local - 0.5).abs() < 1e-5);

        let last = Phase::sample(Progress::END);
        assert_eq!(last.phase, Phase::Resolved);
        assert!((last.local - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn phase_windows_are_contiguous() {
        let windows: Vec<_> = Phase::ALL.iter().map(|phase| phase.window()).collect();
        assert_eq!(windows[0].0, 0.0);
        assert_eq!(windows[windows.len() - 1].1, 1.0);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn attention_stage_tracks_isolating_sub_progress() {
        assert_eq!(AttentionStage::at(Progress::new(0.3)), AttentionStage::Ambient);
        match AttentionStage::at(Progress::new(0.625)) {
            AttentionStage::Isolating { progress } => assert!((progress - 0.5).abs() < 1e-4),
            other => panic!("unexpected stage {other:?}"),
        }
        assert_eq!(AttentionStage::at(Progress::new(0.7)).ordinal(), 2);
        assert_eq!(AttentionStage::at(Progress::END).ordinal(), 3);
    }

    #[test]
    fn color_from_hex_and_scale_leave_alpha_alone() {
        let color = Color::from_hex(0xff8000);
        assert!((color.red - 1.0).abs() < f32::EPSILON);
        assert!((color.green - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.blue, 0.0);

        let scaled = color.with_alpha(0.4).scale(0.5);
        assert!((scaled.red - 0.5).abs() < f32::EPSILON);
        assert!((scaled.alpha - 0.4).abs() < f32::EPSILON);
    }
}
