use facility_narrative_core::{DashboardStatus, Easing, NarrativeState, Progress, Segment, Segments};
use serde::Serialize;

use crate::render_loop::{AMBER_START, DASHBOARD_START, GREEN_START};

const LEAK_OPACITY: Segments = Segments::new(
    1.0,
    &[Segment::ramp(0.68, 0.78, 1.0, 0.0, Easing::Linear)],
);

const ANALYZING_OPACITY: Segments = Segments::new(
    0.0,
    &[
        Segment::ramp(0.68, 0.78, 0.0, 1.0, Easing::Linear),
        Segment::hold(0.78, 0.8, 1.0),
        Segment::ramp(0.8, 0.9, 1.0, 0.0, Easing::Linear),
    ],
);

const STABLE_OPACITY: Segments = Segments::new(
    0.0,
    &[Segment::ramp(0.8, 0.9, 0.0, 1.0, Easing::Linear)],
);

/// Opacity of every text variant of one dashboard field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FieldOpacities {
    /// Leak-detected variant.
    pub leak: f32,
    /// Analysis variant.
    pub analyzing: f32,
    /// Stable variant.
    pub stable: f32,
}

impl FieldOpacities {
    /// Cross-fade of one field at `progress`.
    #[must_use]
    pub fn at(progress: Progress) -> Self {
        Self {
            leak: LEAK_OPACITY.sample(progress),
            analyzing: ANALYZING_OPACITY.sample(progress),
            stable: STABLE_OPACITY.sample(progress),
        }
    }

    /// Opacity of the variant for `state`.
    #[must_use]
    pub fn get(&self, state: NarrativeState) -> f32 {
        match state {
            NarrativeState::Leak => self.leak,
            NarrativeState::Analyzing => self.analyzing,
            NarrativeState::Stable => self.stable,
        }
    }

    /// Variant that is currently fully opaque, if the field is not mid-fade.
    #[must_use]
    pub fn settled(&self) -> Option<NarrativeState> {
        NarrativeState::ALL
            .into_iter()
            .find(|state| (self.get(*state) - 1.0).abs() <= f32::EPSILON)
    }
}

/// Dashboard card state at one progress value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DashboardChannel {
    /// Whether the card is on screen.
    pub visible: bool,
    /// Indicator colour; [`DashboardStatus::None`] while hidden.
    pub status: DashboardStatus,
    /// Title cross-fade.
    pub title: FieldOpacities,
    /// Subtext cross-fade.
    pub subtext: FieldOpacities,
}

impl DashboardChannel {
    /// Re-evaluates the card from scratch; nothing is latched between calls.
    #[must_use]
    pub fn at(progress: Progress) -> Self {
        let p = progress.get();
        let visible = p >= DASHBOARD_START;
        let status = if !visible {
            DashboardStatus::None
        } else if p >= GREEN_START {
            DashboardStatus::Green
        } else if p >= AMBER_START {
            DashboardStatus::Amber
        } else {
            DashboardStatus::Red
        };
        Self {
            visible,
            status,
            title: FieldOpacities::at(progress),
            subtext: FieldOpacities::at(progress),
        }
    }
}

/// Title copy for a dashboard state.
#[must_use]
pub const fn title_text(state: NarrativeState) -> &'static str {
    match state {
        NarrativeState::Leak => "Leak detected - Reactor Tank",
        NarrativeState::Analyzing => "Analyzing reactor",
        NarrativeState::Stable => "System stable",
    }
}

/// Subtext copy for a dashboard state.
#[must_use]
pub const fn subtext_text(state: NarrativeState) -> &'static str {
    match state {
        NarrativeState::Leak => "Anomaly identified from sensor data",
        NarrativeState::Analyzing => "AI-driven root cause analysis",
        NarrativeState::Stable => "Reactor sealed, water quality restored",
    }
}
