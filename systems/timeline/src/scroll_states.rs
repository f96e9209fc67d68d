//! Declarative narrative channels.
//!
//! These name the story beats on a coarser grid than the render loop. They
//! are evaluated every frame and reported alongside the render channels, but
//! nothing in the scene is driven by them directly.

use facility_narrative_core::{DashboardStatus, Easing, Progress, Segment, Segments};
use serde::Serialize;

/// How strongly the reactor is leaking.
pub const LEAK_INTENSITY: Segments = Segments::new(
    0.0,
    &[
        Segment::ramp(0.2, 0.4, 0.0, 1.0, Easing::InOut),
        Segment::hold(0.4, 0.75, 1.0),
        Segment::ramp(0.75, 0.9, 1.0, 0.0, Easing::InOut),
    ],
);

/// Water colour shift towards the contaminated tone.
pub const WATER_DEGRADATION: Segments = Segments::new(
    0.0,
    &[Segment::ramp(0.4, 0.6, 0.0, 1.0, Easing::InOut)],
);

/// Water level loss.
pub const WATER_LEVEL_DROP: Segments = Segments::new(
    0.0,
    &[Segment::ramp(0.4, 0.6, 0.0, 1.0, Easing::InOut)],
);

/// Sensor attachment.
pub const SENSOR_PROGRESS: Segments = Segments::new(
    0.0,
    &[Segment::ramp(0.6, 0.7, 0.0, 1.0, Easing::InOut)],
);

/// Zoom towards the leak.
pub const CAMERA_ZOOM: Segments = Segments::new(
    0.0,
    &[Segment::ramp(0.2, 0.65, 0.0, 1.0, Easing::InOut)],
);

const DASHBOARD_WINDOW: (f32, f32) = (0.6, 0.9);
const ANALYZING_FROM: f32 = 0.7;

/// Declarative dashboard beat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardCue {
    /// Whether the dashboard should be on screen.
    pub visible: bool,
    /// Indicator colour implied by the beat.
    pub status: DashboardStatus,
}

/// Maps progress onto the declarative dashboard beat.
#[must_use]
pub fn dashboard(progress: Progress) -> DashboardCue {
    let p = progress.get();
    if p < DASHBOARD_WINDOW.0 || p >= DASHBOARD_WINDOW.1 {
        return DashboardCue {
            visible: false,
            status: DashboardStatus::None,
        };
    }
    let status = if p >= ANALYZING_FROM {
        DashboardStatus::Amber
    } else {
        DashboardStatus::Red
    };
    DashboardCue {
        visible: true,
        status,
    }
}

/// Zoom fraction for the declarative camera, or `None` while the user holds
/// the camera.
#[must_use]
pub fn camera(progress: Progress, manual_override: bool) -> Option<f32> {
    if manual_override {
        None
    } else {
        Some(CAMERA_ZOOM.sample(progress))
    }
}

/// Every declarative beat evaluated at one progress value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NarrativeCues {
    /// Leak intensity in `0.0..=1.0`.
    pub leak_intensity: f32,
    /// Water contamination in `0.0..=1.0`.
    pub water_degradation: f32,
    /// Water level loss in `0.0..=1.0`.
    pub water_level_drop: f32,
    /// Sensor attachment in `0.0..=1.0`.
    pub sensor_progress: f32,
    /// Dashboard beat.
    pub dashboard: DashboardCue,
    /// Camera zoom, absent under manual override.
    pub camera_zoom: Option<f32>,
}

impl NarrativeCues {
    /// Evaluates every declarative channel.
    #[must_use]
    pub fn at(progress: Progress, manual_override: bool) -> Self {
        Self {
            leak_intensity: LEAK_INTENSITY.sample(progress),
            water_degradation: WATER_DEGRADATION.sample(progress),
            water_level_drop: WATER_LEVEL_DROP.sample(progress),
            sensor_progress: SENSOR_PROGRESS.sample(progress),
            dashboard: dashboard(progress),
            camera_zoom: camera(progress, manual_override),
        }
    }
}
