#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure timeline system mapping scroll progress onto every channel value.
//!
//! [`ChannelSet::evaluate`] is the single entry point: given one progress
//! snapshot it returns the phase, the attention stage, the render-loop
//! channels that drive the scene and the declarative narrative cues. The
//! function holds no state, so scrolling back and forth always reproduces the
//! same values.

mod dashboard;
mod headlines;
pub mod render_loop;
pub mod scroll_states;

pub use dashboard::{subtext_text, title_text, DashboardChannel, FieldOpacities};
pub use headlines::{
    Headline, HeadlineChannel, HEADLINES, HEADLINE_ACCENT, HEADLINE_SETTLED, HEADLINE_TRAVEL,
    INSTRUMENTED, OPENING,
};
pub use scroll_states::{DashboardCue, NarrativeCues};

use facility_narrative_core::{AttentionStage, Phase, PhaseSample, Progress};
use serde::Serialize;

/// Every channel value derived from one progress snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChannelSet {
    /// Progress the set was evaluated at.
    pub progress: Progress,
    /// Narrative phase and local sub-progress.
    pub phase: PhaseSample,
    /// Material keying stage.
    pub attention: AttentionStage,
    /// Declarative story beats.
    pub cues: NarrativeCues,
    /// Leak stream growth in `0.0..=1.0`.
    pub leak_form: f32,
    /// Whether leak streams are drawn at all.
    pub leak_visible: bool,
    /// Crack line alpha, already scaled.
    pub crack_alpha: f32,
    /// Fraction of the water column lost.
    pub water_drop: f32,
    /// Water contamination applied to the rendered water.
    pub water_degradation: f32,
    /// Whether the reactor sensors are shown.
    pub sensors_visible: bool,
    /// Eased sensor slide in `0.0..=1.0`.
    pub sensor_slide: f32,
    /// Emissive intensity of the attach flash.
    pub sensor_pulse: f32,
    /// Dashboard card.
    pub dashboard: DashboardChannel,
    /// Camera blend from wide to close shot.
    pub camera_zoom: f32,
    /// Whether free orbiting is allowed.
    pub orbit_enabled: bool,
    /// Hero headline overlays.
    pub headlines: [HeadlineChannel; 2],
}

impl ChannelSet {
    /// Evaluates every channel at `progress`.
    ///
    /// `manual_override` only affects the declarative camera cue; the render
    /// zoom is always reported so adapters can resume from it.
    #[must_use]
    pub fn evaluate(progress: Progress, manual_override: bool) -> Self {
        let leak_form = render_loop::LEAK_FORM.sample(progress);
        let p = progress.get();
        Self {
            progress,
            phase: Phase::sample(progress),
            attention: AttentionStage::at(progress),
            cues: NarrativeCues::at(progress, manual_override),
            leak_form,
            leak_visible: leak_form > render_loop::LEAK_VISIBLE_THRESHOLD,
            crack_alpha: render_loop::CRACK_OPACITY.sample(progress)
                * render_loop::CRACK_ALPHA_SCALE,
            water_drop: render_loop::WATER_DROP.sample(progress) * render_loop::MAX_WATER_DROP,
            water_degradation: render_loop::WATER_DEGRADATION.sample(progress),
            sensors_visible: p >= render_loop::SENSORS_VISIBLE_FROM,
            sensor_slide: render_loop::SENSOR_SLIDE.sample(progress),
            sensor_pulse: render_loop::SENSOR_PULSE.sample(progress)
                * render_loop::SENSOR_PULSE_PEAK,
            dashboard: DashboardChannel::at(progress),
            camera_zoom: render_loop::CAMERA_ZOOM.sample(progress),
            orbit_enabled: p < render_loop::ORBIT_ENABLED_BELOW,
            headlines: [OPENING.at(progress), INSTRUMENTED.at(progress)],
        }
    }
}

/// Every progress value where some channel changes behaviour, sorted and
/// deduplicated. Used to audit the timeline.
#[must_use]
pub fn channel_edges() -> Vec<f32> {
    let segments = [
        render_loop::LEAK_FORM,
        render_loop::CRACK_OPACITY,
        render_loop::WATER_DROP,
        render_loop::WATER_DEGRADATION,
        render_loop::SENSOR_SLIDE,
        render_loop::SENSOR_PULSE,
        render_loop::CAMERA_ZOOM,
        scroll_states::LEAK_INTENSITY,
        scroll_states::WATER_DEGRADATION,
        scroll_states::WATER_LEVEL_DROP,
        scroll_states::SENSOR_PROGRESS,
        scroll_states::CAMERA_ZOOM,
    ];
    let mut edges: Vec<f32> = segments
        .iter()
        .flat_map(|segments| segments.edges().collect::<Vec<_>>())
        .chain(Phase::ALL.iter().map(|phase| phase.window().0))
        .chain([
            render_loop::DASHBOARD_START,
            render_loop::AMBER_START,
            render_loop::GREEN_START,
        ])
        .collect();
    edges.sort_by(f32::total_cmp);
    edges.dedup();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_narrative_core::DashboardStatus;

    #[test]
    fn evaluation_is_idempotent() {
        let first = ChannelSet::evaluate(Progress::new(0.42), false);
        let second = ChannelSet::evaluate(Progress::new(0.42), false);
        assert_eq!(first, second);
    }

    #[test]
    fn reversal_reproduces_identical_channels() {
        let forward = ChannelSet::evaluate(Progress::new(0.5), false);
        let _ = ChannelSet::evaluate(Progress::new(0.3), false);
        let back = ChannelSet::evaluate(Progress::new(0.5), false);
        assert_eq!(forward, back);
    }

    #[test]
    fn override_only_touches_the_declarative_camera_cue() {
        let free = ChannelSet::evaluate(Progress::new(0.4), false);
        let held = ChannelSet::evaluate(Progress::new(0.4), true);
        assert_eq!(held.cues.camera_zoom, None);
        assert_eq!(free.camera_zoom, held.camera_zoom);
    }

    #[test]
    fn sensors_flash_before_dashboard_appears() {
        let flash = ChannelSet::evaluate(Progress::new(0.6), false);
        assert!(flash.sensors_visible);
        assert!((flash.sensor_pulse - 0.7).abs() < 1e-4);
        assert_eq!(flash.dashboard.status, DashboardStatus::None);

        let after = ChannelSet::evaluate(Progress::new(0.63), false);
        assert_eq!(after.sensor_pulse, 0.0);
        assert!(after.dashboard.visible);
    }

    #[test]
    fn orbit_is_released_only_before_zoom() {
        assert!(ChannelSet::evaluate(Progress::new(0.1), false).orbit_enabled);
        assert!(!ChannelSet::evaluate(Progress::new(0.15), false).orbit_enabled);
    }

    #[test]
    fn channel_edges_are_sorted_and_unique() {
        let edges = channel_edges();
        assert!(edges.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(edges.contains(&0.63));
        assert!(edges.contains(&0.92));
        assert_eq!(edges.first(), Some(&0.0));
        assert_eq!(edges.last(), Some(&1.0));
    }
}
