//! Text output of the `inspect` and `timeline` subcommands.

use std::fmt::Write as _;

use facility_narrative_core::{Color, DashboardStatus, Phase, Progress, TankRole};
use facility_narrative_rendering::Scene;
use facility_narrative_system_timeline::{channel_edges, ChannelSet};
use serde::Serialize;

/// Channel set and applied scene at one progress value.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct InspectReport {
    channels: ChannelSet,
    scene: SceneSummary,
}

impl InspectReport {
    pub(crate) fn new(channels: ChannelSet, scene: &Scene) -> Self {
        Self {
            channels,
            scene: SceneSummary::from_scene(scene),
        }
    }

    /// Pretty-printed JSON.
    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Debug, Serialize)]
struct SceneSummary {
    phase: Phase,
    camera_position: [f32; 3],
    camera_target: [f32; 3],
    orbit_enabled: bool,
    manual_camera: bool,
    leak_segments: usize,
    crack_opacity: Option<f32>,
    dashboard: Option<DashboardSummary>,
    tanks: Vec<TankSummary>,
    sensors_visible: usize,
    headlines: Vec<HeadlineSummary>,
}

#[derive(Clone, Debug, Serialize)]
struct DashboardSummary {
    visible: bool,
    status: DashboardStatus,
    titles: Vec<(&'static str, f32)>,
    subtexts: Vec<(&'static str, f32)>,
}

#[derive(Clone, Debug, Serialize)]
struct TankSummary {
    role: TankRole,
    shell: Color,
    water: Color,
    water_opacity: f32,
    water_level: f32,
}

#[derive(Clone, Debug, Serialize)]
struct HeadlineSummary {
    text: &'static str,
    opacity: f32,
    offset_x: f32,
}

impl SceneSummary {
    fn from_scene(scene: &Scene) -> Self {
        Self {
            phase: scene.phase,
            camera_position: scene.camera.pose.position.to_array(),
            camera_target: scene.camera.pose.target.to_array(),
            orbit_enabled: scene.camera.orbit_enabled,
            manual_camera: scene.camera.manual,
            leak_segments: scene.leak.len(),
            crack_opacity: scene.crack.as_ref().map(|crack| crack.opacity),
            dashboard: scene.dashboard.as_ref().map(|card| DashboardSummary {
                visible: card.visible,
                status: card.status,
                titles: card
                    .fields
                    .iter()
                    .map(|field| (field.title, field.title_opacity))
                    .collect(),
                subtexts: card
                    .fields
                    .iter()
                    .map(|field| (field.subtext, field.subtext_opacity))
                    .collect(),
            }),
            tanks: scene
                .tanks
                .iter()
                .map(|tank| TankSummary {
                    role: tank.role,
                    shell: tank.shell.material.color,
                    water: tank.water.material.color,
                    water_opacity: tank.water.material.opacity,
                    water_level: tank.water.scale.y,
                })
                .collect(),
            sensors_visible: scene
                .sensors
                .iter()
                .filter(|sensor| sensor.mesh.visible)
                .count(),
            headlines: scene
                .headlines
                .iter()
                .map(|headline| HeadlineSummary {
                    text: headline.text,
                    opacity: headline.opacity,
                    offset_x: headline.offset_x,
                })
                .collect(),
        }
    }
}

/// Tabulates the declarative beats next to the render-loop channels at
/// `steps + 1` evenly spaced progress values, followed by every edge.
pub(crate) fn timeline_table(steps: u32) -> String {
    let steps = steps.max(1);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6} {:<18} {:>3} | {:>5} {:>5} | {:>5} {:>5} | {:>5} {:>5} | {:>5} {:>5} | {:<6} {:<6} | {:>5} {:>5}",
        "p", "phase", "att",
        "leak", "form",
        "deg", "deg",
        "drop", "drop",
        "sens", "slide",
        "cue", "card",
        "zoom", "zoom",
    );
    for step in 0..=steps {
        let progress = Progress::new(step as f32 / steps as f32);
        let channels = ChannelSet::evaluate(progress, false);
        let cues = channels.cues;
        let _ = writeln!(
            out,
            "{:>6.3} {:<18} {:>3} | {:>5.2} {:>5.2} | {:>5.2} {:>5.2} | {:>5.2} {:>5.2} | {:>5.2} {:>5.2} | {:<6} {:<6} | {:>5.2} {:>5.2}",
            progress.get(),
            channels.phase.phase.label(),
            channels.attention.ordinal(),
            cues.leak_intensity,
            channels.leak_form,
            cues.water_degradation,
            channels.water_degradation,
            cues.water_level_drop,
            channels.water_drop,
            cues.sensor_progress,
            channels.sensor_slide,
            status_label(cues.dashboard.status),
            status_label(channels.dashboard.status),
            cues.camera_zoom.unwrap_or_default(),
            channels.camera_zoom,
        );
    }
    let edges: Vec<String> = channel_edges()
        .into_iter()
        .map(|edge| format!("{edge:.3}"))
        .collect();
    let _ = writeln!(out, "edges: {}", edges.join(" "));
    out
}

fn status_label(status: DashboardStatus) -> &'static str {
    match status {
        DashboardStatus::None => "-",
        DashboardStatus::Red => "red",
        DashboardStatus::Amber => "amber",
        DashboardStatus::Green => "green",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_lists_every_step_and_the_edges() {
        let table = timeline_table(10);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 1 + 11 + 1);
        assert!(lines[1].trim_start().starts_with("0.000"));
        assert!(lines[11].trim_start().starts_with("1.000"));
        assert!(lines[11].contains("green"));
        assert!(lines[12].starts_with("edges: 0.000"));
    }

    #[test]
    fn zero_steps_still_covers_both_ends() {
        let table = timeline_table(0);
        assert_eq!(table.lines().count(), 1 + 2 + 1);
    }
}
