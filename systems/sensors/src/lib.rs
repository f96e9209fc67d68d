#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sensor rig: visibility, slide-in pose and attention pulse.

use facility_narrative_core::{Color, SensorKind};
use facility_narrative_world::{SensorDescriptor, SensorId, SensorPose};

/// Emissive colour of a pulsing sensor.
pub const PULSE_COLOR: Color = Color::from_hex(0xffd700);

/// Presentable state of one sensor for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorState {
    /// Identifier of the sensor.
    pub id: SensorId,
    /// Kind tag.
    pub kind: SensorKind,
    /// Whether the sensor is drawn at all.
    pub visible: bool,
    /// Current placement.
    pub pose: SensorPose,
    /// Housing radius.
    pub radius: f32,
    /// Housing thickness.
    pub thickness: f32,
    /// Surface colour.
    pub color: Color,
    /// Emissive colour.
    pub emissive: Color,
    /// Emissive strength; `0` means no glow.
    pub emissive_intensity: f32,
}

/// Drives every sensor from the slide and pulse channels.
#[derive(Clone, Debug)]
pub struct SensorRig {
    descriptors: Vec<SensorDescriptor>,
}

impl SensorRig {
    /// Creates a rig over the sensors mounted in the scene.
    #[must_use]
    pub fn new(descriptors: Vec<SensorDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Number of sensors driven by the rig.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the rig drives no sensors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Resolves every sensor for this frame.
    ///
    /// `slide` is the eased slide fraction and `pulse` the glow intensity.
    /// Without a pulse the emissive is cleared and the colour reset to the
    /// descriptor's base colour.
    #[must_use]
    pub fn update(&self, visible: bool, slide: f32, pulse: f32) -> Vec<SensorState> {
        self.descriptors
            .iter()
            .map(|descriptor| {
                let (emissive, emissive_intensity) = if pulse > 0.0 {
                    (PULSE_COLOR, pulse)
                } else {
                    (Color::BLACK, 0.0)
                };
                SensorState {
                    id: descriptor.id(),
                    kind: descriptor.kind(),
                    visible,
                    pose: descriptor.pose(slide),
                    radius: descriptor.radius(),
                    thickness: descriptor.thickness(),
                    color: descriptor.base_color(),
                    emissive,
                    emissive_intensity,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_narrative_world::{query, standard_tanks, Facility};

    fn rig() -> SensorRig {
        let facility = Facility::build(standard_tanks()).expect("standard facility is valid");
        SensorRig::new(query::sensors(&facility).to_vec())
    }

    #[test]
    fn standard_kit_has_four_probes_and_a_level_sensor() {
        let states = rig().update(true, 1.0, 0.0);
        assert_eq!(states.len(), 5);
        assert_eq!(
            states
                .iter()
                .filter(|state| state.kind == SensorKind::Probe)
                .count(),
            4
        );
    }

    #[test]
    fn pulse_lights_every_sensor() {
        for state in rig().update(true, 1.0, 0.35) {
            assert_eq!(state.emissive, PULSE_COLOR);
            assert_eq!(state.emissive_intensity, 0.35);
        }
    }

    #[test]
    fn pulse_end_restores_base_colour_exactly() {
        let rig = rig();
        let resting = rig.update(true, 1.0, 0.0);
        let _ = rig.update(true, 1.0, 0.7);
        let after = rig.update(true, 1.0, 0.0);
        assert_eq!(resting, after);
        assert!(after
            .iter()
            .all(|state| state.emissive == Color::BLACK && state.emissive_intensity == 0.0));
    }

    #[test]
    fn hidden_sensors_still_report_their_pose() {
        let states = rig().update(false, 0.0, 0.0);
        assert!(states.iter().all(|state| !state.visible));
        assert_ne!(states[0].pose, rig().update(false, 1.0, 0.0)[0].pose);
    }
}
