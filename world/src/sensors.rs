//! Sensor descriptors mounted on the reactor.

use std::f32::consts::PI;

use facility_narrative_core::{Color, SensorKind};
use glam::Vec3;

use crate::TankBody;

/// Non-emissive base colour shared by every sensor housing.
pub(crate) const SENSOR_BASE_COLOR: Color = Color::from_hex(0x4a5560);

const PROBE_ANGLES: [f32; 4] = [PI * 0.21, PI * 0.23, PI * 0.21, PI * 0.23];
const PROBE_DEPTHS: [f32; 4] = [0.26, 0.26, 0.30, 0.30];
const PROBE_RADIUS: f32 = 0.038;
const PROBE_THICKNESS: f32 = 0.012;
const PROBE_STANDOFF: f32 = 0.5;
const PROBE_WALL_CLEARANCE: f32 = 0.005;

const LEVEL_RADIUS: f32 = 0.092;
const LEVEL_HEIGHT: f32 = 0.14;
const LEVEL_LID_OFFSET: f32 = 0.13;
const LEVEL_HOVER: f32 = 0.55;
const LEVEL_SEAT: f32 = 0.07 + PROBE_THICKNESS;

/// Stable identifier of a sensor within its tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorId(u8);

impl SensorId {
    /// Creates a new identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the raw identifier.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// How a sensor travels between its stowed and mounted poses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mount {
    /// Slides radially towards the tank wall at a fixed height.
    Wall {
        /// Axis of the host tank.
        axis_x: f32,
        /// Angle around the tank axis, in radians.
        angle: f32,
        /// Fixed elevation of the sensor.
        height: f32,
        /// Radial distance while stowed.
        stowed_distance: f32,
        /// Radial distance once mounted.
        mounted_distance: f32,
    },
    /// Descends vertically onto the lid.
    Lid {
        /// Axis of the host tank.
        axis_x: f32,
        /// Elevation while stowed.
        stowed_height: f32,
        /// Elevation once seated.
        mounted_height: f32,
    },
}

/// Resolved sensor placement for a given slide fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorPose {
    /// World-space centre of the sensor housing.
    pub position: Vec3,
    /// Rotation around the vertical axis, in radians.
    pub heading: f32,
}

/// Immutable description of a sensor, created once at scene setup.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorDescriptor {
    id: SensorId,
    kind: SensorKind,
    mount: Mount,
    base_color: Color,
    radius: f32,
    thickness: f32,
}

impl SensorDescriptor {
    /// Identifier of the sensor.
    #[must_use]
    pub const fn id(&self) -> SensorId {
        self.id
    }

    /// Kind tag of the sensor.
    #[must_use]
    pub const fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Travel description of the sensor.
    #[must_use]
    pub const fn mount(&self) -> Mount {
        self.mount
    }

    /// Colour to restore whenever the sensor is not glowing.
    #[must_use]
    pub const fn base_color(&self) -> Color {
        self.base_color
    }

    /// Housing radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Housing thickness along its own axis.
    #[must_use]
    pub const fn thickness(&self) -> f32 {
        self.thickness
    }

    /// Pose at `slide`, where `0` is stowed and `1` is mounted.
    ///
    /// The slide fraction is expected to be eased already; this function
    /// interpolates linearly between the two poses.
    #[must_use]
    pub fn pose(&self, slide: f32) -> SensorPose {
        let slide = slide.clamp(0.0, 1.0);
        match self.mount {
            Mount::Wall {
                axis_x,
                angle,
                height,
                stowed_distance,
                mounted_distance,
            } => {
                let distance = stowed_distance + (mounted_distance - stowed_distance) * slide;
                SensorPose {
                    position: Vec3::new(
                        axis_x + angle.cos() * distance,
                        height,
                        angle.sin() * distance,
                    ),
                    heading: angle,
                }
            }
            Mount::Lid {
                axis_x,
                stowed_height,
                mounted_height,
            } => SensorPose {
                position: Vec3::new(
                    axis_x,
                    stowed_height + (mounted_height - stowed_height) * slide,
                    0.0,
                ),
                heading: 0.0,
            },
        }
    }
}

/// Four wall probes in a tight 2x2 grid plus one lid-mounted level sensor.
pub(crate) fn reactor_kit(body: &TankBody) -> Vec<SensorDescriptor> {
    let surface = body.water_surface_y();
    let mut kit: Vec<SensorDescriptor> = PROBE_ANGLES
        .iter()
        .zip(PROBE_DEPTHS)
        .enumerate()
        .map(|(index, (angle, depth))| SensorDescriptor {
            id: SensorId::new(index as u8),
            kind: SensorKind::Probe,
            mount: Mount::Wall {
                axis_x: body.x(),
                angle: *angle,
                height: surface - body.water_height() * depth,
                stowed_distance: body.radius() + PROBE_STANDOFF,
                mounted_distance: body.radius()
                    - PROBE_THICKNESS / 2.0
                    - PROBE_WALL_CLEARANCE,
            },
            base_color: SENSOR_BASE_COLOR,
            radius: PROBE_RADIUS,
            thickness: PROBE_THICKNESS,
        })
        .collect();

    let lid_y = body.height() + LEVEL_LID_OFFSET;
    kit.push(SensorDescriptor {
        id: SensorId::new(PROBE_ANGLES.len() as u8),
        kind: SensorKind::Level,
        mount: Mount::Lid {
            axis_x: body.x(),
            stowed_height: lid_y + LEVEL_HOVER,
            mounted_height: lid_y + LEVEL_SEAT,
        },
        base_color: SENSOR_BASE_COLOR,
        radius: LEVEL_RADIUS,
        thickness: LEVEL_HEIGHT,
    });
    kit
}
