//! Free orbit around the scripted camera pose.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::CameraPose;

const DRAG_RADIANS_PER_PIXEL: f32 = 0.005;
const ZOOM_PER_LINE: f32 = 0.08;
const MIN_POLAR: f32 = 0.05;

/// Bounds of the orbit controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    /// Closest the eye may get to the target.
    pub min_distance: f32,
    /// Farthest the eye may get from the target.
    pub max_distance: f32,
    /// Largest angle between the view ray and the vertical axis.
    pub max_polar: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 9.0,
            max_distance: 30.0,
            max_polar: PI / 1.8,
        }
    }
}

/// Accumulated user orbit, applied on top of the scripted pose.
///
/// Panning is not supported; the target always stays where the script put
/// it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitState {
    yaw: f32,
    pitch: f32,
    zoom: f32,
}

impl OrbitState {
    /// Accumulates a mouse drag and a wheel zoom.
    pub fn accumulate(&mut self, drag: Vec2, zoom_lines: f32) {
        self.yaw -= drag.x * DRAG_RADIANS_PER_PIXEL;
        self.pitch -= drag.y * DRAG_RADIANS_PER_PIXEL;
        self.zoom += zoom_lines * ZOOM_PER_LINE;
    }

    /// Forgets every accumulated orbit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether nothing has been accumulated.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Eye and target after applying the orbit to `pose`.
    ///
    /// Distance limits only bind once the user zooms; a scripted close-up
    /// nearer than the minimum distance is shown as is.
    #[must_use]
    pub fn view(&self, pose: CameraPose, limits: OrbitLimits) -> CameraPose {
        if self.is_neutral() {
            return pose;
        }
        let offset = pose.position - pose.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return pose;
        }

        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);
        let polar = (polar + self.pitch).clamp(MIN_POLAR, limits.max_polar);
        let azimuth = azimuth + self.yaw;
        let distance = (radius * (1.0 - self.zoom)).clamp(
            radius.min(limits.min_distance),
            radius.max(limits.max_distance),
        );

        let direction = Vec3::new(
            polar.sin() * azimuth.sin(),
            polar.cos(),
            polar.sin() * azimuth.cos(),
        );
        CameraPose {
            position: pose.target + direction * distance,
            target: pose.target,
        }
    }
}
