//! Geometry derived from the assembled facility.

use std::f32::consts::PI;

use glam::Vec3;

use crate::{query, Facility, TANK_BASE_Y};

/// Angle around the reactor axis where the wall cracks.
pub const TANK_CURVE_ANGLE: f32 = PI / 8.0;

/// Number of points along the crack polyline.
pub const CRACK_POINTS: usize = 13;

const CRACK_LENGTH: f32 = 0.25;
const CRACK_SURFACE_OFFSET: f32 = 0.012;
const CRACK_ELEVATION: f32 = 0.30;
const LEAK_LENGTH_FACTOR: f32 = 0.85;

const WIDE_POSITION: Vec3 = Vec3::new(15.0, 11.0, 20.0);
const WIDE_TARGET: Vec3 = Vec3::new(0.0, 2.0, 0.0);
const CLOSE_STANDOFF: f32 = 2.2;
const CLOSE_AZIMUTH: f32 = 0.18;
const CLOSE_RISE: f32 = 3.8;
const CLOSE_PULLBACK: f32 = 7.0;
const CRACK_MID_RISE: f32 = 0.06;

/// Camera position paired with its look-at target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Eye position.
    pub position: Vec3,
    /// Look-at target.
    pub target: Vec3,
}

/// The two framings the camera blends between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraAnchors {
    /// Establishing shot of the whole treatment line.
    pub wide: Shot,
    /// Close-up of the crack on the reactor wall.
    pub close: Shot,
    /// Point on the reactor midsection the target is pulled towards mid-zoom.
    pub reactor_bias: Vec3,
}

/// Geometry derived once from the facility before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchors {
    crack_path: Vec<Vec3>,
    leak_origin: Vec3,
    leak_length: f32,
    camera: CameraAnchors,
}

impl Anchors {
    /// Derives crack, leak and camera anchors from the reactor geometry.
    #[must_use]
    pub fn derive(facility: &Facility) -> Self {
        let reactor = query::reactor(facility).body();
        let radius = reactor.radius() + CRACK_SURFACE_OFFSET;
        let base_y = reactor.height() / 3.0 + CRACK_ELEVATION;

        let crack_path: Vec<Vec3> = (0..CRACK_POINTS)
            .map(|index| {
                let fraction = index as f32 / (CRACK_POINTS - 1) as f32;
                let y = base_y + fraction * CRACK_LENGTH;
                let wobble = (0.10 + 0.09 * fraction)
                    * (fraction * PI * 3.1 + 0.4).sin()
                    * (1.0 - fraction * 0.8);
                let angle = TANK_CURVE_ANGLE + 0.03 * fraction + wobble * 0.13;
                Vec3::new(
                    reactor.x() + angle.cos() * radius,
                    y,
                    angle.sin() * radius,
                )
            })
            .collect();
        let leak_origin = crack_path
            .last()
            .copied()
            .unwrap_or(Vec3::new(reactor.x(), base_y, 0.0));
        let leak_length = reactor.height() * LEAK_LENGTH_FACTOR;

        let crack_mid = Vec3::new(
            reactor.x() + TANK_CURVE_ANGLE.cos() * reactor.radius(),
            base_y + CRACK_MID_RISE,
            TANK_CURVE_ANGLE.sin() * reactor.radius(),
        );
        let close = Shot {
            position: crack_mid
                + Vec3::new(
                    CLOSE_STANDOFF * CLOSE_AZIMUTH.sin(),
                    CLOSE_RISE,
                    CLOSE_STANDOFF * CLOSE_AZIMUTH.cos() + CLOSE_PULLBACK,
                ),
            target: crack_mid,
        };
        let camera = CameraAnchors {
            wide: Shot {
                position: WIDE_POSITION,
                target: WIDE_TARGET,
            },
            close,
            reactor_bias: Vec3::new(reactor.x(), reactor.height() / 2.0 + TANK_BASE_Y, 0.0),
        };

        tracing::debug!(
            ?leak_origin,
            leak_length,
            close_position = ?camera.close.position,
            "anchors derived"
        );

        Self {
            crack_path,
            leak_origin,
            leak_length,
            camera,
        }
    }

    /// Polyline traced by the crack on the reactor wall.
    #[must_use]
    pub fn crack_path(&self) -> &[Vec3] {
        &self.crack_path
    }

    /// Tip of the crack where both leak streams start.
    #[must_use]
    pub const fn leak_origin(&self) -> Vec3 {
        self.leak_origin
    }

    /// Vertical reach of a fully formed leak.
    #[must_use]
    pub const fn leak_length(&self) -> f32 {
        self.leak_length
    }

    /// Camera framings.
    #[must_use]
    pub const fn camera(&self) -> CameraAnchors {
        self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_tanks;

    fn anchors() -> Anchors {
        let facility = Facility::build(standard_tanks()).expect("standard layout is valid");
        Anchors::derive(&facility)
    }

    #[test]
    fn crack_climbs_the_reactor_wall() {
        let anchors = anchors();
        let path = anchors.crack_path();
        assert_eq!(path.len(), CRACK_POINTS);

        let base_y = 2.7 / 3.0 + 0.30;
        assert!((path[0].y - base_y).abs() < 1e-5);
        assert!((path[CRACK_POINTS - 1].y - (base_y + 0.25)).abs() < 1e-5);
        for point in path {
            let radial = Vec3::new(point.x - 6.7, 0.0, point.z).length();
            assert!((radial - 2.612).abs() < 1e-4);
        }
    }

    #[test]
    fn leak_starts_at_crack_tip() {
        let anchors = anchors();
        assert_eq!(Some(&anchors.leak_origin()), anchors.crack_path().last());
        assert!((anchors.leak_length() - 2.7 * 0.85).abs() < 1e-5);
    }

    #[test]
    fn close_shot_looks_at_crack_midpoint() {
        let camera = anchors().camera();
        assert_eq!(camera.wide.position, WIDE_POSITION);
        assert_eq!(camera.wide.target, WIDE_TARGET);

        let mid = camera.close.target;
        assert!((mid.x - (6.7 + (PI / 8.0).cos() * 2.6)).abs() < 1e-4);
        let offset = camera.close.position - mid;
        assert!((offset.y - 3.8).abs() < 1e-5);
        assert!(offset.z > 7.0);
        assert!((camera.reactor_bias.y - (1.35 + 0.15)).abs() < 1e-5);
    }
}
