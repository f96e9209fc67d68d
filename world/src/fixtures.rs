//! Static decorations around the tanks: platforms, pipework, beams.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::{Tank, TANK_BASE_Y};

const PLATFORM_MARGIN: f32 = 0.4;
const PLATFORM_HEIGHT: f32 = 0.3;
const PROCESS_PIPE_COUNT: usize = 3;
const PROCESS_PIPE_OFFSET: f32 = 0.58;
const PROCESS_PIPE_RADIUS: f32 = 0.13;
const PROCESS_PIPE_BASE: f32 = 0.21;
const PROCESS_PIPE_OVERHANG: f32 = 1.21;
const AERATION_RING_FACTOR: f32 = 0.8;
const AERATION_RING_TUBE: f32 = 0.09;
const AERATION_RING_Y: f32 = 0.47;
const BEAMS_PER_TANK: usize = 3;
const BEAM_INSET: f32 = 0.7;
const BEAM_Y: f32 = -0.4;
const INLET_LENGTH: f32 = 2.3;
const OUTLET_LENGTH: f32 = 2.0;

/// Static mesh created once at setup and never destroyed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fixture {
    /// Beige base slab under a tank.
    Platform {
        /// Slab centre.
        center: Vec3,
        /// Slab radius.
        radius: f32,
        /// Slab thickness.
        height: f32,
    },
    /// Vertical steel pipe running through the reactor.
    ProcessPipe {
        /// Pipe centre.
        center: Vec3,
        /// Pipe radius.
        radius: f32,
        /// Pipe length.
        length: f32,
    },
    /// Horizontal water-filled pipe along the treatment line.
    Conduit {
        /// Pipe centre.
        center: Vec3,
        /// Pipe length along the x axis.
        length: f32,
        /// Steel wall radius.
        outer_radius: f32,
        /// Water core radius.
        inner_radius: f32,
    },
    /// Aeration torus lying on the reactor floor.
    AerationRing {
        /// Torus centre.
        center: Vec3,
        /// Major radius.
        radius: f32,
        /// Tube radius.
        tube: f32,
    },
    /// Support beam below a platform.
    Beam {
        /// Beam centre.
        center: Vec3,
        /// Top radius.
        top_radius: f32,
        /// Bottom radius.
        bottom_radius: f32,
        /// Beam length.
        height: f32,
    },
}

pub(crate) fn derive(tanks: &[Tank], reactor: usize) -> Vec<Fixture> {
    let mut fixtures = Vec::new();

    for tank in tanks {
        let body = tank.body();
        fixtures.push(Fixture::Platform {
            center: Vec3::new(body.x(), PLATFORM_HEIGHT / 2.0, 0.0),
            radius: body.radius() + PLATFORM_MARGIN,
            height: PLATFORM_HEIGHT,
        });
    }

    if let Some(tank) = tanks.get(reactor) {
        let body = tank.body();
        let top = body.height() + PROCESS_PIPE_OVERHANG;
        let length = top - PROCESS_PIPE_BASE;
        for index in 0..PROCESS_PIPE_COUNT {
            let phi = index as f32 * TAU / PROCESS_PIPE_COUNT as f32;
            fixtures.push(Fixture::ProcessPipe {
                center: Vec3::new(
                    body.x() + phi.cos() * PROCESS_PIPE_OFFSET,
                    PROCESS_PIPE_BASE + length / 2.0,
                    phi.sin() * PROCESS_PIPE_OFFSET,
                ),
                radius: PROCESS_PIPE_RADIUS,
                length,
            });
        }
        fixtures.push(Fixture::AerationRing {
            center: Vec3::new(body.x(), AERATION_RING_Y, 0.0),
            radius: body.radius() * AERATION_RING_FACTOR,
            tube: AERATION_RING_TUBE,
        });
    }

    for pair in tanks.windows(2) {
        let (this, next) = (pair[0].body(), pair[1].body());
        let y = this.height().min(next.height()) * 0.38 + TANK_BASE_Y;
        let from = this.x() + this.radius() + 0.001;
        let to = next.x() - next.radius() - 0.001;
        fixtures.push(Fixture::Conduit {
            center: Vec3::new((from + to) / 2.0, y, 0.0),
            length: to - from,
            outer_radius: 0.21,
            inner_radius: 0.13,
        });
    }

    if let Some(first) = tanks.first().map(Tank::body) {
        fixtures.push(Fixture::Conduit {
            center: Vec3::new(
                -first.radius() - INLET_LENGTH / 2.0 + 0.001,
                first.height() * 0.4 + TANK_BASE_Y,
                0.0,
            ),
            length: INLET_LENGTH,
            outer_radius: 0.17,
            inner_radius: 0.1,
        });
    }
    if let Some(last) = tanks.last().map(Tank::body) {
        fixtures.push(Fixture::Conduit {
            center: Vec3::new(
                last.x() + last.radius() + OUTLET_LENGTH / 2.0 - 0.001,
                last.height() * 0.34 + TANK_BASE_Y,
                0.0,
            ),
            length: OUTLET_LENGTH,
            outer_radius: 0.14,
            inner_radius: 0.083,
        });
    }

    for tank in tanks {
        let body = tank.body();
        for index in 0..BEAMS_PER_TANK {
            let angle = index as f32 / BEAMS_PER_TANK as f32 * TAU;
            let reach = body.radius() - BEAM_INSET;
            fixtures.push(Fixture::Beam {
                center: Vec3::new(
                    body.x() + angle.cos() * reach,
                    BEAM_Y,
                    angle.sin() * reach,
                ),
                top_radius: 0.15,
                bottom_radius: 0.18,
                height: 1.0,
            });
        }
    }

    fixtures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_tanks;

    #[test]
    fn standard_line_gets_every_fixture_once() {
        let fixtures = derive(&standard_tanks(), 1);
        let count = |predicate: fn(&Fixture) -> bool| fixtures.iter().filter(|f| predicate(f)).count();

        assert_eq!(count(|f| matches!(f, Fixture::Platform { .. })), 3);
        assert_eq!(count(|f| matches!(f, Fixture::ProcessPipe { .. })), 3);
        assert_eq!(count(|f| matches!(f, Fixture::AerationRing { .. })), 1);
        assert_eq!(count(|f| matches!(f, Fixture::Conduit { .. })), 4);
        assert_eq!(count(|f| matches!(f, Fixture::Beam { .. })), 9);
    }

    #[test]
    fn conduits_bridge_the_gap_between_neighbouring_shells() {
        let fixtures = derive(&standard_tanks(), 1);
        let first = fixtures
            .iter()
            .find_map(|fixture| match fixture {
                Fixture::Conduit { center, length, .. } => Some((*center, *length)),
                _ => None,
            })
            .expect("line has conduits");
        let expected_length = (6.7 - 2.6 - 0.001) - (2.3 + 0.001);
        assert!((first.1 - expected_length).abs() < 1e-4);
        assert!((first.0.y - (2.0 * 0.38 + 0.15)).abs() < 1e-5);
    }
}
