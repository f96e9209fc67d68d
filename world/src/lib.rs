#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static scene graph of the wastewater facility.
//!
//! The facility is assembled once before the first frame and never mutated
//! afterwards. Everything that depends on the assembled geometry (crack path,
//! leak origin, camera shots) is computed in a separate, explicit
//! [`Anchors::derive`] step so no frame ever observes half-initialised data.

mod anchors;
mod fixtures;
mod sensors;

pub use anchors::{Anchors, CameraAnchors, Shot, CRACK_POINTS, TANK_CURVE_ANGLE};
pub use fixtures::Fixture;
pub use sensors::{Mount, SensorDescriptor, SensorId, SensorPose};

use facility_narrative_core::{Color, TankRole, WELCOME_BANNER};
use glam::Vec3;
use thiserror::Error;

/// Elevation of the tank floor above the ground plane.
pub const TANK_BASE_Y: f32 = 0.15;

/// Elevation of the water column floor above the ground plane.
pub const WATER_BASE_Y: f32 = 0.175;

/// Horizontal spacing between neighbouring tank centres.
pub const TANK_SPACING: f32 = 6.7;

/// Shell colour shared by every tank.
pub const SHELL_COLOR: Color = Color::from_hex(0x858e98);

/// Shell opacity shared by every tank.
pub const SHELL_OPACITY: f32 = 0.38;

/// Lid colour shared by every covered tank.
pub const LID_COLOR: Color = Color::from_hex(0x9fb4c4);

/// Healthy water colour.
pub const WATER_COLOR: Color = Color::from_hex(0x5b9bab);

/// Scene background colour.
pub const BACKGROUND_COLOR: Color = Color::from_hex(0xd3e7ec);

/// Errors raised while assembling a facility.
#[derive(Debug, Error, PartialEq)]
pub enum FacilityError {
    /// The treatment line needs exactly one reactor to host the narrative.
    #[error("facility has no reactor tank")]
    MissingReactor,
    /// More than one tank claimed the reactor role.
    #[error("facility declares {count} reactor tanks; expected exactly one")]
    DuplicateReactor {
        /// Number of reactor tanks found.
        count: usize,
    },
    /// Water column does not fit inside the tank shell.
    #[error("{role:?} tank water column does not fit inside its shell")]
    WaterOverflow {
        /// Role of the offending tank.
        role: TankRole,
    },
    /// A dimension was zero, negative or not finite.
    #[error("{role:?} tank has a non-positive dimension")]
    InvalidDimension {
        /// Role of the offending tank.
        role: TankRole,
    },
}

/// Optional cover seated on a tank rim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lid {
    /// Height of the lid centre above the tank rim.
    pub offset: f32,
    /// Vertical thickness of the lid.
    pub thickness: f32,
}

impl Lid {
    /// Lid radius relative to the shell radius.
    pub const RADIUS_FACTOR: f32 = 0.98;
}

/// Geometric description of a single cylindrical tank.
#[derive(Clone, Debug, PartialEq)]
pub struct TankBody {
    role: TankRole,
    x: f32,
    radius: f32,
    height: f32,
    water_radius: f32,
    water_height: f32,
    lid: Option<Lid>,
}

impl TankBody {
    /// Creates a new tank body centred on `x`.
    #[must_use]
    pub const fn new(
        role: TankRole,
        x: f32,
        radius: f32,
        height: f32,
        water_radius: f32,
        water_height: f32,
    ) -> Self {
        Self {
            role,
            x,
            radius,
            height,
            water_radius,
            water_height,
            lid: None,
        }
    }

    /// Seats a lid on the tank rim.
    #[must_use]
    pub const fn with_lid(mut self, lid: Lid) -> Self {
        self.lid = Some(lid);
        self
    }

    /// Process role of the tank.
    #[must_use]
    pub const fn role(&self) -> TankRole {
        self.role
    }

    /// Horizontal position of the tank axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Outer shell radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Shell height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Radius of the water column.
    #[must_use]
    pub const fn water_radius(&self) -> f32 {
        self.water_radius
    }

    /// Height of the full water column.
    #[must_use]
    pub const fn water_height(&self) -> f32 {
        self.water_height
    }

    /// Lid seated on the rim, if any.
    #[must_use]
    pub const fn lid(&self) -> Option<Lid> {
        self.lid
    }

    /// Centre of the shell cylinder.
    #[must_use]
    pub fn shell_center(&self) -> Vec3 {
        Vec3::new(self.x, self.height / 2.0 + TANK_BASE_Y, 0.0)
    }

    /// Centre of the water column when it is lowered by `drop` (fraction of
    /// its full height).
    #[must_use]
    pub fn water_center(&self, drop: f32) -> Vec3 {
        let height = self.water_height * (1.0 - drop);
        Vec3::new(self.x, height / 2.0 + WATER_BASE_Y, 0.0)
    }

    /// Height of the free water surface above the ground plane.
    #[must_use]
    pub fn water_surface_y(&self) -> f32 {
        self.water_height + WATER_BASE_Y
    }

    /// Centre of the lid, if any.
    #[must_use]
    pub fn lid_center(&self) -> Option<Vec3> {
        self.lid
            .map(|lid| Vec3::new(self.x, self.height + lid.offset, 0.0))
    }

    fn validate(&self) -> Result<(), FacilityError> {
        let dimensions = [
            self.radius,
            self.height,
            self.water_radius,
            self.water_height,
        ];
        if dimensions
            .iter()
            .any(|value| !value.is_finite() || *value <= 0.0)
            || !self.x.is_finite()
        {
            return Err(FacilityError::InvalidDimension { role: self.role });
        }
        if self.water_radius >= self.radius || self.water_height >= self.height {
            return Err(FacilityError::WaterOverflow { role: self.role });
        }
        Ok(())
    }
}

/// Tank placed in the treatment line.
///
/// Only instrumented tanks carry sensors; the tag makes the absence explicit
/// instead of relying on an empty optional list.
#[derive(Clone, Debug, PartialEq)]
pub enum Tank {
    /// Plain tank without instrumentation.
    Simple(TankBody),
    /// Tank that receives sensors during the narrative.
    Instrumented {
        /// Tank geometry.
        body: TankBody,
        /// Sensors mounted on the tank.
        sensors: Vec<SensorDescriptor>,
    },
}

impl Tank {
    /// Geometry of the tank regardless of instrumentation.
    #[must_use]
    pub fn body(&self) -> &TankBody {
        match self {
            Tank::Simple(body) | Tank::Instrumented { body, .. } => body,
        }
    }

    /// Sensors mounted on the tank; empty for simple tanks.
    #[must_use]
    pub fn sensors(&self) -> &[SensorDescriptor] {
        match self {
            Tank::Simple(_) => &[],
            Tank::Instrumented { sensors, .. } => sensors,
        }
    }

    /// Process role of the tank.
    #[must_use]
    pub fn role(&self) -> TankRole {
        self.body().role()
    }
}

/// The three-tank treatment line with the reactor sensor kit.
#[must_use]
pub fn standard_tanks() -> Vec<Tank> {
    let influent = TankBody::new(TankRole::Influent, 0.0, 2.3, 2.0, 2.03, 1.7);
    let reactor = TankBody::new(TankRole::Reactor, TANK_SPACING, 2.6, 2.7, 2.37, 2.45).with_lid(
        Lid {
            offset: 0.14,
            thickness: 0.08,
        },
    );
    let effluent = TankBody::new(TankRole::Effluent, TANK_SPACING * 2.0, 2.2, 2.1, 1.95, 1.7)
        .with_lid(Lid {
            offset: 0.13,
            thickness: 0.1,
        });
    let sensors = sensors::reactor_kit(&reactor);

    vec![
        Tank::Simple(influent),
        Tank::Instrumented {
            body: reactor,
            sensors,
        },
        Tank::Simple(effluent),
    ]
}

/// Static facility scene graph.
#[derive(Clone, Debug)]
pub struct Facility {
    banner: &'static str,
    tanks: Vec<Tank>,
    fixtures: Vec<Fixture>,
    reactor: usize,
}

impl Facility {
    /// Assembles a facility from tanks ordered along the treatment line.
    ///
    /// Static fixtures (platforms, pipes, beams, aeration ring) are derived
    /// from the tank geometry here and never change afterwards.
    pub fn build(tanks: Vec<Tank>) -> Result<Self, FacilityError> {
        for tank in &tanks {
            tank.body().validate()?;
        }

        let reactors: Vec<usize> = tanks
            .iter()
            .enumerate()
            .filter(|(_, tank)| tank.role() == TankRole::Reactor)
            .map(|(index, _)| index)
            .collect();
        let reactor = match reactors.as_slice() {
            [] => return Err(FacilityError::MissingReactor),
            [index] => *index,
            many => return Err(FacilityError::DuplicateReactor { count: many.len() }),
        };

        let fixtures = fixtures::derive(&tanks, reactor);
        tracing::info!(
            tanks = tanks.len(),
            fixtures = fixtures.len(),
            sensors = tanks[reactor].sensors().len(),
            "facility assembled"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            tanks,
            fixtures,
            reactor,
        })
    }
}

/// Read-only accessors over the facility.
pub mod query {
    use super::{Facility, Fixture, SensorDescriptor, Tank, TankBody};
    use facility_narrative_core::TankRole;

    /// Retrieves the banner adapters display on start-up.
    #[must_use]
    pub fn welcome_banner(facility: &Facility) -> &'static str {
        facility.banner
    }

    /// Every tank in treatment-line order.
    #[must_use]
    pub fn tanks(facility: &Facility) -> &[Tank] {
        &facility.tanks
    }

    /// The reactor tank hosting the leak and the sensors.
    #[must_use]
    pub fn reactor(facility: &Facility) -> &Tank {
        &facility.tanks[facility.reactor]
    }

    /// Index of the reactor inside [`tanks`].
    #[must_use]
    pub fn reactor_index(facility: &Facility) -> usize {
        facility.reactor
    }

    /// First tank with the provided role.
    #[must_use]
    pub fn tank_by_role(facility: &Facility, role: TankRole) -> Option<&TankBody> {
        facility
            .tanks
            .iter()
            .map(Tank::body)
            .find(|body| body.role() == role)
    }

    /// Sensors mounted on the reactor.
    #[must_use]
    pub fn sensors(facility: &Facility) -> &[SensorDescriptor] {
        reactor(facility).sensors()
    }

    /// Static fixtures surrounding the tanks.
    #[must_use]
    pub fn fixtures(facility: &Facility) -> &[Fixture] {
        &facility.fixtures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_facility_has_one_instrumented_reactor() {
        let facility = Facility::build(standard_tanks()).expect("standard layout is valid");

        let reactor = query::reactor(&facility);
        assert_eq!(reactor.role(), TankRole::Reactor);
        assert!(matches!(reactor, Tank::Instrumented { .. }));
        assert_eq!(query::reactor_index(&facility), 1);
        assert_eq!(query::sensors(&facility).len(), 5);
        assert!(query::tanks(&facility)
            .iter()
            .filter(|tank| tank.role() != TankRole::Reactor)
            .all(|tank| tank.sensors().is_empty()));
    }

    #[test]
    fn build_rejects_missing_and_duplicate_reactors() {
        let influent = TankBody::new(TankRole::Influent, 0.0, 2.0, 2.0, 1.8, 1.5);
        let error = Facility::build(vec![Tank::Simple(influent)])
            .expect_err("a facility without a reactor must be rejected");
        assert_eq!(error, FacilityError::MissingReactor);

        let reactor = TankBody::new(TankRole::Reactor, 0.0, 2.0, 2.0, 1.8, 1.5);
        let error = Facility::build(vec![
            Tank::Simple(reactor.clone()),
            Tank::Simple(reactor),
        ])
        .expect_err("two reactors must be rejected");
        assert_eq!(error, FacilityError::DuplicateReactor { count: 2 });
    }

    #[test]
    fn build_rejects_water_taller_than_shell() {
        let reactor = TankBody::new(TankRole::Reactor, 0.0, 2.0, 2.0, 1.8, 2.5);
        let error = Facility::build(vec![Tank::Simple(reactor)])
            .expect_err("overflowing water must be rejected");
        assert_eq!(
            error,
            FacilityError::WaterOverflow {
                role: TankRole::Reactor
            }
        );
    }

    #[test]
    fn water_center_tracks_level_drop() {
        let body = TankBody::new(TankRole::Effluent, 13.4, 2.2, 2.1, 1.95, 1.7);
        let full = body.water_center(0.0);
        assert!((full.y - (0.85 + WATER_BASE_Y)).abs() < 1e-5);

        let lowered = body.water_center(0.2);
        assert!((lowered.y - (1.7 * 0.8 / 2.0 + WATER_BASE_Y)).abs() < 1e-5);
        assert_eq!(lowered.x, 13.4);
    }

    #[test]
    fn lid_centre_sits_above_rim() {
        let facility = Facility::build(standard_tanks()).expect("standard layout is valid");
        let reactor = query::reactor(&facility).body();
        let lid = reactor.lid_center().expect("reactor has a lid");
        assert!((lid.y - 2.84).abs() < 1e-5);

        let influent =
            query::tank_by_role(&facility, TankRole::Influent).expect("influent tank exists");
        assert!(influent.lid_center().is_none());
    }
}
