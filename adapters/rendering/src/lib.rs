#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for facility narrative adapters.
//!
//! The [`Scene`] is the single mutable snapshot the frame driver writes into
//! and backends read from. It is created once from the assembled facility and
//! never rebuilt; only its state records change between frames.

mod orbit;

pub use orbit::{OrbitLimits, OrbitState};

use anyhow::Result as AnyResult;
use facility_narrative_core::{
    Color, DashboardStatus, NarrativeState, Phase, SensorKind, TankRole,
};
use facility_narrative_world::{
    query, Anchors, Facility, Fixture, Lid, SensorId, BACKGROUND_COLOR, LID_COLOR, SHELL_COLOR,
    SHELL_OPACITY, WATER_COLOR,
};
use glam::{Vec2, Vec3};
use std::time::Duration;
use thiserror::Error;

/// Colour of the water falling from the crack.
pub const LEAK_COLOR: Color = Color::from_hex(0x48a7e1);

/// Colour of the crack line on the reactor wall.
pub const CRACK_COLOR: Color = Color::from_hex(0x151b21);

const PLATFORM_COLOR: Color = Color::from_hex(0xdccfa5);
const STEEL_COLOR: Color = Color::from_hex(0xb5bac3);
const STEEL_PIPE_OPACITY: f32 = 0.26;
const PIPE_WATER_COLOR: Color = Color::from_hex(0x92dbf7);
const PIPE_WATER_OPACITY: f32 = 0.53;
const AERATION_COLOR: Color = Color::from_hex(0x81898d);

/// Surface parameters of a mesh material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialState {
    /// Base colour.
    pub color: Color,
    /// Overall opacity.
    pub opacity: f32,
    /// Light transmission.
    pub transmission: f32,
    /// Surface roughness.
    pub roughness: f32,
    /// Emissive colour.
    pub emissive: Color,
    /// Emissive strength.
    pub emissive_intensity: f32,
}

impl MaterialState {
    /// Opaque, non-emissive material of the given colour.
    #[must_use]
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            transmission: 0.0,
            roughness: 0.5,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
        }
    }

    /// Returns the material with a replaced opacity.
    #[must_use]
    pub const fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Transform, visibility and material of one mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshState {
    /// World-space centre.
    pub position: Vec3,
    /// Per-axis scale relative to the mesh's base geometry.
    pub scale: Vec3,
    /// Whether the mesh is drawn.
    pub visible: bool,
    /// Surface material.
    pub material: MaterialState,
}

impl MeshState {
    /// Visible mesh at `position` with unit scale.
    #[must_use]
    pub const fn new(position: Vec3, material: MaterialState) -> Self {
        Self {
            position,
            scale: Vec3::ONE,
            visible: true,
            material,
        }
    }
}

/// Camera eye and look-at target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub position: Vec3,
    /// Look-at target.
    pub target: Vec3,
}

/// Camera state written by the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPresentation {
    /// Scripted pose; left untouched while the user holds the camera.
    pub pose: CameraPose,
    /// Whether the backend may orbit around the pose.
    pub orbit_enabled: bool,
    /// Whether the user currently holds the camera.
    pub manual: bool,
}

/// Lid seated on a tank rim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LidPresentation {
    /// Lid radius.
    pub radius: f32,
    /// Lid thickness.
    pub thickness: f32,
    /// Lid mesh.
    pub mesh: MeshState,
}

/// One tank: shell, water column and optional lid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TankPresentation {
    /// Process role.
    pub role: TankRole,
    /// Shell radius.
    pub radius: f32,
    /// Shell height.
    pub height: f32,
    /// Water column radius.
    pub water_radius: f32,
    /// Full water column height; the mesh scale shrinks it.
    pub water_height: f32,
    /// Shell mesh.
    pub shell: MeshState,
    /// Water mesh.
    pub water: MeshState,
    /// Lid, if the tank is covered.
    pub lid: Option<LidPresentation>,
}

/// One sensor housing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorPresentation {
    /// Identifier of the sensor.
    pub id: SensorId,
    /// Kind tag.
    pub kind: SensorKind,
    /// Housing radius.
    pub radius: f32,
    /// Housing thickness.
    pub thickness: f32,
    /// Rotation around the vertical axis.
    pub heading: f32,
    /// Housing mesh.
    pub mesh: MeshState,
}

/// Capsule of falling water.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeakSegmentPresentation {
    /// Upper end of the capsule axis.
    pub start: Vec3,
    /// Lower end of the capsule axis.
    pub end: Vec3,
    /// Capsule radius.
    pub radius: f32,
    /// Capsule opacity.
    pub opacity: f32,
}

/// Crack polyline on the reactor wall.
#[derive(Clone, Debug, PartialEq)]
pub struct CrackPresentation {
    /// Points of the polyline, bottom to top.
    pub points: Vec<Vec3>,
    /// Line colour.
    pub color: Color,
    /// Line opacity.
    pub opacity: f32,
}

/// Title and subtext of one narrative state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashboardField {
    /// Narrative state the field belongs to.
    pub state: NarrativeState,
    /// Title line.
    pub title: &'static str,
    /// Title opacity.
    pub title_opacity: f32,
    /// Subtext line.
    pub subtext: &'static str,
    /// Subtext opacity.
    pub subtext_opacity: f32,
}

/// Status card overlaid on the scene. Layout is up to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardPresentation {
    /// Whether the card is shown.
    pub visible: bool,
    /// Status indicator.
    pub status: DashboardStatus,
    /// One field per narrative state, stacked on top of each other.
    pub fields: Vec<DashboardField>,
}

impl DashboardPresentation {
    /// Hidden card with the given fields, all transparent.
    #[must_use]
    pub fn hidden(fields: Vec<DashboardField>) -> Self {
        Self {
            visible: false,
            status: DashboardStatus::None,
            fields,
        }
    }
}

/// Hero headline overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlinePresentation {
    /// Headline copy.
    pub text: &'static str,
    /// Opacity.
    pub opacity: f32,
    /// Horizontal offset in logical pixels.
    pub offset_x: f32,
    /// Text colour.
    pub color: Color,
}

/// Static decoration with its materials.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixturePresentation {
    /// Geometry.
    pub fixture: Fixture,
    /// Outer material.
    pub material: MaterialState,
    /// Material of the water core, for water-carrying pipes.
    pub core: Option<MaterialState>,
}

impl FixturePresentation {
    /// Pairs a fixture with its fixed materials.
    #[must_use]
    pub fn new(fixture: Fixture) -> Self {
        let (material, core) = match fixture {
            Fixture::Platform { .. } => (MaterialState::solid(PLATFORM_COLOR), None),
            Fixture::ProcessPipe { .. } => (
                MaterialState::solid(STEEL_COLOR).with_opacity(STEEL_PIPE_OPACITY),
                None,
            ),
            Fixture::Conduit { .. } => (
                MaterialState::solid(STEEL_COLOR).with_opacity(STEEL_PIPE_OPACITY),
                Some(MaterialState::solid(PIPE_WATER_COLOR).with_opacity(PIPE_WATER_OPACITY)),
            ),
            Fixture::AerationRing { .. } => (MaterialState::solid(AERATION_COLOR), None),
            Fixture::Beam { .. } => (MaterialState::solid(STEEL_COLOR), None),
        };
        Self {
            fixture,
            material,
            core,
        }
    }
}

/// Scene description mutated by the frame driver and drawn by backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Progress the scene was last driven to.
    pub progress: f32,
    /// Phase the scene was last driven to.
    pub phase: Phase,
    /// Camera.
    pub camera: CameraPresentation,
    /// Tanks in treatment-line order.
    pub tanks: Vec<TankPresentation>,
    /// Sensor housings; empty when the facility has none.
    pub sensors: Vec<SensorPresentation>,
    /// Capsules of the leak, already decorated for this frame.
    pub leak: Vec<LeakSegmentPresentation>,
    /// Crack on the reactor wall, if modelled.
    pub crack: Option<CrackPresentation>,
    /// Status card, if the adapter shows one.
    pub dashboard: Option<DashboardPresentation>,
    /// Hero headlines.
    pub headlines: Vec<HeadlinePresentation>,
    /// Static decorations.
    pub fixtures: Vec<FixturePresentation>,
}

impl Scene {
    /// Creates the scene for an assembled facility and its derived anchors.
    ///
    /// Meshes start in their healthy state: full water, stowed and hidden
    /// sensors, no leak, a transparent crack and a hidden dashboard.
    #[must_use]
    pub fn from_facility(facility: &Facility, anchors: &Anchors) -> Self {
        let tanks = query::tanks(facility)
            .iter()
            .map(|tank| {
                let body = tank.body();
                let shell_material = MaterialState {
                    color: SHELL_COLOR,
                    opacity: SHELL_OPACITY,
                    transmission: 0.0,
                    roughness: 0.29,
                    emissive: Color::BLACK,
                    emissive_intensity: 0.0,
                };
                let water_material = MaterialState {
                    color: WATER_COLOR,
                    opacity: 0.49,
                    transmission: 0.93,
                    roughness: 0.14,
                    emissive: Color::BLACK,
                    emissive_intensity: 0.0,
                };
                let lid = body.lid().zip(body.lid_center()).map(|(lid, center)| {
                    LidPresentation {
                        radius: body.radius() * Lid::RADIUS_FACTOR,
                        thickness: lid.thickness,
                        mesh: MeshState::new(
                            center,
                            MaterialState::solid(LID_COLOR).with_opacity(SHELL_OPACITY),
                        ),
                    }
                });
                TankPresentation {
                    role: body.role(),
                    radius: body.radius(),
                    height: body.height(),
                    water_radius: body.water_radius(),
                    water_height: body.water_height(),
                    shell: MeshState::new(body.shell_center(), shell_material),
                    water: MeshState::new(body.water_center(0.0), water_material),
                    lid,
                }
            })
            .collect();

        let sensors = query::sensors(facility)
            .iter()
            .map(|descriptor| {
                let pose = descriptor.pose(0.0);
                SensorPresentation {
                    id: descriptor.id(),
                    kind: descriptor.kind(),
                    radius: descriptor.radius(),
                    thickness: descriptor.thickness(),
                    heading: pose.heading,
                    mesh: MeshState {
                        visible: false,
                        ..MeshState::new(
                            pose.position,
                            MaterialState::solid(descriptor.base_color()),
                        )
                    },
                }
            })
            .collect();

        let wide = anchors.camera().wide;
        Self {
            progress: 0.0,
            phase: Phase::Healthy,
            camera: CameraPresentation {
                pose: CameraPose {
                    position: wide.position,
                    target: wide.target,
                },
                orbit_enabled: true,
                manual: false,
            },
            tanks,
            sensors,
            leak: Vec::new(),
            crack: Some(CrackPresentation {
                points: anchors.crack_path().to_vec(),
                color: CRACK_COLOR,
                opacity: 0.0,
            }),
            dashboard: Some(DashboardPresentation::hidden(Vec::new())),
            headlines: Vec::new(),
            fixtures: query::fixtures(facility)
                .iter()
                .copied()
                .map(FixturePresentation::new)
                .collect(),
        }
    }

    /// Drops the dashboard collaborator.
    #[must_use]
    pub fn without_dashboard(mut self) -> Self {
        self.dashboard = None;
        self
    }

    /// Drops the crack collaborator.
    #[must_use]
    pub fn without_crack(mut self) -> Self {
        self.crack = None;
        self
    }

    /// Drops every sensor housing.
    #[must_use]
    pub fn without_sensors(mut self) -> Self {
        self.sensors.clear();
        self
    }

    /// Tank with the given role, if present.
    #[must_use]
    pub fn tank(&self, role: TankRole) -> Option<&TankPresentation> {
        self.tanks.iter().find(|tank| tank.role == role)
    }
}

/// Size of the window in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    width: u32,
    height: u32,
}

impl WindowSize {
    /// Validates and creates a window size.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidWindowSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in logical pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in logical pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Window size.
    pub window_size: WindowSize,
    /// Solid colour used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor with the facility background.
    #[must_use]
    pub fn new<T>(window_title: T, window_size: WindowSize, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            clear_color: BACKGROUND_COLOR,
            scene,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Wheel movement this frame, in lines; positive scrolls down the story.
    pub scroll_delta: f32,
    /// Number of keyboard steps forward (positive) or backward (negative).
    pub step: i32,
    /// Whether the camera override toggle was pressed.
    pub toggle_override: bool,
    /// Mouse drag this frame in logical pixels, for orbiting.
    pub orbit_drag: Vec2,
    /// Zoom wheel input while orbiting.
    pub orbit_zoom: f32,
}

/// Rendering backend capable of presenting facility scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and mutates the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Windows need a positive area.
    #[error("window size must be positive (received {width}x{height})")]
    InvalidWindowSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_narrative_world::standard_tanks;

    fn scene() -> Scene {
        let facility = Facility::build(standard_tanks()).expect("standard facility");
        let anchors = Anchors::derive(&facility);
        Scene::from_facility(&facility, &anchors)
    }

    #[test]
    fn window_size_rejects_zero_area() {
        assert_eq!(
            WindowSize::new(0, 720),
            Err(RenderingError::InvalidWindowSize {
                width: 0,
                height: 720
            })
        );
        assert!(WindowSize::new(1280, 720).is_ok());
    }

    #[test]
    fn fresh_scene_starts_healthy() {
        let scene = scene();
        assert_eq!(scene.tanks.len(), 3);
        assert_eq!(scene.sensors.len(), 5);
        assert!(scene.sensors.iter().all(|sensor| !sensor.mesh.visible));
        assert!(scene.leak.is_empty());
        assert_eq!(scene.crack.as_ref().map(|crack| crack.opacity), Some(0.0));
        assert!(scene.dashboard.as_ref().is_some_and(|card| !card.visible));
        assert!(scene.camera.orbit_enabled);
    }

    #[test]
    fn only_covered_tanks_get_lids() {
        let scene = scene();
        assert!(scene.tank(TankRole::Influent).is_some_and(|tank| tank.lid.is_none()));
        let reactor = scene.tank(TankRole::Reactor).expect("reactor");
        let lid = reactor.lid.expect("reactor is covered");
        assert_eq!(lid.mesh.material.opacity, reactor.shell.material.opacity);
    }

    #[test]
    fn conduits_carry_a_water_core() {
        let scene = scene();
        assert!(scene.fixtures.iter().any(|fixture| fixture.core.is_some()));
        assert!(scene
            .fixtures
            .iter()
            .filter(|fixture| matches!(fixture.fixture, Fixture::Platform { .. }))
            .all(|fixture| fixture.material.opacity == 1.0));
    }

    #[test]
    fn collaborators_can_be_dropped() {
        let scene = scene().without_dashboard().without_crack().without_sensors();
        assert!(scene.dashboard.is_none());
        assert!(scene.crack.is_none());
        assert!(scene.sensors.is_empty());
    }
}
