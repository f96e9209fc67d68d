#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that turns a progress snapshot into scene state.
//!
//! Every frame reads one progress value, evaluates all channels from it and
//! applies them to the [`Scene`] in a fixed order: camera, dashboard, leak,
//! water and tank materials, sensors, headlines. Under the default options the
//! applied scene is a pure function of progress.

mod source;

pub use source::{Autoplay, ProgressSource, SharedProgress, WheelScroll};

use std::time::Duration;

use facility_narrative_core::{NarrativeState, Phase, Progress};
use facility_narrative_rendering::{
    CameraPose, DashboardField, HeadlinePresentation, LeakSegmentPresentation, MaterialState,
    Scene,
};
use facility_narrative_system_camera::{CameraRig, ManualOverride};
use facility_narrative_system_leak::{
    FlowDecorator, LeakGenerator, RegenerationPolicy, SEGMENT_RADIUS,
};
use facility_narrative_system_materials::{
    affected_by_leak, ColorSmoothing, MaterialBlender, Surface,
};
use facility_narrative_system_sensors::SensorRig;
use facility_narrative_system_timeline::{subtext_text, title_text, ChannelSet};
use facility_narrative_world::{
    query, Anchors, Facility, FacilityError, Tank, TankBody,
};

/// Tunables that trade purity for visual polish.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriverOptions {
    /// How tank colours approach their targets.
    pub smoothing: ColorSmoothing,
    /// When the leak chain is rebuilt.
    pub regeneration: RegenerationPolicy,
    /// Whether the running-water effect is layered on the leak.
    pub flow_animation: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct MissingWarnings {
    dashboard: bool,
    crack: bool,
    sensors: bool,
}

/// Owns the per-frame systems and applies their output to a scene.
#[derive(Debug)]
pub struct FrameDriver {
    options: DriverOptions,
    bodies: Vec<TankBody>,
    leak: LeakGenerator,
    flow: FlowDecorator,
    materials: MaterialBlender,
    camera: CameraRig,
    sensors: SensorRig,
    clock: Duration,
    last_phase: Option<Phase>,
    warned: MissingWarnings,
}

impl FrameDriver {
    /// Creates a driver for an assembled facility and its derived anchors.
    #[must_use]
    pub fn new(
        facility: &Facility,
        anchors: &Anchors,
        manual: ManualOverride,
        options: DriverOptions,
    ) -> Self {
        let bodies: Vec<TankBody> = query::tanks(facility)
            .iter()
            .map(|tank| tank.body().clone())
            .collect();
        let roles = bodies.iter().map(TankBody::role).collect();
        Self {
            options,
            leak: LeakGenerator::new(anchors.leak_origin(), anchors.leak_length())
                .with_policy(options.regeneration),
            flow: FlowDecorator::new(anchors.leak_length()),
            materials: MaterialBlender::new(roles, options.smoothing),
            camera: CameraRig::new(anchors.camera(), manual),
            sensors: SensorRig::new(query::sensors(facility).to_vec()),
            bodies,
            clock: Duration::ZERO,
            last_phase: None,
            warned: MissingWarnings::default(),
        }
    }

    /// Assembles the facility, derives its anchors and builds the initial
    /// scene and the driver, in that order.
    pub fn setup(
        tanks: Vec<Tank>,
        manual: ManualOverride,
        options: DriverOptions,
    ) -> Result<(Self, Scene), FacilityError> {
        let facility = Facility::build(tanks)?;
        let anchors = Anchors::derive(&facility);
        let scene = Scene::from_facility(&facility, &anchors);
        let driver = Self::new(&facility, &anchors, manual, options);
        tracing::info!(
            banner = query::welcome_banner(&facility),
            smoothing = ?options.smoothing,
            regeneration = ?options.regeneration,
            flow = options.flow_animation,
            "frame driver ready"
        );
        Ok((driver, scene))
    }

    /// Override flag shared with the camera rig.
    #[must_use]
    pub fn manual_override(&self) -> &ManualOverride {
        self.camera.manual_override()
    }

    /// Options the driver was created with.
    #[must_use]
    pub fn options(&self) -> DriverOptions {
        self.options
    }

    /// Reads one progress value from `source` and drives the scene with it.
    pub fn frame<S>(&mut self, source: &mut S, dt: Duration, scene: &mut Scene) -> ChannelSet
    where
        S: ProgressSource + ?Sized,
    {
        let progress = source.read(dt);
        self.advance(progress, dt, scene)
    }

    /// Drives the scene to `progress`; `dt` only advances the flow clock.
    pub fn advance(&mut self, progress: Progress, dt: Duration, scene: &mut Scene) -> ChannelSet {
        self.clock += dt;
        let manual = self.camera.manual_override().is_engaged();
        let channels = ChannelSet::evaluate(progress, manual);

        if self.last_phase != Some(channels.phase.phase) {
            tracing::debug!(
                progress = progress.get(),
                phase = channels.phase.phase.label(),
                "phase changed"
            );
            self.last_phase = Some(channels.phase.phase);
        }

        scene.progress = progress.get();
        scene.phase = channels.phase.phase;
        self.apply_camera(&channels, scene);
        self.apply_dashboard(&channels, scene);
        self.apply_leak(&channels, scene);
        self.apply_tanks(&channels, scene);
        self.apply_sensors(&channels, scene);
        apply_headlines(&channels, scene);
        channels
    }

    fn apply_camera(&self, channels: &ChannelSet, scene: &mut Scene) {
        scene.camera.orbit_enabled = channels.orbit_enabled;
        match self.camera.update(channels.camera_zoom) {
            Some(shot) => {
                scene.camera.manual = false;
                scene.camera.pose = CameraPose {
                    position: shot.position,
                    target: shot.target,
                };
            }
            None => scene.camera.manual = true,
        }
    }

    fn apply_dashboard(&mut self, channels: &ChannelSet, scene: &mut Scene) {
        let Some(card) = scene.dashboard.as_mut() else {
            if !self.warned.dashboard {
                tracing::warn!("scene has no dashboard; skipping dashboard updates");
                self.warned.dashboard = true;
            }
            return;
        };
        let dashboard = channels.dashboard;
        card.visible = dashboard.visible;
        card.status = dashboard.status;
        card.fields = NarrativeState::ALL
            .into_iter()
            .map(|state| DashboardField {
                state,
                title: title_text(state),
                title_opacity: dashboard.title.get(state),
                subtext: subtext_text(state),
                subtext_opacity: dashboard.subtext.get(state),
            })
            .collect();
    }

    fn apply_leak(&mut self, channels: &ChannelSet, scene: &mut Scene) {
        match scene.crack.as_mut() {
            Some(crack) => crack.opacity = channels.crack_alpha,
            None if !self.warned.crack => {
                tracing::warn!("scene has no crack; skipping crack updates");
                self.warned.crack = true;
            }
            None => {}
        }

        if self.leak.update(channels.leak_form) {
            tracing::debug!(
                form = channels.leak_form,
                segments = self.leak.segments().len(),
                "leak regenerated"
            );
        }
        if !channels.leak_visible {
            scene.leak.clear();
            return;
        }
        let segments = if self.options.flow_animation {
            self.flow
                .decorate(self.leak.segments(), channels.leak_form, self.clock)
        } else {
            FlowDecorator::settle(self.leak.segments(), channels.leak_form)
        };
        scene.leak = segments
            .iter()
            .map(|segment| {
                let (start, end) = segment.endpoints();
                LeakSegmentPresentation {
                    start,
                    end,
                    radius: SEGMENT_RADIUS,
                    opacity: segment.opacity,
                }
            })
            .collect();
    }

    fn apply_tanks(&mut self, channels: &ChannelSet, scene: &mut Scene) {
        let blended = self
            .materials
            .blend(channels.attention, channels.water_degradation);
        for ((tank, body), materials) in scene.tanks.iter_mut().zip(&self.bodies).zip(blended) {
            let drop = if affected_by_leak(body.role()) {
                channels.water_drop
            } else {
                0.0
            };
            tank.water.scale.y = 1.0 - drop;
            tank.water.position = body.water_center(drop);
            tank.water.material = material(materials.water);
            tank.shell.material = material(materials.shell);
            if let Some(lid) = tank.lid.as_mut() {
                lid.mesh.material.opacity = materials.lid_opacity;
            }
        }
    }

    fn apply_sensors(&mut self, channels: &ChannelSet, scene: &mut Scene) {
        if scene.sensors.is_empty() {
            if !self.warned.sensors {
                tracing::warn!("scene has no sensors; skipping sensor updates");
                self.warned.sensors = true;
            }
            return;
        }
        let states = self.sensors.update(
            channels.sensors_visible,
            channels.sensor_slide,
            channels.sensor_pulse,
        );
        for presentation in &mut scene.sensors {
            let Some(state) = states.iter().find(|state| state.id == presentation.id) else {
                continue;
            };
            presentation.heading = state.pose.heading;
            presentation.mesh.position = state.pose.position;
            presentation.mesh.visible = state.visible;
            presentation.mesh.material.color = state.color;
            presentation.mesh.material.emissive = state.emissive;
            presentation.mesh.material.emissive_intensity = state.emissive_intensity;
        }
    }
}

fn apply_headlines(channels: &ChannelSet, scene: &mut Scene) {
    scene.headlines = channels
        .headlines
        .iter()
        .map(|headline| HeadlinePresentation {
            text: headline.text,
            opacity: headline.opacity,
            offset_x: headline.offset_x,
            color: headline.color,
        })
        .collect();
}

fn material(surface: Surface) -> MaterialState {
    MaterialState {
        color: surface.color,
        opacity: surface.opacity,
        transmission: surface.transmission,
        roughness: surface.roughness,
        ..MaterialState::solid(surface.color)
    }
}
