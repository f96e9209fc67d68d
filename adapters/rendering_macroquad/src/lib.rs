#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the facility narrative.
//!
//! Macroquad is pulled in without its default `audio` feature; the narrative
//! is silent and the audio stack needs native ALSA headers.
//!
//! The 3D scene is drawn with Macroquad's immediate-mode primitives; the
//! dashboard card lives in the local `ui` module so Macroquad UI types stay
//! out of the renderer.

mod ui;

use self::ui::{draw_dashboard_ui, DashboardUiContext};
use anyhow::Result;
use facility_narrative_core::{Color, SensorKind};
use facility_narrative_rendering::{
    CameraPose, CrackPresentation, FixturePresentation, FrameInput, HeadlinePresentation,
    LeakSegmentPresentation, MeshState, OrbitLimits, OrbitState, Presentation, RenderingBackend,
    Scene, SensorPresentation, TankPresentation, LEAK_COLOR,
};
use facility_narrative_world::Fixture;
use glam::{Vec2, Vec3};
use macroquad::{
    camera::{set_camera, set_default_camera, Camera3D},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_down, mouse_position, mouse_wheel, KeyCode,
        MouseButton,
    },
    math::{vec3, Vec3 as MacroquadVec3},
    models::{draw_cube, draw_cylinder, draw_line_3d, draw_sphere},
    text::draw_text,
};
use std::{
    f32::consts::TAU,
    time::{Duration, Instant},
};

const HEADLINE_FONT_SIZE: f32 = 44.0;
const HEADLINE_MARGIN: Vec2 = Vec2::new(48.0, 96.0);
const RING_SAMPLES: usize = 28;
const CAPSULE_SAMPLES: usize = 3;

/// Latches the dashboard's camera button until the next frame reads it.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraToggleLatch {
    latched: bool,
}

impl CameraToggleLatch {
    /// Returns whether the button was pressed and clears the latch so the
    /// toggle fires only once.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.latched)
    }

    /// Records a button press.
    pub fn register(&mut self) {
        self.latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the loop.
    quit_requested: bool,
    /// `O` hands the camera to the user or gives it back.
    toggle_override: bool,
    /// `Down`, `PageDown` or `Space` moves the story forward one step.
    step_forward: bool,
    /// `Up` or `PageUp` moves the story back one step.
    step_backward: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_override: is_key_pressed(KeyCode::O),
            step_forward: is_key_pressed(KeyCode::Down)
                || is_key_pressed(KeyCode::PageDown)
                || is_key_pressed(KeyCode::Space),
            step_backward: is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::PageUp),
        }
    }
}

/// Raw device observations for one frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputObservations {
    /// Vertical wheel movement as reported by the platform; up is positive.
    pub wheel: f32,
    /// Whether a forward step key was pressed.
    pub step_forward: bool,
    /// Whether a backward step key was pressed.
    pub step_backward: bool,
    /// Whether the override key was pressed.
    pub toggle_key: bool,
    /// Whether the dashboard camera button was pressed.
    pub toggle_button: bool,
    /// Cursor movement while the left button is held.
    pub drag: Vec2,
    /// Zoom keys: `+1` for zoom in, `-1` for zoom out.
    pub zoom: f32,
}

/// Translates device observations into the backend-agnostic frame input.
#[doc(hidden)]
#[must_use]
pub fn frame_input_from_observations(observations: InputObservations) -> FrameInput {
    FrameInput {
        scroll_delta: -observations.wheel,
        step: i32::from(observations.step_forward) - i32::from(observations.step_backward),
        toggle_override: observations.toggle_key ^ observations.toggle_button,
        orbit_drag: observations.drag,
        orbit_zoom: observations.zoom,
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    orbit_limits: OrbitLimits,
}

impl MacroquadBackend {
    /// Backend with the platform's swap interval and the default orbit limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `swap_interval` from the platform; `None` keeps its default.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Locks presentation to the display refresh when `enabled`.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Prints frame statistics and the current progress once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Overrides the bounds of the free-orbit controls.
    #[must_use]
    pub fn with_orbit_limits(mut self, limits: OrbitLimits) -> Self {
        self.orbit_limits = limits;
        self
    }
}

/// Frame timings gathered over one-second windows for the FPS printout.
#[derive(Debug, Default)]
struct FrameStats {
    window: Duration,
    frames: u32,
    slowest: Duration,
    update: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    slowest: Duration,
    avg_update: Duration,
}

impl FrameStats {
    /// Adds one frame; yields a report and starts a new window once a second
    /// of frames has been seen.
    fn record(&mut self, frame: Duration, update: Duration) -> Option<FrameReport> {
        self.window += frame;
        self.frames = self.frames.saturating_add(1);
        self.slowest = self.slowest.max(frame);
        self.update += update;
        if self.window < Duration::from_secs(1) {
            return None;
        }
        let report = FrameReport {
            fps: self.frames as f32 / self.window.as_secs_f32(),
            slowest: self.slowest,
            avg_update: self.update / self.frames.max(1),
        };
        *self = Self::default();
        Some(report)
    }
}

/// Tracks left-button drags between frames.
#[derive(Clone, Copy, Debug, Default)]
struct DragTracker {
    last: Option<Vec2>,
}

impl DragTracker {
    fn observe(&mut self, held: bool, cursor: Vec2) -> Vec2 {
        if !held {
            self.last = None;
            return Vec2::ZERO;
        }
        let delta = self.last.map_or(Vec2::ZERO, |last| cursor - last);
        self.last = Some(cursor);
        delta
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            orbit_limits,
        } = self;

        let Presentation {
            window_title,
            window_size,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_size.width()).unwrap_or(i32::MAX),
            window_height: i32::try_from(window_size.height()).unwrap_or(i32::MAX),
            sample_count: 4,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut stats = FrameStats::default();
            let mut orbit = OrbitState::default();
            let mut drag = DragTracker::default();
            let mut camera_button = CameraToggleLatch::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let (cursor_x, cursor_y) = mouse_position();
                let zoom = f32::from(u8::from(is_key_down(KeyCode::Equal)))
                    - f32::from(u8::from(is_key_down(KeyCode::Minus)));
                let observations = InputObservations {
                    wheel: mouse_wheel().1,
                    step_forward: keyboard.step_forward,
                    step_backward: keyboard.step_backward,
                    toggle_key: keyboard.toggle_override,
                    toggle_button: camera_button.take(),
                    drag: drag.observe(
                        is_mouse_button_down(MouseButton::Left),
                        Vec2::new(cursor_x, cursor_y),
                    ),
                    zoom: zoom * dt_seconds,
                };
                let frame_input = frame_input_from_observations(observations);

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                if scene.camera.orbit_enabled || scene.camera.manual {
                    orbit.accumulate(frame_input.orbit_drag, frame_input.orbit_zoom);
                } else {
                    orbit.reset();
                }
                let view = orbit.view(scene.camera.pose, orbit_limits);

                macroquad::window::clear_background(background);
                set_camera(&camera_for(view));
                draw_fixtures(&scene.fixtures);
                draw_tanks(&scene.tanks);
                if let Some(crack) = &scene.crack {
                    draw_crack(crack);
                }
                draw_leak(&scene.leak);
                draw_sensors(&scene.sensors);

                set_default_camera();
                draw_headlines(&scene.headlines);
                if let Some(card) = scene.dashboard.as_ref().filter(|card| card.visible) {
                    let mut root = macroquad::ui::root_ui();
                    let pressed = draw_dashboard_ui(
                        &mut root,
                        DashboardUiContext {
                            screen_width: macroquad::window::screen_width(),
                            card,
                            manual_camera: scene.camera.manual,
                        },
                    );
                    if pressed {
                        camera_button.register();
                    }
                }

                let report = stats.record(frame_dt, update_duration);
                if let Some(report) = report.filter(|_| show_fps) {
                    println!(
                        "fps {:.1} | slowest frame {:.2}ms | driver {:.3}ms | progress {:.3}",
                        report.fps,
                        report.slowest.as_secs_f64() * 1_000.0,
                        report.avg_update.as_secs_f64() * 1_000.0,
                        scene.progress,
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn camera_for(pose: CameraPose) -> Camera3D {
    Camera3D {
        position: to_macroquad_vec3(pose.position),
        target: to_macroquad_vec3(pose.target),
        up: vec3(0.0, 1.0, 0.0),
        fovy: 45f32.to_radians(),
        ..Camera3D::default()
    }
}

fn draw_tanks(tanks: &[TankPresentation]) {
    for tank in tanks {
        draw_column(
            &tank.water,
            tank.water_radius,
            tank.water_height * tank.water.scale.y,
        );
        if let Some(lid) = &tank.lid {
            draw_column(&lid.mesh, lid.radius, lid.thickness);
        }
        draw_column(&tank.shell, tank.radius, tank.height);
    }
}

fn draw_column(mesh: &MeshState, radius: f32, height: f32) {
    if !mesh.visible || height <= f32::EPSILON {
        return;
    }
    draw_cylinder(
        to_macroquad_vec3(mesh.position),
        radius,
        radius,
        height,
        None,
        material_color(mesh),
    );
}

fn draw_fixtures(fixtures: &[FixturePresentation]) {
    for fixture in fixtures {
        let color = to_macroquad_color(
            fixture
                .material
                .color
                .with_alpha(fixture.material.opacity),
        );
        match fixture.fixture {
            Fixture::Platform {
                center,
                radius,
                height,
            } => draw_cylinder(to_macroquad_vec3(center), radius, radius, height, None, color),
            Fixture::ProcessPipe {
                center,
                radius,
                length,
            } => draw_cylinder(to_macroquad_vec3(center), radius, radius, length, None, color),
            Fixture::Conduit {
                center,
                length,
                outer_radius,
                inner_radius,
            } => {
                let outer = Vec3::new(length, outer_radius * 2.0, outer_radius * 2.0);
                draw_cube(to_macroquad_vec3(center), to_macroquad_vec3(outer), None, color);
                if let Some(core) = fixture.core {
                    let inner = Vec3::new(length, inner_radius * 2.0, inner_radius * 2.0);
                    draw_cube(
                        to_macroquad_vec3(center),
                        to_macroquad_vec3(inner),
                        None,
                        to_macroquad_color(core.color.with_alpha(core.opacity)),
                    );
                }
            }
            Fixture::AerationRing {
                center,
                radius,
                tube,
            } => {
                for point in ring_points(center, radius, RING_SAMPLES) {
                    draw_sphere(to_macroquad_vec3(point), tube, None, color);
                }
            }
            Fixture::Beam {
                center,
                top_radius,
                bottom_radius,
                height,
            } => draw_cylinder(
                to_macroquad_vec3(center),
                top_radius,
                bottom_radius,
                height,
                None,
                color,
            ),
        }
    }
}

fn ring_points(center: Vec3, radius: f32, samples: usize) -> impl Iterator<Item = Vec3> {
    (0..samples).map(move |index| {
        let angle = TAU * index as f32 / samples as f32;
        center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
    })
}

fn draw_crack(crack: &CrackPresentation) {
    if crack.opacity <= f32::EPSILON {
        return;
    }
    let color = to_macroquad_color(crack.color.with_alpha(crack.opacity));
    for pair in crack.points.windows(2) {
        draw_line_3d(to_macroquad_vec3(pair[0]), to_macroquad_vec3(pair[1]), color);
    }
}

fn draw_leak(segments: &[LeakSegmentPresentation]) {
    for segment in segments {
        let color = to_macroquad_color(LEAK_COLOR.with_alpha(segment.opacity));
        for point in capsule_points(segment, CAPSULE_SAMPLES) {
            draw_sphere(to_macroquad_vec3(point), segment.radius, None, color);
        }
    }
}

fn capsule_points(
    segment: &LeakSegmentPresentation,
    samples: usize,
) -> impl Iterator<Item = Vec3> + '_ {
    let steps = samples.max(2) - 1;
    (0..=steps).map(move |index| {
        segment
            .start
            .lerp(segment.end, index as f32 / steps as f32)
    })
}

fn draw_sensors(sensors: &[SensorPresentation]) {
    for sensor in sensors.iter().filter(|sensor| sensor.mesh.visible) {
        let color = material_color(&sensor.mesh);
        let position = to_macroquad_vec3(sensor.mesh.position);
        match sensor.kind {
            SensorKind::Probe => draw_sphere(position, sensor.radius, None, color),
            SensorKind::Level => draw_cylinder(
                position,
                sensor.radius,
                sensor.radius,
                sensor.thickness,
                None,
                color,
            ),
        }
    }
}

fn draw_headlines(headlines: &[HeadlinePresentation]) {
    for headline in headlines
        .iter()
        .filter(|headline| headline.opacity > f32::EPSILON)
    {
        let color = to_macroquad_color(headline.color.with_alpha(headline.opacity));
        let _ = draw_text(
            headline.text,
            HEADLINE_MARGIN.x + headline.offset_x,
            HEADLINE_MARGIN.y,
            HEADLINE_FONT_SIZE,
            color,
        );
    }
}

/// Surface colour of a mesh with any glow added on top.
fn material_color(mesh: &MeshState) -> macroquad::color::Color {
    let material = mesh.material;
    let glow = material.emissive.scale(material.emissive_intensity);
    let lit = Color::new(
        (material.color.red + glow.red).min(1.0),
        (material.color.green + glow.green).min(1.0),
        (material.color.blue + glow.blue).min(1.0),
        material.opacity,
    );
    to_macroquad_color(lit)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(
        color.red.clamp(0.0, 1.0),
        color.green.clamp(0.0, 1.0),
        color.blue.clamp(0.0, 1.0),
        color.alpha.clamp(0.0, 1.0),
    )
}

fn to_macroquad_vec3(vector: Vec3) -> MacroquadVec3 {
    vec3(vector.x, vector.y, vector.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_narrative_rendering::MaterialState;

    #[test]
    fn wheel_down_moves_the_story_forward() {
        let input = frame_input_from_observations(InputObservations {
            wheel: -3.0,
            ..InputObservations::default()
        });
        assert_eq!(input.scroll_delta, 3.0);
    }

    #[test]
    fn opposite_step_keys_cancel_out() {
        let input = frame_input_from_observations(InputObservations {
            step_forward: true,
            step_backward: true,
            ..InputObservations::default()
        });
        assert_eq!(input.step, 0);
    }

    #[test]
    fn key_and_button_in_the_same_frame_cancel_out() {
        let both = frame_input_from_observations(InputObservations {
            toggle_key: true,
            toggle_button: true,
            ..InputObservations::default()
        });
        let one = frame_input_from_observations(InputObservations {
            toggle_button: true,
            ..InputObservations::default()
        });
        assert!(!both.toggle_override);
        assert!(one.toggle_override);
    }

    #[test]
    fn drag_tracker_reports_movement_only_while_held() {
        let mut tracker = DragTracker::default();
        assert_eq!(tracker.observe(true, Vec2::new(10.0, 10.0)), Vec2::ZERO);
        assert_eq!(tracker.observe(true, Vec2::new(14.0, 7.0)), Vec2::new(4.0, -3.0));
        assert_eq!(tracker.observe(false, Vec2::new(40.0, 40.0)), Vec2::ZERO);
        assert_eq!(tracker.observe(true, Vec2::new(50.0, 50.0)), Vec2::ZERO);
    }

    #[test]
    fn capsule_samples_span_both_ends() {
        let segment = LeakSegmentPresentation {
            start: Vec3::new(0.0, 2.0, 0.0),
            end: Vec3::new(0.0, 1.0, 0.0),
            radius: 0.055,
            opacity: 0.8,
        };
        let points: Vec<Vec3> = capsule_points(&segment, 3).collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], segment.start);
        assert_eq!(points[2], segment.end);
    }

    #[test]
    fn glow_brightens_without_overflowing() {
        let mesh = MeshState::new(
            Vec3::ZERO,
            MaterialState {
                emissive: Color::from_hex(0xffd700),
                emissive_intensity: 0.7,
                ..MaterialState::solid(Color::from_hex(0x4a5560))
            },
        );
        let lit = material_color(&mesh);
        assert!(lit.r <= 1.0 && lit.g <= 1.0 && lit.b <= 1.0);
        assert!(lit.r > 0x4a as f32 / 255.0);
    }

    #[test]
    fn frame_stats_report_once_per_second() {
        let mut stats = FrameStats::default();
        let quarter = Duration::from_millis(250);
        let update = Duration::from_millis(2);
        assert!(stats.record(quarter, update).is_none());
        assert!(stats.record(Duration::from_millis(300), update).is_none());
        assert!(stats.record(quarter, update).is_none());

        let report = stats
            .record(Duration::from_millis(200), update)
            .expect("a full second has passed");
        assert!((report.fps - 4.0).abs() <= 1e-3);
        assert_eq!(report.slowest, Duration::from_millis(300));
        assert_eq!(report.avg_update, update);
        assert!(stats.record(quarter, update).is_none());
    }

    #[test]
    fn ring_points_lie_on_the_circle() {
        let center = Vec3::new(6.7, 0.47, 0.0);
        for point in ring_points(center, 2.0, 12) {
            assert!((point.distance(center) - 2.0).abs() < 1e-4);
        }
    }
}
