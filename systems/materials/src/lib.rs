#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Material and colour blender for tank shells and water.

use facility_narrative_core::{AttentionStage, Color, TankRole};
use facility_narrative_world::{SHELL_COLOR, SHELL_OPACITY, WATER_COLOR};

const FADE_GREY: Color = Color::from_hex(0x88898f);
const DEGRADED_WATER: Color = Color::from_hex(0x61524b);
const SHELL_FADE: (f32, f32) = (0.75, 0.89);
const WATER_FADE: (f32, f32) = (0.73, 0.82);
const SHELL_FOCUS_BOOST: f32 = 1.13;
const WATER_FOCUS_BOOST: f32 = 1.06;
const FADE_IN_SPAN: f32 = 0.25;

const CLEAN_OPTICS: Optics = Optics {
    transmission: 0.93,
    opacity: 0.49,
    roughness: 0.14,
};
const DEGRADED_OPTICS: Optics = Optics {
    transmission: 0.5,
    opacity: 0.88,
    roughness: 0.45,
};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Optics {
    transmission: f32,
    opacity: f32,
    roughness: f32,
}

/// How tank colours approach their targets between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ColorSmoothing {
    /// Jump straight to the target. Pure in progress.
    #[default]
    Snap,
    /// Move a fixed fraction of the remaining distance every frame.
    Exponential(f32),
}

impl ColorSmoothing {
    /// Per-frame fraction used by the exponential policy.
    pub const DEFAULT_FACTOR: f32 = 0.25;
}

/// Surface appearance written to a single mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    /// Base colour.
    pub color: Color,
    /// Overall opacity.
    pub opacity: f32,
    /// Light transmission through the surface.
    pub transmission: f32,
    /// Surface roughness.
    pub roughness: f32,
}

/// Materials for one tank after blending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TankMaterials {
    /// Role of the tank.
    pub role: TankRole,
    /// Outer shell.
    pub shell: Surface,
    /// Water column.
    pub water: Surface,
    /// Lid opacity, mirroring the shell.
    pub lid_opacity: f32,
}

/// Whether the leak affects the water of a tank.
///
/// The reactor loses water directly and the effluent downstream of it
/// receives the contaminated flow.
#[must_use]
pub const fn affected_by_leak(role: TankRole) -> bool {
    matches!(role, TankRole::Reactor | TankRole::Effluent)
}

/// Faded variant of `color` used for tanks out of focus.
#[must_use]
pub fn faded(color: Color, (saturation, darken): (f32, f32)) -> Color {
    color.lerp(FADE_GREY, 1.0 - saturation).scale(darken)
}

/// Target shell and water colours for `role` at `attention`.
#[must_use]
pub fn target_tint(role: TankRole, attention: AttentionStage) -> (Color, Color) {
    if role == TankRole::Reactor {
        return match attention {
            AttentionStage::Focused | AttentionStage::Corrective => (
                SHELL_COLOR.scale(SHELL_FOCUS_BOOST),
                WATER_COLOR.scale(WATER_FOCUS_BOOST),
            ),
            AttentionStage::Ambient | AttentionStage::Isolating { .. } => {
                (SHELL_COLOR, WATER_COLOR)
            }
        };
    }

    let fade = match attention {
        AttentionStage::Ambient => 0.0,
        AttentionStage::Isolating { progress } => (progress / FADE_IN_SPAN).min(1.0),
        AttentionStage::Focused | AttentionStage::Corrective => 1.0,
    };
    (
        SHELL_COLOR.lerp(faded(SHELL_COLOR, SHELL_FADE), fade),
        WATER_COLOR.lerp(faded(WATER_COLOR, WATER_FADE), fade),
    )
}

/// Water appearance for contamination `degradation` in `0.0..=1.0`.
#[must_use]
pub fn degraded_water(degradation: f32) -> Surface {
    let d = degradation.clamp(0.0, 1.0);
    let mix = |clean: f32, dirty: f32| clean + (dirty - clean) * d;
    Surface {
        color: WATER_COLOR.lerp(DEGRADED_WATER, d),
        opacity: mix(CLEAN_OPTICS.opacity, DEGRADED_OPTICS.opacity),
        transmission: mix(CLEAN_OPTICS.transmission, DEGRADED_OPTICS.transmission),
        roughness: mix(CLEAN_OPTICS.roughness, DEGRADED_OPTICS.roughness),
    }
}

/// Blends tank materials from the attention stage and the degradation
/// channel.
#[derive(Clone, Debug)]
pub struct MaterialBlender {
    smoothing: ColorSmoothing,
    roles: Vec<TankRole>,
    shells: Vec<Color>,
    waters: Vec<Color>,
}

impl MaterialBlender {
    /// Creates a blender for tanks with the given roles, in scene order.
    #[must_use]
    pub fn new(roles: Vec<TankRole>, smoothing: ColorSmoothing) -> Self {
        let count = roles.len();
        Self {
            smoothing,
            roles,
            shells: vec![SHELL_COLOR; count],
            waters: vec![WATER_COLOR; count],
        }
    }

    /// Active smoothing policy.
    #[must_use]
    pub fn smoothing(&self) -> ColorSmoothing {
        self.smoothing
    }

    /// Advances every tank towards its targets and returns the blended
    /// materials in scene order.
    pub fn blend(&mut self, attention: AttentionStage, degradation: f32) -> Vec<TankMaterials> {
        let step = match self.smoothing {
            ColorSmoothing::Snap => 1.0,
            ColorSmoothing::Exponential(factor) => factor.clamp(0.0, 1.0),
        };

        self.roles
            .iter()
            .zip(self.shells.iter_mut().zip(self.waters.iter_mut()))
            .map(|(role, (shell, water))| {
                let (shell_target, water_target) = target_tint(*role, attention);
                *shell = shell.lerp(shell_target, step);
                *water = water.lerp(water_target, step);

                let water_surface = if affected_by_leak(*role) {
                    degraded_water(degradation)
                } else {
                    Surface {
                        color: *water,
                        opacity: CLEAN_OPTICS.opacity,
                        transmission: CLEAN_OPTICS.transmission,
                        roughness: CLEAN_OPTICS.roughness,
                    }
                };

                TankMaterials {
                    role: *role,
                    shell: Surface {
                        color: *shell,
                        opacity: SHELL_OPACITY,
                        transmission: 0.0,
                        roughness: 0.29,
                    },
                    water: water_surface,
                    lid_opacity: SHELL_OPACITY,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> Vec<TankRole> {
        vec![TankRole::Influent, TankRole::Reactor, TankRole::Effluent]
    }

    fn assert_color_close(actual: Color, expected: Color) {
        for (a, e) in [
            (actual.red, expected.red),
            (actual.green, expected.green),
            (actual.blue, expected.blue),
        ] {
            assert!((a - e).abs() <= 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn ambient_stage_keeps_base_colours() {
        let mut blender = MaterialBlender::new(roles(), ColorSmoothing::Snap);
        let materials = blender.blend(AttentionStage::Ambient, 0.0);
        for tank in &materials {
            assert_color_close(tank.shell.color, SHELL_COLOR);
            assert_eq!(tank.lid_opacity, tank.shell.opacity);
        }
        assert_color_close(materials[0].water.color, WATER_COLOR);
    }

    #[test]
    fn surrounding_tanks_fade_within_first_quarter_of_isolation() {
        let halfway = target_tint(TankRole::Influent, AttentionStage::Isolating { progress: 0.125 });
        let full = target_tint(TankRole::Influent, AttentionStage::Isolating { progress: 0.5 });
        let faded_shell = faded(SHELL_COLOR, SHELL_FADE);

        assert_color_close(full.0, faded_shell);
        assert_color_close(halfway.0, SHELL_COLOR.lerp(faded_shell, 0.5));
    }

    #[test]
    fn reactor_is_brightened_while_focused() {
        let (shell, water) = target_tint(TankRole::Reactor, AttentionStage::Focused);
        assert!(shell.red > SHELL_COLOR.red);
        assert_color_close(water, WATER_COLOR.scale(1.06));

        let (shell, _) = target_tint(TankRole::Reactor, AttentionStage::Isolating { progress: 0.9 });
        assert_color_close(shell, SHELL_COLOR);
    }

    #[test]
    fn degradation_drives_reactor_and_effluent_water_only() {
        let mut blender = MaterialBlender::new(roles(), ColorSmoothing::Snap);
        let materials = blender.blend(AttentionStage::Ambient, 1.0);

        assert_color_close(materials[1].water.color, DEGRADED_WATER);
        assert_eq!(materials[2].water.opacity, 0.88);
        assert_eq!(materials[2].water.transmission, 0.5);
        assert_eq!(materials[0].water.opacity, 0.49);
        assert_color_close(materials[0].water.color, WATER_COLOR);
    }

    #[test]
    fn exponential_smoothing_approaches_target_gradually() {
        let mut blender = MaterialBlender::new(
            roles(),
            ColorSmoothing::Exponential(ColorSmoothing::DEFAULT_FACTOR),
        );
        let target = faded(SHELL_COLOR, SHELL_FADE);
        let first = blender.blend(AttentionStage::Corrective, 0.0)[0].shell.color;
        assert_color_close(first, SHELL_COLOR.lerp(target, 0.25));

        let mut latest = first;
        for _ in 0..60 {
            latest = blender.blend(AttentionStage::Corrective, 0.0)[0].shell.color;
        }
        assert_color_close(latest, target);
    }

    #[test]
    fn snap_smoothing_is_history_free() {
        let mut blender = MaterialBlender::new(roles(), ColorSmoothing::Snap);
        let direct = blender.blend(AttentionStage::Focused, 0.3);
        let _ = blender.blend(AttentionStage::Ambient, 0.9);
        let again = blender.blend(AttentionStage::Focused, 0.3);
        assert_eq!(direct, again);
    }
}
