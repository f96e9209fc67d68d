use serde::{Deserialize, Serialize};

/// Curve applied to the linear fraction of a ramp.
///
/// All curves clamp their input into `0.0..=1.0`, map `0` to `0` and `1` to
/// `1`, and never decrease.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Identity mapping.
    Linear,
    /// Symmetric cubic ease: accelerates, then decelerates.
    InOut,
    /// Cubic ease-out used for the mechanical sensor slide.
    CubicOut,
    /// Quadratic ease-out used for headline fade-ins.
    QuadOut,
    /// Quadratic ease-in used for headline fade-outs.
    QuadIn,
}

impl Easing {
    /// Applies the curve to `t`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::InOut => ease_in_out(t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadIn => t * t,
        }
    }
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
