use std::{f32::consts::TAU, time::Duration};

use crate::LeakSegment;

const FLOW_SPEED: f32 = 0.8;
const LOOP_FACTOR: f32 = 1.5;
const SHIMMER: f32 = 0.05;
const MIN_OPACITY: f32 = 0.6;
const MAX_OPACITY: f32 = 0.9;

/// Time-driven running-water effect applied after geometry generation.
///
/// The decorator never mutates the generator's chain; it returns a shifted
/// copy, so the scroll-derived state stays untouched by the clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowDecorator {
    speed: f32,
    loop_length: f32,
}

impl FlowDecorator {
    /// Creates a decorator for a leak of the given length.
    #[must_use]
    pub fn new(leak_length: f32) -> Self {
        Self {
            speed: FLOW_SPEED,
            loop_length: leak_length * LOOP_FACTOR,
        }
    }

    /// Shifts each capsule down along its loop and modulates its opacity.
    #[must_use]
    pub fn decorate(
        &self,
        segments: &[LeakSegment],
        form: f32,
        elapsed: Duration,
    ) -> Vec<LeakSegment> {
        if self.loop_length <= f32::EPSILON {
            return Self::settle(segments, form);
        }
        let flow = elapsed.as_secs_f32() * self.speed;
        segments
            .iter()
            .map(|segment| {
                let offset =
                    (flow + segment.fraction * self.loop_length).rem_euclid(self.loop_length);
                let mut shifted = *segment;
                shifted.center.y -= offset;
                shifted.target.y -= offset;
                let shimmer = SHIMMER * (TAU * offset / self.loop_length).sin();
                shifted.opacity =
                    (segment.opacity + shimmer).clamp(MIN_OPACITY, MAX_OPACITY) * form;
                shifted
            })
            .collect()
    }

    /// Chain without flow: geometry unchanged, opacity faded by the form.
    #[must_use]
    pub fn settle(segments: &[LeakSegment], form: f32) -> Vec<LeakSegment> {
        segments
            .iter()
            .map(|segment| LeakSegment {
                opacity: segment.opacity * form,
                ..*segment
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;
    use glam::Vec3;

    const LENGTH: f32 = 2.0;

    fn chain() -> Vec<LeakSegment> {
        generate(Vec3::new(0.0, 2.0, 0.0), LENGTH, 1.0)
    }

    #[test]
    fn decoration_leaves_the_source_chain_untouched() {
        let source = chain();
        let snapshot = source.clone();
        let _ = FlowDecorator::new(LENGTH).decorate(&source, 1.0, Duration::from_millis(750));
        assert_eq!(source, snapshot);
    }

    #[test]
    fn offsets_stay_within_one_loop() {
        let source = chain();
        let decorated =
            FlowDecorator::new(LENGTH).decorate(&source, 1.0, Duration::from_secs(37));
        for (before, after) in source.iter().zip(&decorated) {
            let drop = before.center.y - after.center.y;
            assert!((0.0..LENGTH * 1.5 + 1e-4).contains(&drop), "drop {drop}");
            assert_eq!(before.center.x, after.center.x);
            assert!((before.target.y - after.target.y - drop).abs() < 1e-4);
        }
    }

    #[test]
    fn opacity_is_clamped_then_scaled_by_form() {
        let decorated =
            FlowDecorator::new(LENGTH).decorate(&chain(), 0.5, Duration::from_secs(3));
        assert!(decorated
            .iter()
            .all(|segment| (0.3 - 1e-6..=0.45 + 1e-6).contains(&segment.opacity)));
    }

    #[test]
    fn same_instant_gives_same_decoration() {
        let decorator = FlowDecorator::new(LENGTH);
        let at = Duration::from_millis(1234);
        assert_eq!(
            decorator.decorate(&chain(), 1.0, at),
            decorator.decorate(&chain(), 1.0, at)
        );
    }

    #[test]
    fn settled_chain_keeps_geometry() {
        let source = chain();
        let settled = FlowDecorator::settle(&source, 0.25);
        assert_eq!(settled[0].center, source[0].center);
        assert!((settled[0].opacity - source[0].opacity * 0.25).abs() < 1e-6);
    }
}
