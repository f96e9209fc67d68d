#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scroll-driven camera rig.
//!
//! The rig blends between the wide establishing shot and the crack close-up.
//! A shared [`ManualOverride`] flag hands the camera to the user; while it is
//! engaged the rig produces no pose at all.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use facility_narrative_world::{CameraAnchors, Shot};

const REACTOR_BIAS_WEIGHT: f32 = 0.55;

/// Flag shared between the rig and whatever input source can grab the camera.
#[derive(Clone, Debug, Default)]
pub struct ManualOverride(Arc<AtomicBool>);

impl ManualOverride {
    /// Creates a released override flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the user currently owns the camera.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Hands the camera to the user.
    pub fn engage(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns the camera to the scroll timeline.
    pub fn release(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

/// Blends the scripted shots from a zoom fraction.
#[derive(Clone, Debug)]
pub struct CameraRig {
    anchors: CameraAnchors,
    manual: ManualOverride,
}

impl CameraRig {
    /// Creates a rig over the derived anchors.
    #[must_use]
    pub fn new(anchors: CameraAnchors, manual: ManualOverride) -> Self {
        Self { anchors, manual }
    }

    /// Handle to the override flag read by this rig.
    #[must_use]
    pub fn manual_override(&self) -> &ManualOverride {
        &self.manual
    }

    /// Anchors the rig interpolates between.
    #[must_use]
    pub fn anchors(&self) -> &CameraAnchors {
        &self.anchors
    }

    /// Pose for `zoom`, or `None` while the user holds the camera.
    ///
    /// The flag is read on every call so an override engaged mid-frame takes
    /// effect on the very next update.
    #[must_use]
    pub fn update(&self, zoom: f32) -> Option<Shot> {
        if self.manual.is_engaged() {
            tracing::trace!("camera held by manual override");
            return None;
        }
        Some(shot_at(&self.anchors, zoom))
    }
}

/// Scripted pose for `zoom` in `0.0..=1.0`.
///
/// The look-at target is pulled towards the reactor midsection as the zoom
/// grows.
#[must_use]
pub fn shot_at(anchors: &CameraAnchors, zoom: f32) -> Shot {
    let zoom = zoom.clamp(0.0, 1.0);
    let position = anchors.wide.position.lerp(anchors.close.position, zoom);
    let target = anchors
        .wide
        .target
        .lerp(anchors.close.target, zoom)
        .lerp(anchors.reactor_bias, REACTOR_BIAS_WEIGHT * zoom);
    Shot { position, target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn anchors() -> CameraAnchors {
        CameraAnchors {
            wide: Shot {
                position: Vec3::new(15.0, 11.0, 20.0),
                target: Vec3::new(0.0, 2.0, 0.0),
            },
            close: Shot {
                position: Vec3::new(9.0, 5.0, 10.0),
                target: Vec3::new(9.0, 1.3, 1.0),
            },
            reactor_bias: Vec3::new(6.7, 1.5, 0.0),
        }
    }

    #[test]
    fn zero_zoom_is_the_wide_shot() {
        let rig = CameraRig::new(anchors(), ManualOverride::new());
        assert_eq!(rig.update(0.0), Some(anchors().wide));
    }

    #[test]
    fn full_zoom_biases_target_towards_reactor() {
        let shot = shot_at(&anchors(), 1.0);
        let expected = anchors()
            .close
            .target
            .lerp(anchors().reactor_bias, REACTOR_BIAS_WEIGHT);
        assert_eq!(shot.position, anchors().close.position);
        assert!((shot.target - expected).length() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        assert_eq!(shot_at(&anchors(), 3.0), shot_at(&anchors(), 1.0));
        assert_eq!(shot_at(&anchors(), -1.0), shot_at(&anchors(), 0.0));
    }

    #[test]
    fn override_suppresses_every_write() {
        let manual = ManualOverride::new();
        let rig = CameraRig::new(anchors(), manual.clone());
        manual.engage();
        assert_eq!(rig.update(0.4), None);
        assert!(!manual.toggle());
        assert!(rig.update(0.4).is_some());
    }

    #[test]
    fn toggle_reports_the_new_state() {
        let manual = ManualOverride::new();
        assert!(manual.toggle());
        assert!(manual.is_engaged());
        assert!(!manual.toggle());
        manual.release();
        assert!(!manual.is_engaged());
    }
}
