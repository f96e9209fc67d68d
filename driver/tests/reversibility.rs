use std::time::Duration;

use facility_narrative_core::Progress;
use facility_narrative_driver::{DriverOptions, FrameDriver};
use facility_narrative_system_camera::ManualOverride;
use facility_narrative_world::standard_tanks;
use proptest::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_detour_returns_to_the_same_scene(
        target in 0.0f32..=1.0,
        detours in prop::collection::vec(0.0f32..=1.0, 1..8),
    ) {
        let (mut driver, mut scene) =
            FrameDriver::setup(standard_tanks(), ManualOverride::new(), DriverOptions::default())
                .expect("standard facility");
        let _ = driver.advance(Progress::new(target), FRAME, &mut scene);
        let first = scene.clone();

        for detour in detours {
            let _ = driver.advance(Progress::new(detour), FRAME, &mut scene);
        }
        let _ = driver.advance(Progress::new(target), FRAME, &mut scene);

        prop_assert_eq!(first, scene);
    }

    #[test]
    fn held_camera_ignores_scrolling(start in 0.0f32..=1.0, end in 0.0f32..=1.0) {
        let manual = ManualOverride::new();
        let (mut driver, mut scene) =
            FrameDriver::setup(standard_tanks(), manual.clone(), DriverOptions::default())
                .expect("standard facility");
        let _ = driver.advance(Progress::new(start), FRAME, &mut scene);
        let held = scene.camera.pose;

        manual.engage();
        let _ = driver.advance(Progress::new(end), FRAME, &mut scene);
        prop_assert_eq!(held, scene.camera.pose);
    }
}
