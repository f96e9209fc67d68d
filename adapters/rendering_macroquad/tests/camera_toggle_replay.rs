use facility_narrative_rendering_macroquad::{
    frame_input_from_observations, CameraToggleLatch, InputObservations,
};

fn run_sequence(buttons: &[bool], keys: &[bool]) -> Vec<bool> {
    let mut latch = CameraToggleLatch::default();
    let mut toggles = Vec::new();
    for (&button, &key) in buttons.iter().zip(keys) {
        let input = frame_input_from_observations(InputObservations {
            toggle_key: key,
            toggle_button: latch.take(),
            ..InputObservations::default()
        });
        toggles.push(input.toggle_override);
        if button {
            latch.register();
        }
    }

    // Flush any trailing latched press so the harness observes the final toggle.
    toggles.push(latch.take());
    toggles
}

#[test]
fn camera_button_toggles_fire_once_on_the_following_frame() {
    let buttons = [false, true, false, true, true, false];
    let keys = [false; 6];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_sequence(&buttons, &keys);
    let second_run = run_sequence(&buttons, &keys);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn key_press_alone_toggles_in_the_same_frame() {
    let buttons = [false; 4];
    let keys = [true, false, false, true];
    assert_eq!(
        run_sequence(&buttons, &keys),
        vec![true, false, false, true, false]
    );
}
