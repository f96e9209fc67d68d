//! Channels that drive the rendered scene.
//!
//! These are the canonical timings: everything the frame driver writes into
//! the scene is derived from the instances below.

use facility_narrative_core::{Easing, Segment, Segments};

/// Leak stream growth and retraction.
pub const LEAK_FORM: Segments = Segments::new(
    0.0,
    &[
        Segment::ramp(0.1, 0.3, 0.0, 1.0, Easing::Linear),
        Segment::hold(0.3, 0.65, 1.0),
        Segment::ramp(0.65, 0.8, 1.0, 0.0, Easing::InOut),
    ],
);

/// Leak streams are drawn only while the form fraction exceeds this value.
pub const LEAK_VISIBLE_THRESHOLD: f32 = 0.01;

/// Crack line opacity before the alpha scale is applied.
pub const CRACK_OPACITY: Segments = Segments::new(
    0.0,
    &[
        Segment::ramp(0.1, 0.3, 0.0, 1.0, Easing::InOut),
        Segment::hold(0.3, 0.65, 1.0),
        Segment::ramp(0.65, 0.8, 1.0, 0.05, Easing::InOut),
    ],
);

/// Maximum alpha of the crack line.
pub const CRACK_ALPHA_SCALE: f32 = 0.82;

/// Water level drop, as a fraction of [`MAX_WATER_DROP`].
pub const WATER_DROP: Segments = Segments::new(
    0.0,
    &[
        Segment::ramp(0.25, 0.55, 0.0, 1.0, Easing::Linear),
        Segment::hold(0.55, 0.92, 1.0),
        Segment::ramp(0.92, 1.0, 1.0, 0.0, Easing::InOut),
    ],
);

/// Largest fraction of the water column lost to the leak.
pub const MAX_WATER_DROP: f32 = 0.20;

/// Water contamination.
pub const WATER_DEGRADATION: Segments = Segments::new(
    0.0,
    &[
        Segment::ramp(0.35, 0.75, 0.0, 1.0, Easing::InOut),
        Segment::hold(0.75, 0.92, 1.0),
        Segment::ramp(0.92, 1.0, 1.0, 0.0, Easing::InOut),
    ],
);

/// Mechanical slide of the sensors onto the reactor.
pub const SENSOR_SLIDE: Segments = Segments::new(
    0.0,
    &[Segment::ramp(0.5, 0.65, 0.0, 1.0, Easing::CubicOut)],
);

/// Sensors are hidden below this progress.
pub const SENSORS_VISIBLE_FROM: f32 = 0.5;

/// Triangular attach flash, peaking in the middle of its window.
pub const SENSOR_PULSE: Segments = Segments::new(
    0.0,
    &[
        Segment::ramp(0.58, 0.6, 0.0, 1.0, Easing::Linear),
        Segment::ramp(0.6, 0.62, 1.0, 0.0, Easing::Linear),
    ],
);

/// Emissive intensity at the peak of the attach flash.
pub const SENSOR_PULSE_PEAK: f32 = 0.7;

/// Camera blend from the wide to the close shot.
pub const CAMERA_ZOOM: Segments = Segments::new(
    0.0,
    &[Segment::ramp(0.15, 0.5, 0.0, 1.0, Easing::InOut)],
);

/// Orbit controls stay enabled until the zoom starts.
pub const ORBIT_ENABLED_BELOW: f32 = 0.15;

/// Dashboard appears once the attach flash is over.
pub const DASHBOARD_START: f32 = 0.63;

/// Status indicator turns amber.
pub const AMBER_START: f32 = 0.78;

/// Status indicator turns green.
pub const GREEN_START: f32 = 0.9;
