use facility_narrative_core::{Color, Easing, Progress, Segment, Segments};
use serde::Serialize;

/// Colour the headline characters start from.
pub const HEADLINE_ACCENT: Color = Color::from_hex(0x1b73e8);

/// Colour the headline characters settle on.
pub const HEADLINE_SETTLED: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Horizontal travel of a headline while it fades in or out, in pixels.
pub const HEADLINE_TRAVEL: f32 = 12.0;

/// Scroll-scrubbed hero headline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Headline {
    /// Copy shown on screen.
    pub text: &'static str,
    opacity: Segments,
    offset: Segments,
    tint: Segments,
}

/// Opening headline, gone by the time the crack appears.
pub const OPENING: Headline = Headline {
    text: "Every tank tells a story",
    opacity: Segments::new(
        0.0,
        &[
            Segment::ramp(0.0, 0.04, 0.0, 1.0, Easing::QuadOut),
            Segment::hold(0.04, 0.08, 1.0),
            Segment::ramp(0.08, 0.10, 1.0, 0.0, Easing::QuadIn),
        ],
    ),
    offset: Segments::new(
        -HEADLINE_TRAVEL,
        &[
            Segment::ramp(0.0, 0.04, -HEADLINE_TRAVEL, 0.0, Easing::QuadOut),
            Segment::hold(0.04, 0.08, 0.0),
            Segment::ramp(0.08, 0.10, 0.0, HEADLINE_TRAVEL, Easing::QuadIn),
        ],
    ),
    tint: Segments::new(
        0.0,
        &[Segment::ramp(0.0, 0.04, 0.0, 1.0, Easing::QuadOut)],
    ),
};

/// Second headline, shown during the sensor flash and gone before the
/// dashboard.
pub const INSTRUMENTED: Headline = Headline {
    text: "Sensors see what eyes cannot",
    opacity: Segments::new(
        0.0,
        &[
            Segment::ramp(0.58, 0.60, 0.0, 1.0, Easing::QuadOut),
            Segment::ramp(0.60, 0.62, 1.0, 0.0, Easing::QuadIn),
        ],
    ),
    offset: Segments::new(
        -HEADLINE_TRAVEL,
        &[
            Segment::ramp(0.58, 0.60, -HEADLINE_TRAVEL, 0.0, Easing::QuadOut),
            Segment::ramp(0.60, 0.62, 0.0, HEADLINE_TRAVEL, Easing::QuadIn),
        ],
    ),
    tint: Segments::new(
        0.0,
        &[Segment::ramp(0.58, 0.60, 0.0, 1.0, Easing::QuadOut)],
    ),
};

/// Every headline in scroll order.
pub const HEADLINES: [Headline; 2] = [OPENING, INSTRUMENTED];

/// Headline appearance at one progress value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeadlineChannel {
    /// Copy shown on screen.
    pub text: &'static str,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Horizontal offset from the resting position.
    pub offset_x: f32,
    /// Text colour, blending from the accent to the settled tone.
    pub color: Color,
}

impl Headline {
    /// Evaluates the headline at `progress`.
    #[must_use]
    pub fn at(&self, progress: Progress) -> HeadlineChannel {
        let opacity = self.opacity.sample(progress);
        HeadlineChannel {
            text: self.text,
            opacity,
            offset_x: self.offset.sample(progress),
            color: HEADLINE_ACCENT
                .lerp(HEADLINE_SETTLED, self.tint.sample(progress))
                .with_alpha(opacity),
        }
    }
}
