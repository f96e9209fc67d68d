use crate::{Easing, Progress};

/// Value produced inside a single progress range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Interpolates `from → to` through `easing`.
    Ramp {
        /// Value at the start edge.
        from: f32,
        /// Value at the end edge.
        to: f32,
        /// Curve applied to the linear fraction.
        easing: Easing,
    },
    /// Constant plateau.
    Hold(f32),
}

impl Shape {
    fn at(self, t: f32) -> f32 {
        match self {
            Shape::Ramp { from, to, easing } => from + (to - from) * easing.apply(t),
            Shape::Hold(value) => value,
        }
    }

    const fn terminal(self) -> f32 {
        match self {
            Shape::Ramp { to, .. } => to,
            Shape::Hold(value) => value,
        }
    }
}

/// Progress range mapped through a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Inclusive lower edge.
    pub start: f32,
    /// Exclusive upper edge.
    pub end: f32,
    /// Mapping applied inside the range.
    pub shape: Shape,
}

impl Segment {
    /// Eased ramp between two values.
    #[must_use]
    pub const fn ramp(start: f32, end: f32, from: f32, to: f32, easing: Easing) -> Self {
        Self {
            start,
            end,
            shape: Shape::Ramp { from, to, easing },
        }
    }

    /// Constant plateau.
    #[must_use]
    pub const fn hold(start: f32, end: f32, value: f32) -> Self {
        Self {
            start,
            end,
            shape: Shape::Hold(value),
        }
    }
}

/// Piecewise channel interpolator over progress.
///
/// Ranges must be ordered by `start`. Below the first edge the floor value is
/// returned; past a range, its terminal value is held until the next range
/// begins (or forever, after the last one).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segments {
    floor: f32,
    ranges: &'static [Segment],
}

impl Segments {
    /// Creates a new interpolator.
    #[must_use]
    pub const fn new(floor: f32, ranges: &'static [Segment]) -> Self {
        Self { floor, ranges }
    }

    /// Evaluates the channel at `progress`.
    #[must_use]
    pub fn sample(&self, progress: Progress) -> f32 {
        let p = progress.get();
        let mut value = self.floor;
        for segment in self.ranges {
            if p < segment.start {
                break;
            }
            if p < segment.end && segment.end > segment.start {
                let t = (p - segment.start) / (segment.end - segment.start);
                return segment.shape.at(t);
            }
            value = segment.shape.terminal();
        }
        value
    }

    /// Every edge where the mapping changes, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = f32> + '_ {
        self.ranges
            .iter()
            .flat_map(|segment| [segment.start, segment.end])
    }

    /// First edge of the channel, where it leaves its floor value.
    #[must_use]
    pub fn first_edge(&self) -> Option<f32> {
        self.ranges.first().map(|segment| segment.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATEAU: Segments = Segments::new(
        0.0,
        &[
            Segment::ramp(0.2, 0.4, 0.0, 1.0, Easing::Linear),
            Segment::hold(0.4, 0.6, 1.0),
            Segment::ramp(0.6, 0.8, 1.0, 0.25, Easing::InOut),
        ],
    );

    #[test]
    fn floor_is_returned_below_first_edge() {
        assert_eq!(PLATEAU.sample(Progress::new(0.1)), 0.0);
        assert_eq!(PLATEAU.first_edge(), Some(0.2));
    }

    #[test]
    fn ramp_interpolates_inside_range() {
        assert!((PLATEAU.sample(Progress::new(0.3)) - 0.5).abs() < 1e-5);
        assert!((PLATEAU.sample(Progress::new(0.7)) - 0.625).abs() < 1e-5);
    }

    #[test]
    fn terminal_value_is_held_past_last_edge() {
        assert!((PLATEAU.sample(Progress::new(0.8)) - 0.25).abs() < f32::EPSILON);
        assert!((PLATEAU.sample(Progress::END) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn gaps_between_ranges_hold_the_previous_terminal() {
        const GAPPED: Segments = Segments::new(
            0.0,
            &[
                Segment::ramp(0.1, 0.2, 0.0, 0.5, Easing::Linear),
                Segment::ramp(0.5, 0.6, 0.5, 1.0, Easing::Linear),
            ],
        );
        assert!((GAPPED.sample(Progress::new(0.35)) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn edges_are_listed_in_order() {
        let edges: Vec<f32> = PLATEAU.edges().collect();
        assert_eq!(edges, vec![0.2, 0.4, 0.4, 0.6, 0.6, 0.8]);
    }
}
