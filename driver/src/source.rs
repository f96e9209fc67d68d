//! Where each frame's progress comes from.

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use facility_narrative_core::Progress;

/// Supplies the progress snapshot for a frame.
///
/// The driver calls [`ProgressSource::read`] exactly once per frame and uses
/// the returned value for every channel of that frame.
pub trait ProgressSource {
    /// Progress for the frame that lasted `dt`.
    fn read(&mut self, dt: Duration) -> Progress;
}

/// Integrates mouse-wheel and keyboard input into a progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelScroll {
    progress: Progress,
    sensitivity: f32,
    keyboard_step: f32,
}

impl WheelScroll {
    /// Default progress change per wheel line.
    pub const DEFAULT_SENSITIVITY: f32 = 0.01;

    /// Default progress change per key press.
    pub const DEFAULT_KEYBOARD_STEP: f32 = 0.05;

    /// Creates a source resting at `start`.
    #[must_use]
    pub fn new(start: Progress) -> Self {
        Self {
            progress: start,
            sensitivity: Self::DEFAULT_SENSITIVITY,
            keyboard_step: Self::DEFAULT_KEYBOARD_STEP,
        }
    }

    /// Overrides the progress change per wheel line.
    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Overrides the progress change per key press.
    #[must_use]
    pub fn with_keyboard_step(mut self, keyboard_step: f32) -> Self {
        self.keyboard_step = keyboard_step;
        self
    }

    /// Applies wheel movement in lines; positive moves down the story.
    pub fn scroll(&mut self, lines: f32) {
        self.progress = self.progress.offset(lines * self.sensitivity);
    }

    /// Applies `steps` key presses; negative steps move back.
    pub fn step(&mut self, steps: i32) {
        self.progress = self.progress.offset(steps as f32 * self.keyboard_step);
    }

    /// Current position without consuming a frame.
    #[must_use]
    pub fn position(&self) -> Progress {
        self.progress
    }
}

impl ProgressSource for WheelScroll {
    fn read(&mut self, _dt: Duration) -> Progress {
        self.progress
    }
}

/// Progress pushed from another thread.
///
/// Writers call [`SharedProgress::set`] at any time; the frame loop reads the
/// latest complete value. The value travels as the bits of an `f32`, so a
/// read never observes a torn write.
#[derive(Clone, Debug, Default)]
pub struct SharedProgress(Arc<AtomicU32>);

impl SharedProgress {
    /// Creates a handle initialised to `start`.
    #[must_use]
    pub fn new(start: Progress) -> Self {
        Self(Arc::new(AtomicU32::new(start.get().to_bits())))
    }

    /// Publishes a new progress value.
    pub fn set(&self, progress: Progress) {
        self.0.store(progress.get().to_bits(), Ordering::Release);
    }

    /// Latest published progress.
    #[must_use]
    pub fn get(&self) -> Progress {
        Progress::new(f32::from_bits(self.0.load(Ordering::Acquire)))
    }
}

impl ProgressSource for SharedProgress {
    fn read(&mut self, _dt: Duration) -> Progress {
        self.get()
    }
}

/// Plays the narrative unattended at a constant pace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Autoplay {
    position: f32,
    duration: Duration,
    looping: bool,
}

impl Autoplay {
    /// Plays from the start to the end over `duration`, then holds.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            position: 0.0,
            duration,
            looping: false,
        }
    }

    /// Restarts from the beginning after reaching the end.
    #[must_use]
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }
}

impl ProgressSource for Autoplay {
    fn read(&mut self, dt: Duration) -> Progress {
        let total = self.duration.as_secs_f32();
        if total <= f32::EPSILON {
            return Progress::END;
        }
        let next = self.position + dt.as_secs_f32() / total;
        self.position = if self.looping && next > 1.0 {
            next.fract()
        } else {
            next.min(1.0)
        };
        Progress::new(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn wheel_scroll_clamps_at_both_ends() {
        let mut wheel = WheelScroll::new(Progress::START);
        wheel.scroll(-30.0);
        assert_eq!(wheel.read(FRAME), Progress::START);
        wheel.scroll(500.0);
        assert_eq!(wheel.read(FRAME), Progress::END);
    }

    #[test]
    fn keyboard_steps_use_their_own_increment() {
        let mut wheel = WheelScroll::new(Progress::new(0.5)).with_keyboard_step(0.1);
        wheel.step(-2);
        assert!((wheel.position().get() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn shared_progress_is_visible_through_every_clone() {
        let writer = SharedProgress::new(Progress::START);
        let mut reader = writer.clone();
        writer.set(Progress::new(0.42));
        assert_eq!(reader.read(FRAME), Progress::new(0.42));
    }

    #[test]
    fn shared_progress_survives_cross_thread_writes() {
        let writer = SharedProgress::new(Progress::START);
        let handle = {
            let writer = writer.clone();
            std::thread::spawn(move || writer.set(Progress::new(0.75)))
        };
        handle.join().expect("writer thread finished");
        assert_eq!(writer.get(), Progress::new(0.75));
    }

    #[test]
    fn autoplay_reaches_the_end_and_holds() {
        let mut autoplay = Autoplay::new(Duration::from_secs(2));
        assert!((autoplay.read(Duration::from_secs(1)).get() - 0.5).abs() < 1e-6);
        assert_eq!(autoplay.read(Duration::from_secs(5)), Progress::END);
        assert_eq!(autoplay.read(FRAME), Progress::END);
    }

    #[test]
    fn looping_autoplay_wraps_around() {
        let mut autoplay = Autoplay::new(Duration::from_secs(4)).looping();
        let _ = autoplay.read(Duration::from_secs(3));
        let wrapped = autoplay.read(Duration::from_secs(2)).get();
        assert!((wrapped - 0.25).abs() < 1e-5);
    }
}
