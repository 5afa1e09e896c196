//! Slide-in animation driven by navigator notifications

use std::time::{Duration, Instant};
use parking_lot::Mutex;
use deck_core::{DeckState, DeckSubscriber, Direction};

#[derive(Debug, Clone, Copy)]
struct Transition {
    direction: Direction,
    started: Instant,
}

/// Tracks the most recent slide change so the renderer can slide content in.
///
/// Registered with the navigator as a subscriber, so only real slide
/// changes restart the animation.
pub struct SlideTransition {
    duration: Duration,
    current: Mutex<Option<Transition>>,
}

impl SlideTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: Mutex::new(None),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether content is still moving at `now`
    pub fn is_animating(&self, now: Instant) -> bool {
        self.progress(now) < 1.0
    }

    /// Eased progress in `[0, 1]`; 1.0 when idle
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(transition) = *self.current.lock() else {
            return 1.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.saturating_duration_since(transition.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        // ease-out cubic
        1.0 - (1.0 - t).powi(3)
    }

    /// Horizontal offset of the incoming slide as a fraction of its width.
    ///
    /// Forward moves come in from the right (positive), backward moves
    /// from the left.
    pub fn offset(&self, now: Instant) -> f32 {
        let direction = match *self.current.lock() {
            Some(transition) => transition.direction,
            None => return 0.0,
        };
        let remaining = 1.0 - self.progress(now);
        match direction {
            Direction::Forward => remaining,
            Direction::Backward => -remaining,
            Direction::None => 0.0,
        }
    }

    fn begin(&self, direction: Direction, started: Instant) {
        *self.current.lock() = Some(Transition { direction, started });
    }
}

impl Default for SlideTransition {
    fn default() -> Self {
        Self::new(Duration::from_millis(350))
    }
}

impl DeckSubscriber for SlideTransition {
    fn on_slide_change(&self, state: &DeckState) {
        self.begin(state.direction, Instant::now());
    }
}
