use serde::{Deserialize, Serialize};

/// Direction of the most recent slide transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

impl Direction {
    /// Direction of travel from `from` to `to`
    pub fn between(from: usize, to: usize) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Forward,
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::None,
        }
    }
}

/// Bounded cursor over `count` positions.
///
/// Moving past either end is a no-op; `current` always stays in `[0, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCursor {
    count: usize,
    current: usize,
}

impl StepCursor {
    /// Create a cursor at position 0. `count` is raised to 1 if zero.
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
            current: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.count
    }

    /// Step forward, returning whether the cursor moved
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Step backward, returning whether the cursor moved
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `index`; returns `false` and leaves the cursor alone if out of range
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        self.current = index;
        true
    }

    pub fn first(&mut self) {
        self.current = 0;
    }

    pub fn last(&mut self) {
        self.current = self.count - 1;
    }
}

/// Visual state of a slide indicator dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotState {
    Current,
    Visited,
    Upcoming,
}

/// Read-only snapshot of the deck position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckState {
    pub slide_count: usize,
    pub current_index: usize,
    pub direction: Direction,
}

impl DeckState {
    /// Fraction of the deck shown so far, in `[1/slide_count, 1.0]`
    pub fn progress_fraction(&self) -> f32 {
        (self.current_index + 1) as f32 / self.slide_count as f32
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.slide_count
    }

    /// Indicator state for the dot of slide `index`
    pub fn dot(&self, index: usize) -> DotState {
        match index.cmp(&self.current_index) {
            std::cmp::Ordering::Equal => DotState::Current,
            std::cmp::Ordering::Less => DotState::Visited,
            std::cmp::Ordering::Greater => DotState::Upcoming,
        }
    }
}
