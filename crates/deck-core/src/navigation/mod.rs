use serde::{Deserialize, Serialize};

mod engine;
mod position;
mod section;
mod subscriber;

pub use engine::DeckNavigator;
pub use position::{DeckState, Direction, DotState, StepCursor};
pub use section::{Section, SectionTable};
pub use subscriber::DeckSubscriber;

/// Already-decoded navigation request from the input layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Next,
    Previous,
    GoToIndex(usize),
    GoToSection(String),
}

impl Intent {
    /// Map a digit keypress (1-9) to a jump.
    ///
    /// Digits beyond the deck size, and 0, map to nothing.
    pub fn from_digit(digit: u8, slide_count: usize) -> Option<Intent> {
        if (1..=9).contains(&digit) && (digit as usize) <= slide_count {
            Some(Intent::GoToIndex(digit as usize - 1))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_mapping() {
        assert_eq!(Intent::from_digit(1, 4), Some(Intent::GoToIndex(0)));
        assert_eq!(Intent::from_digit(4, 4), Some(Intent::GoToIndex(3)));
        assert_eq!(Intent::from_digit(5, 4), None);
        assert_eq!(Intent::from_digit(0, 4), None);
        assert_eq!(Intent::from_digit(9, 12), Some(Intent::GoToIndex(8)));
    }
}
