//! Keyboard to navigation intent mapping

use egui::Key;
use deck_core::Intent;

const DIGIT_KEYS: [Key; 9] = [
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

/// Intents for the keys pressed this frame, in a fixed order
pub fn intents_for_keys(pressed: impl Fn(Key) -> bool, slide_count: usize) -> Vec<Intent> {
    let mut intents = Vec::new();

    if pressed(Key::ArrowRight) || pressed(Key::Space) {
        intents.push(Intent::Next);
    }
    if pressed(Key::ArrowLeft) {
        intents.push(Intent::Previous);
    }

    for (digit, key) in (1u8..).zip(DIGIT_KEYS) {
        if pressed(key) {
            // Digits beyond the deck are ignored
            intents.extend(Intent::from_digit(digit, slide_count));
        }
    }

    intents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(key: Key) -> impl Fn(Key) -> bool {
        move |candidate| candidate == key
    }

    #[test]
    fn test_arrows_and_space() {
        assert_eq!(intents_for_keys(only(Key::ArrowRight), 4), vec![Intent::Next]);
        assert_eq!(intents_for_keys(only(Key::Space), 4), vec![Intent::Next]);
        assert_eq!(intents_for_keys(only(Key::ArrowLeft), 4), vec![Intent::Previous]);
        assert!(intents_for_keys(only(Key::Enter), 4).is_empty());
    }

    #[test]
    fn test_digits_jump_within_deck() {
        assert_eq!(intents_for_keys(only(Key::Num1), 4), vec![Intent::GoToIndex(0)]);
        assert_eq!(intents_for_keys(only(Key::Num4), 4), vec![Intent::GoToIndex(3)]);
        assert!(intents_for_keys(only(Key::Num5), 4).is_empty());
        assert!(intents_for_keys(only(Key::Num9), 4).is_empty());
    }
}
