//! Deck subscriber trait

use super::DeckState;

/// Trait for components that need to respond to slide changes
pub trait DeckSubscriber: Send + Sync {
    /// Called after the current slide changes
    fn on_slide_change(&self, state: &DeckState);
}
