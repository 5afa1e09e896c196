//! Deck navigator implementation

use super::{DeckState, DeckSubscriber, Direction, Intent, Section, SectionTable, StepCursor};
use crate::{DeckError, Result};
use std::sync::{Arc, Weak};
use parking_lot::RwLock;
use tracing::debug;

/// Navigation state stored internally
#[derive(Debug, Clone)]
struct NavState {
    cursor: StepCursor,
    direction: Direction,
}

impl NavState {
    fn snapshot(&self) -> DeckState {
        DeckState {
            slide_count: self.cursor.count(),
            current_index: self.cursor.current(),
            direction: self.direction,
        }
    }
}

/// Single source of truth for which slide is visible
pub struct DeckNavigator {
    state: Arc<RwLock<NavState>>,
    sections: SectionTable,
    subscribers: Arc<RwLock<Vec<Weak<dyn DeckSubscriber>>>>,
}

impl DeckNavigator {
    /// Create a navigator without sections
    pub fn new(slide_count: usize) -> Result<Self> {
        Self::build(slide_count, SectionTable::default())
    }

    /// Create a navigator whose sections must cover every slide exactly once
    pub fn with_sections(slide_count: usize, sections: Vec<Section>) -> Result<Self> {
        let table = SectionTable::new(sections, slide_count)?;
        Self::build(slide_count, table)
    }

    fn build(slide_count: usize, sections: SectionTable) -> Result<Self> {
        if slide_count == 0 {
            return Err(DeckError::InvalidDeckConfig("a deck needs at least one slide".to_string()));
        }

        let state = NavState {
            cursor: StepCursor::new(slide_count),
            direction: Direction::None,
        };

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            sections,
            subscribers: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Current deck snapshot
    pub fn state(&self) -> DeckState {
        self.state.read().snapshot()
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// Advance one slide. No-op on the last slide.
    pub fn go_next(&self) -> DeckState {
        let mut state = self.state.write();
        if !state.cursor.next() {
            return state.snapshot();
        }
        state.direction = Direction::Forward;
        let snapshot = state.snapshot();
        drop(state);

        self.notify_subscribers(&snapshot);
        snapshot
    }

    /// Go back one slide. No-op on the first slide.
    pub fn go_previous(&self) -> DeckState {
        let mut state = self.state.write();
        if !state.cursor.previous() {
            return state.snapshot();
        }
        state.direction = Direction::Backward;
        let snapshot = state.snapshot();
        drop(state);

        self.notify_subscribers(&snapshot);
        snapshot
    }

    /// Jump to a specific slide
    pub fn go_to(&self, index: usize) -> Result<DeckState> {
        let mut state = self.state.write();
        let from = state.cursor.current();

        if !state.cursor.go_to(index) {
            return Err(DeckError::OutOfRange {
                index,
                slide_count: state.cursor.count(),
            });
        }

        state.direction = Direction::between(from, index);
        let snapshot = state.snapshot();
        drop(state);

        if from != index {
            self.notify_subscribers(&snapshot);
        }
        Ok(snapshot)
    }

    /// Jump to the first slide of a section
    pub fn go_to_section(&self, section_id: &str) -> Result<DeckState> {
        let index = self
            .sections
            .get(section_id)
            .and_then(Section::first_slide)
            .ok_or_else(|| DeckError::UnknownSection(section_id.to_string()))?;
        self.go_to(index)
    }

    /// Apply a decoded input intent
    pub fn apply(&self, intent: &Intent) -> Result<DeckState> {
        let state = match intent {
            Intent::Next => self.go_next(),
            Intent::Previous => self.go_previous(),
            Intent::GoToIndex(index) => self.go_to(*index)?,
            Intent::GoToSection(id) => self.go_to_section(id)?,
        };
        debug!(?intent, index = state.current_index, "navigation applied");
        Ok(state)
    }

    /// Fraction of the deck shown so far
    pub fn progress_fraction(&self) -> f32 {
        self.state().progress_fraction()
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn DeckSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Notify all subscribers of a slide change
    fn notify_subscribers(&self, state: &DeckState) {
        let live: Vec<Arc<dyn DeckSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        // Callbacks may subscribe again, so the lock is released first
        for subscriber in live {
            subscriber.on_slide_change(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        seen: Mutex<Vec<usize>>,
    }

    impl DeckSubscriber for Recorder {
        fn on_slide_change(&self, state: &DeckState) {
            self.seen.lock().push(state.current_index);
        }
    }

    #[test]
    fn test_round_trip_with_boundaries() {
        let nav = DeckNavigator::new(4).unwrap();

        for _ in 0..3 {
            nav.go_next();
        }
        assert_eq!(nav.state().current_index, 3);

        let at_end = nav.state();
        assert_eq!(nav.go_next(), at_end);

        for _ in 0..4 {
            nav.go_previous();
        }
        assert_eq!(nav.state().current_index, 0);

        let at_start = nav.state();
        assert_eq!(nav.go_previous(), at_start);
    }

    #[test]
    fn test_index_stays_in_bounds_for_mixed_sequences() {
        for slide_count in 1..6 {
            let nav = DeckNavigator::new(slide_count).unwrap();
            // Deterministic pseudo-random walk
            let mut seed: u32 = 0x9e37_79b9 ^ slide_count as u32;
            for _ in 0..200 {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let state = if seed >> 31 == 0 { nav.go_next() } else { nav.go_previous() };
                assert!(state.current_index < slide_count);
            }
        }
    }

    #[test]
    fn test_go_to_sets_direction() {
        let nav = DeckNavigator::new(5).unwrap();

        let state = nav.go_to(3).unwrap();
        assert_eq!(state.current_index, 3);
        assert_eq!(state.direction, Direction::Forward);

        let state = nav.go_to(1).unwrap();
        assert_eq!(state.direction, Direction::Backward);

        let state = nav.go_to(1).unwrap();
        assert_eq!(state.direction, Direction::None);
    }

    #[test]
    fn test_go_to_out_of_range_leaves_state() {
        let nav = DeckNavigator::new(3).unwrap();
        nav.go_next();

        let err = nav.go_to(3).unwrap_err();
        assert!(matches!(err, DeckError::OutOfRange { index: 3, slide_count: 3 }));
        assert_eq!(nav.state().current_index, 1);
    }

    #[test]
    fn test_section_jump() {
        let nav = DeckNavigator::with_sections(
            4,
            vec![Section::new("intro", [0]), Section::new("demo", [1, 2, 3])],
        ).unwrap();

        let state = nav.go_to_section("demo").unwrap();
        assert_eq!(state.current_index, 1);
        assert_eq!(state.direction, Direction::Forward);

        let err = nav.go_to_section("bogus").unwrap_err();
        assert!(matches!(err, DeckError::UnknownSection(ref id) if id == "bogus"));
        assert_eq!(nav.state().current_index, 1);
    }

    #[test]
    fn test_progress_fraction_bounds() {
        let nav = DeckNavigator::new(4).unwrap();
        assert_eq!(nav.progress_fraction(), 0.25);

        let mut last = nav.progress_fraction();
        for _ in 0..3 {
            nav.go_next();
            let progress = nav.progress_fraction();
            assert!(progress >= last);
            last = progress;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_zero_slides_rejected() {
        assert!(matches!(DeckNavigator::new(0), Err(DeckError::InvalidDeckConfig(_))));
    }

    #[test]
    fn test_subscribers_only_see_real_changes() {
        let nav = DeckNavigator::new(2).unwrap();
        let recorder = Arc::new(Recorder { seen: Mutex::new(Vec::new()) });
        nav.add_subscriber(recorder.clone());

        nav.go_previous();
        nav.go_next();
        nav.go_next();
        nav.apply(&Intent::GoToIndex(0)).unwrap();

        assert_eq!(*recorder.seen.lock(), vec![1, 0]);
    }

    struct Chaining {
        nav: Weak<DeckNavigator>,
        late: Arc<Recorder>,
    }

    impl DeckSubscriber for Chaining {
        fn on_slide_change(&self, _state: &DeckState) {
            if let Some(nav) = self.nav.upgrade() {
                nav.add_subscriber(self.late.clone());
            }
        }
    }

    #[test]
    fn test_subscribe_from_callback() {
        let nav = Arc::new(DeckNavigator::new(3).unwrap());
        let late = Arc::new(Recorder { seen: Mutex::new(Vec::new()) });
        let chaining = Arc::new(Chaining {
            nav: Arc::downgrade(&nav),
            late: late.clone(),
        });
        nav.add_subscriber(chaining.clone());

        nav.go_next();
        assert!(late.seen.lock().is_empty());

        nav.go_next();
        assert_eq!(*late.seen.lock(), vec![2]);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let nav = DeckNavigator::new(3).unwrap();
        {
            let recorder = Arc::new(Recorder { seen: Mutex::new(Vec::new()) });
            nav.add_subscriber(recorder);
        }
        nav.go_next();
        assert!(nav.subscribers.read().is_empty());
    }
}
