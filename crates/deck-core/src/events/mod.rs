use std::any::{Any, TypeId};
use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Deck-wide event bus
///
/// Handlers run synchronously on the publishing thread, in subscription
/// order. A handler must not publish on the same bus.
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by the presentation
pub mod events {
    use super::Event;
    use crate::navigation::Direction;
    use crate::persona::Persona;
    use crate::sequencer::SequencerEvent;

    /// The visible slide changed
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SlideChanged {
        pub from: usize,
        pub to: usize,
        pub direction: Direction,
    }

    /// The persona filter changed
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PersonaChanged {
        pub persona: Persona,
    }

    /// A demo job was submitted and routed
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct JobSubmitted {
        pub queue: String,
        pub target: String,
    }

    /// The demo sequencer fired
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DemoStage(pub SequencerEvent);

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(SlideChanged, PersonaChanged, JobSubmitted, DemoStage);
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn on<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Number of handlers registered for `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::*;
    use super::*;
    use crate::navigation::Direction;
    use crate::persona::Persona;

    #[test]
    fn test_typed_dispatch() {
        let bus = EventBus::new();
        let slides = Arc::new(Mutex::new(Vec::new()));

        let seen = slides.clone();
        bus.on::<SlideChanged, _>(move |event| seen.lock().push(event.to));

        bus.publish(SlideChanged { from: 0, to: 1, direction: Direction::Forward });
        bus.publish(PersonaChanged { persona: Persona::Admin });
        bus.publish(SlideChanged { from: 1, to: 0, direction: Direction::Backward });

        assert_eq!(*slides.lock(), vec![1, 0]);
        assert_eq!(bus.handler_count::<SlideChanged>(), 1);
        assert_eq!(bus.handler_count::<JobSubmitted>(), 0);
    }

    #[test]
    fn test_raw_handler_receives_dyn_event() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));

        let seen = count.clone();
        bus.subscribe::<JobSubmitted>(handler_from_fn(move |event| {
            if event.as_any().is::<JobSubmitted>() {
                *seen.lock() += 1;
            }
        }));

        bus.publish(JobSubmitted { queue: "gpu-queue".to_string(), target: "gpu".to_string() });
        assert_eq!(*count.lock(), 1);
    }
}
