use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::config::DeckConfig;
use crate::events::events::{DemoStage, JobSubmitted, PersonaChanged, SlideChanged};
use crate::events::EventBus;
use crate::job_flow::{find_queue, job_flow_script, pick_target};
use crate::navigation::{DeckNavigator, DeckState, Intent, StepCursor};
use crate::persona::Persona;
use crate::sequencer::{EventSink, Sequencer, SequencerDriver, SequencerEvent, SequencerState};
use crate::slides::{SlideContext, SlideDescriptor, SlideKind, ARCHITECTURE_STEPS};
use crate::{DeckError, Result};

/// The running job-flow demo, clocked by hand or by tokio timers
enum DemoSession {
    Manual(Sequencer),
    Driven(SequencerDriver),
}

impl DemoSession {
    fn start(&mut self) {
        match self {
            DemoSession::Manual(sequencer) => sequencer.start(),
            DemoSession::Driven(driver) => driver.start(),
        }
    }

    fn stop(&mut self) {
        match self {
            DemoSession::Manual(sequencer) => sequencer.stop(),
            DemoSession::Driven(driver) => driver.stop(),
        }
    }

    /// Manual step; returns events the caller still has to publish
    fn step_forward(&mut self) -> (SequencerState, Vec<SequencerEvent>) {
        match self {
            DemoSession::Manual(sequencer) => {
                let state = sequencer.step_forward();
                (state, sequencer.take_events())
            }
            DemoSession::Driven(driver) => (driver.step_forward(), Vec::new()),
        }
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<SequencerEvent> {
        match self {
            DemoSession::Manual(sequencer) => sequencer.advance(elapsed),
            DemoSession::Driven(_) => Vec::new(),
        }
    }

    fn snapshot(&self) -> SequencerState {
        match self {
            DemoSession::Manual(sequencer) => sequencer.snapshot(),
            DemoSession::Driven(driver) => driver.snapshot(),
        }
    }

    fn is_running(&self) -> bool {
        match self {
            DemoSession::Manual(sequencer) => sequencer.is_running(),
            DemoSession::Driven(driver) => driver.is_running(),
        }
    }
}

/// Application state of the deck
///
/// Composes the navigator, the architecture stepper, the persona filter
/// and the demo session. The demo only exists while the demo slide is
/// visible; leaving the slide stops and drops it, cancelling its timers.
pub struct Presentation {
    config: DeckConfig,
    navigator: Arc<DeckNavigator>,
    architecture: StepCursor,
    persona: Persona,
    event_bus: Arc<EventBus>,
    runtime: Option<Handle>,
    demo: Option<DemoSession>,
    active_queue: String,
}

impl Presentation {
    /// Presentation whose demo is clocked through [`Presentation::tick`]
    pub fn new(config: DeckConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Presentation whose demo runs on tokio timers
    pub fn with_runtime(config: DeckConfig, runtime: Handle) -> Result<Self> {
        Self::build(config, Some(runtime))
    }

    fn build(config: DeckConfig, runtime: Option<Handle>) -> Result<Self> {
        config.validate()?;
        let navigator = DeckNavigator::with_sections(config.slide_count(), config.resolve_sections())?;

        info!(slides = config.slide_count(), realtime = runtime.is_some(), "presentation ready");

        let mut presentation = Self {
            active_queue: config.demo.default_queue.clone(),
            config,
            navigator: Arc::new(navigator),
            architecture: StepCursor::new(ARCHITECTURE_STEPS.len()),
            persona: Persona::default(),
            event_bus: Arc::new(EventBus::new()),
            runtime,
            demo: None,
        };
        presentation.sync_demo();
        Ok(presentation)
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn navigator(&self) -> &Arc<DeckNavigator> {
        &self.navigator
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn deck_state(&self) -> DeckState {
        self.navigator.state()
    }

    /// Apply a navigation intent. Invalid targets are logged and ignored.
    pub fn handle(&mut self, intent: &Intent) -> DeckState {
        let before = self.navigator.state();

        let after = match self.navigator.apply(intent) {
            Ok(state) => state,
            Err(err) => {
                warn!(%err, ?intent, "navigation ignored");
                return before;
            }
        };

        if after.current_index != before.current_index {
            debug!(from = before.current_index, to = after.current_index, "slide changed");
            if matches!(self.slide_kind(before.current_index), Some(SlideKind::Architecture { .. })) {
                self.architecture.first();
            }
            self.event_bus.publish(SlideChanged {
                from: before.current_index,
                to: after.current_index,
                direction: after.direction,
            });
            self.sync_demo();
        }

        after
    }

    /// Descriptor of the visible slide
    pub fn current_descriptor(&self) -> &SlideDescriptor {
        let index = self.navigator.state().current_index;
        &self.config.slides[index.min(self.config.slides.len() - 1)]
    }

    /// Kind of the visible slide, with the live architecture step
    pub fn current_slide(&self) -> SlideKind {
        match self.current_descriptor().kind {
            SlideKind::Architecture { .. } => SlideKind::Architecture {
                step: self.architecture.current(),
            },
            kind => kind,
        }
    }

    pub fn slide_context(&self) -> SlideContext {
        let state = self.navigator.state();
        SlideContext {
            index: state.current_index,
            slide_count: state.slide_count,
            persona: self.persona,
        }
    }

    fn slide_kind(&self, index: usize) -> Option<SlideKind> {
        self.config.slides.get(index).map(|slide| slide.kind)
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn set_persona(&mut self, persona: Persona) {
        if self.persona == persona {
            return;
        }
        self.persona = persona;
        debug!(?persona, "persona changed");
        self.event_bus.publish(PersonaChanged { persona });
    }

    /// The toggle is hidden on the first slide
    pub fn persona_toggle_visible(&self) -> bool {
        !self.navigator.state().is_first()
    }

    pub fn architecture(&self) -> &StepCursor {
        &self.architecture
    }

    pub fn architecture_next(&mut self) -> bool {
        self.architecture.next()
    }

    pub fn architecture_previous(&mut self) -> bool {
        self.architecture.previous()
    }

    pub fn architecture_go_to(&mut self, step: usize) -> bool {
        self.architecture.go_to(step)
    }

    pub fn architecture_first(&mut self) {
        self.architecture.first();
    }

    pub fn architecture_last(&mut self) {
        self.architecture.last();
    }

    /// Queue the demo job is submitted to
    pub fn active_queue(&self) -> &str {
        &self.active_queue
    }

    /// Submit a demo job to `queue`, replacing the running script.
    ///
    /// A one-shot job must finish before another can be submitted. Off the
    /// demo slide only the queue is remembered for the next mount.
    pub fn submit_job(&mut self, queue: &str) -> Result<()> {
        let target = pick_target(find_queue(queue)?)
            .map(|cluster| cluster.id.to_string())
            .unwrap_or_default();

        if !self.config.demo.looping && self.demo.as_ref().map_or(false, DemoSession::is_running) {
            return Err(DeckError::JobInFlight);
        }

        self.active_queue = queue.to_string();
        if !self.current_slide().is_demo() {
            return Ok(());
        }

        self.unmount_demo();
        self.mount_demo(true)?;

        info!(queue, target = %target, "job submitted");
        self.event_bus.publish(JobSubmitted {
            queue: queue.to_string(),
            target,
        });
        Ok(())
    }

    /// Advance a manually clocked demo. No-op when driven by tokio.
    pub fn tick(&mut self, elapsed: Duration) {
        let events = match self.demo.as_mut() {
            Some(demo) => demo.advance(elapsed),
            None => return,
        };
        self.publish_demo_events(&events);
    }

    pub fn demo_state(&self) -> Option<SequencerState> {
        self.demo.as_ref().map(DemoSession::snapshot)
    }

    pub fn demo_running(&self) -> bool {
        self.demo.as_ref().map_or(false, DemoSession::is_running)
    }

    pub fn play_demo(&mut self) {
        if let Some(demo) = self.demo.as_mut() {
            demo.start();
        }
    }

    pub fn pause_demo(&mut self) {
        if let Some(demo) = self.demo.as_mut() {
            demo.stop();
        }
    }

    /// Apply the next demo stage by hand
    pub fn step_demo(&mut self) -> Option<SequencerState> {
        let (state, events) = self.demo.as_mut()?.step_forward();
        self.publish_demo_events(&events);
        Some(state)
    }

    fn publish_demo_events(&self, events: &[SequencerEvent]) {
        for event in events {
            self.event_bus.publish(DemoStage(event.clone()));
        }
    }

    /// Mount or unmount the demo to match the visible slide
    fn sync_demo(&mut self) {
        let on_demo = self.current_slide().is_demo();

        if on_demo && self.demo.is_none() {
            if let Err(err) = self.mount_demo(self.config.demo.auto_start) {
                warn!(%err, queue = %self.active_queue, "demo could not be mounted");
            }
        } else if !on_demo && self.demo.is_some() {
            self.unmount_demo();
        }
    }

    /// Build the session for the active queue, starting it when `start` is set
    fn mount_demo(&mut self, start: bool) -> Result<()> {
        let script = job_flow_script(&self.active_queue, &self.config.demo)?;
        let sequencer = Sequencer::new(script);

        let mut session = match &self.runtime {
            Some(runtime) => {
                let bus = self.event_bus.clone();
                let sink: EventSink = Arc::new(move |events: &[SequencerEvent]| {
                    for event in events {
                        bus.publish(DemoStage(event.clone()));
                    }
                });
                DemoSession::Driven(SequencerDriver::new(sequencer, runtime.clone(), sink))
            }
            None => DemoSession::Manual(sequencer),
        };

        if start {
            session.start();
        }
        debug!(queue = %self.active_queue, running = start, "demo mounted");
        self.demo = Some(session);
        Ok(())
    }

    fn unmount_demo(&mut self) {
        if let Some(mut demo) = self.demo.take() {
            demo.stop();
            debug!("demo unmounted");
        }
    }
}

impl Drop for Presentation {
    fn drop(&mut self) {
        self.unmount_demo();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;
    use crate::job_flow::{JobState, JOB};
    use parking_lot::Mutex;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn one_shot() -> DeckConfig {
        DeckConfig {
            demo: DemoConfig { looping: false, ..DemoConfig::default() },
            ..DeckConfig::default()
        }
    }

    fn job_state(presentation: &Presentation) -> JobState {
        let demo = presentation.demo_state().unwrap();
        JobState::from_label(&demo.entities[JOB].label)
    }

    #[test]
    fn test_navigation_publishes_slide_changes() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let seen = changes.clone();
        presentation.event_bus().on::<SlideChanged, _>(move |event| seen.lock().push((event.from, event.to)));

        presentation.handle(&Intent::Next);
        presentation.handle(&Intent::Previous);
        presentation.handle(&Intent::Previous);
        presentation.handle(&Intent::GoToSection("personas".to_string()));

        assert_eq!(*changes.lock(), vec![(0, 1), (1, 0), (0, 2)]);
    }

    #[test]
    fn test_invalid_navigation_is_ignored() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        presentation.handle(&Intent::Next);

        let state = presentation.handle(&Intent::GoToIndex(9));
        assert_eq!(state.current_index, 1);

        let state = presentation.handle(&Intent::GoToSection("nowhere".to_string()));
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_demo_lives_only_on_demo_slide() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        assert!(presentation.demo_state().is_none());

        presentation.handle(&Intent::GoToIndex(3));
        assert!(presentation.demo_running());

        presentation.tick(ms(0));
        assert_eq!(job_state(&presentation), JobState::Submitting);

        presentation.handle(&Intent::Previous);
        assert!(presentation.demo_state().is_none());
        assert!(!presentation.demo_running());
    }

    #[test]
    fn test_demo_restarts_from_idle_on_remount() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        presentation.handle(&Intent::GoToIndex(3));
        presentation.tick(ms(1500));
        assert_eq!(job_state(&presentation), JobState::Routing);

        presentation.handle(&Intent::Previous);
        presentation.handle(&Intent::Next);
        assert_eq!(job_state(&presentation), JobState::Idle);
    }

    #[test]
    fn test_demo_events_reach_bus() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        let stages = Arc::new(Mutex::new(Vec::new()));

        let seen = stages.clone();
        presentation.event_bus().on::<DemoStage, _>(move |event| seen.lock().push(event.0.clone()));

        presentation.handle(&Intent::GoToIndex(3));
        presentation.tick(ms(600));
        presentation.step_demo();

        let stages = stages.lock();
        assert_eq!(stages.len(), 3);
        assert!(matches!(stages[2], SequencerEvent::StageApplied { index: 2, .. }));
    }

    #[test]
    fn test_submit_job_routes_to_best_cluster() {
        let mut presentation = Presentation::new(one_shot()).unwrap();
        let submitted = Arc::new(Mutex::new(Vec::new()));

        let seen = submitted.clone();
        presentation.event_bus().on::<JobSubmitted, _>(move |event| seen.lock().push(event.target.clone()));

        presentation.handle(&Intent::GoToIndex(3));
        presentation.tick(ms(6000));
        assert!(!presentation.demo_running());

        presentation.submit_job("gold-queue").unwrap();
        presentation.tick(ms(2400));
        assert_eq!(job_state(&presentation), JobState::Running);

        let demo = presentation.demo_state().unwrap();
        assert_eq!(demo.entities["cluster:gold"].status, crate::EntityStatus::Running);
        assert_eq!(*submitted.lock(), vec!["gold".to_string()]);
    }

    #[test]
    fn test_submit_runs_job_without_auto_start() {
        let config = DeckConfig {
            demo: DemoConfig {
                looping: false,
                auto_start: false,
                ..DemoConfig::default()
            },
            ..DeckConfig::default()
        };
        let mut presentation = Presentation::new(config).unwrap();

        presentation.handle(&Intent::GoToIndex(3));
        assert!(!presentation.demo_running());
        presentation.tick(ms(2400));
        assert_eq!(job_state(&presentation), JobState::Idle);

        presentation.submit_job("gold-queue").unwrap();
        assert!(presentation.demo_running());
        presentation.tick(ms(2400));
        assert_eq!(job_state(&presentation), JobState::Running);

        presentation.tick(ms(3100));
        assert!(!presentation.demo_running());
        assert_eq!(job_state(&presentation), JobState::Idle);
    }

    #[test]
    fn test_submit_rules() {
        let mut presentation = Presentation::new(one_shot()).unwrap();
        presentation.handle(&Intent::GoToIndex(3));

        assert!(matches!(presentation.submit_job("tpu-queue"), Err(DeckError::UnknownQueue(_))));
        assert!(matches!(presentation.submit_job("cpu-queue"), Err(DeckError::JobInFlight)));

        presentation.tick(ms(5500));
        assert!(presentation.submit_job("cpu-queue").is_ok());
        assert_eq!(presentation.active_queue(), "cpu-queue");
    }

    #[test]
    fn test_submit_off_demo_slide_only_remembers_queue() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        presentation.submit_job("gold-queue").unwrap();
        assert!(presentation.demo_state().is_none());

        presentation.handle(&Intent::GoToIndex(3));
        presentation.tick(ms(2400));
        let demo = presentation.demo_state().unwrap();
        assert_eq!(demo.entities["cluster:gold"].status, crate::EntityStatus::Running);
    }

    #[test]
    fn test_persona_toggle() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        let changes = Arc::new(Mutex::new(0));

        let seen = changes.clone();
        presentation.event_bus().on::<PersonaChanged, _>(move |_| *seen.lock() += 1);

        assert!(!presentation.persona_toggle_visible());
        presentation.handle(&Intent::Next);
        assert!(presentation.persona_toggle_visible());

        presentation.set_persona(Persona::Admin);
        presentation.set_persona(Persona::Admin);
        assert_eq!(*changes.lock(), 1);
        assert_eq!(presentation.slide_context().persona, Persona::Admin);
        assert_eq!(presentation.deck_state().current_index, 1);
    }

    #[test]
    fn test_architecture_step_tracks_stepper() {
        let mut presentation = Presentation::new(DeckConfig::default()).unwrap();
        presentation.handle(&Intent::Next);

        assert!(presentation.architecture_next());
        assert!(presentation.architecture_next());
        assert_eq!(presentation.current_slide(), SlideKind::Architecture { step: 2 });

        presentation.architecture_last();
        assert!(!presentation.architecture_next());

        // Leaving the slide resets the build-up
        presentation.handle(&Intent::Next);
        presentation.handle(&Intent::Previous);
        assert_eq!(presentation.current_slide(), SlideKind::Architecture { step: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_driven_demo_stops_when_slide_left() {
        let mut presentation = Presentation::with_runtime(DeckConfig::default(), Handle::current()).unwrap();
        let fired = Arc::new(Mutex::new(0));

        let seen = fired.clone();
        presentation.event_bus().on::<DemoStage, _>(move |_| *seen.lock() += 1);

        presentation.handle(&Intent::GoToIndex(3));
        tokio::time::sleep(ms(1500)).await;
        assert_eq!(job_state(&presentation), JobState::Routing);

        presentation.handle(&Intent::GoToIndex(0));
        let count = *fired.lock();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(*fired.lock(), count);
        assert!(presentation.demo_state().is_none());
    }
}
