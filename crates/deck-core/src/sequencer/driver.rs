//! Real-time driver for the sequencer on a tokio runtime

use std::sync::Arc;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{Sequencer, SequencerEvent, SequencerState};

/// Receives events fired by the timer task
pub type EventSink = Arc<dyn Fn(&[SequencerEvent]) + Send + Sync>;

/// Drives a [`Sequencer`] with tokio timers.
///
/// Holds exactly one timer task. Every operation that changes the schedule
/// aborts that task before arming a new one, and dropping the driver stops
/// the sequencer and aborts the task.
pub struct SequencerDriver {
    sequencer: Arc<Mutex<Sequencer>>,
    runtime: Handle,
    sink: EventSink,
    task: Option<JoinHandle<()>>,
}

impl SequencerDriver {
    pub fn new(sequencer: Sequencer, runtime: Handle, sink: EventSink) -> Self {
        Self {
            sequencer: Arc::new(Mutex::new(sequencer)),
            runtime,
            sink,
            task: None,
        }
    }

    /// No-op while running; the armed timer keeps its deadline
    pub fn start(&mut self) {
        {
            let mut sequencer = self.sequencer.lock();
            if sequencer.is_running() {
                return;
            }
            sequencer.start();
        }
        self.rearm();
    }

    pub fn stop(&mut self) {
        self.cancel_task();
        let events = {
            let mut sequencer = self.sequencer.lock();
            sequencer.stop();
            sequencer.take_events()
        };
        self.emit(&events);
    }

    /// Manual step; see [`Sequencer::step_forward`]
    pub fn step_forward(&mut self) -> SequencerState {
        let (state, events) = {
            let mut sequencer = self.sequencer.lock();
            let state = sequencer.step_forward();
            (state, sequencer.take_events())
        };
        self.rearm();
        self.emit(&events);
        state
    }

    pub fn snapshot(&self) -> SequencerState {
        self.sequencer.lock().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.lock().is_running()
    }

    /// Whether a timer task is currently armed
    pub fn has_pending_timer(&self) -> bool {
        self.task.as_ref().map_or(false, |task| !task.is_finished())
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn rearm(&mut self) {
        self.cancel_task();

        let epoch = {
            let sequencer = self.sequencer.lock();
            if sequencer.time_until_next().is_none() {
                return;
            }
            sequencer.epoch()
        };

        let sequencer = self.sequencer.clone();
        let sink = self.sink.clone();
        self.task = Some(self.runtime.spawn(run_timer(sequencer, sink, epoch)));
    }

    fn emit(&self, events: &[SequencerEvent]) {
        if !events.is_empty() {
            (self.sink)(events);
        }
    }
}

impl Drop for SequencerDriver {
    fn drop(&mut self) {
        self.cancel_task();
        self.sequencer.lock().stop();
    }
}

/// Timer loop for one epoch. Exits as soon as the epoch moves on.
async fn run_timer(sequencer: Arc<Mutex<Sequencer>>, sink: EventSink, epoch: u64) {
    loop {
        let wait = {
            let sequencer = sequencer.lock();
            if sequencer.epoch() != epoch {
                return;
            }
            match sequencer.time_until_next() {
                Some(wait) => wait,
                None => return,
            }
        };

        tokio::time::sleep(wait).await;

        let events = {
            let mut sequencer = sequencer.lock();
            if sequencer.epoch() != epoch {
                debug!(epoch, "stale sequencer timer ignored");
                return;
            }
            sequencer.advance(wait)
        };

        if !events.is_empty() {
            sink(&events);
        }
    }
}
