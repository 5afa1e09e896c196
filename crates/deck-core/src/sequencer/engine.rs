//! Virtual-time sequencer core

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{Script, SequencerEvent, SequencerState, StageCursor};

/// What the single pending timer will do when it expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fire {
    Stage(usize),
    Reset,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    fire: Fire,
    remaining: Duration,
}

/// Replays a [`Script`] against virtual time.
///
/// At most one fire is pending at any moment. `stop`, `start`, and
/// `step_forward` replace or clear it and bump the epoch, so a timer that
/// was armed for an older epoch can tell it is stale.
#[derive(Debug)]
pub struct Sequencer {
    script: Arc<Script>,
    state: SequencerState,
    pending: Option<Pending>,
    epoch: u64,
    outbox: Vec<SequencerEvent>,
}

impl Sequencer {
    pub fn new(script: Script) -> Self {
        let state = SequencerState {
            cursor: StageCursor::Idle,
            entities: script.initial().clone(),
            is_running: false,
            iteration: 0,
        };

        Self {
            script: Arc::new(script),
            state,
            pending: None,
            epoch: 0,
            outbox: Vec::new(),
        }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    /// Owned copy of the current state for readers
    pub fn snapshot(&self) -> SequencerState {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Incremented whenever the pending timer is replaced from outside
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Time left until the pending fire, if any
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.remaining)
    }

    /// Start from the initial snapshot. No-op while already running.
    pub fn start(&mut self) {
        if self.state.is_running {
            return;
        }

        self.epoch += 1;
        self.state.entities = self.script.initial().clone();
        self.state.cursor = StageCursor::Next(0);
        self.state.is_running = true;
        self.state.iteration = 0;
        self.schedule_for_cursor();

        info!(stages = self.script.len(), looping = self.script.is_looping(), "sequencer started");
    }

    /// Cancel the pending fire and pause. Entities keep their last values.
    pub fn stop(&mut self) {
        if !self.state.is_running && self.pending.is_none() {
            return;
        }

        self.epoch += 1;
        self.pending = None;
        self.state.is_running = false;

        info!(iteration = self.state.iteration, "sequencer stopped");
    }

    /// Apply the next stage immediately.
    ///
    /// The pending timer is cancelled first. While running, the following
    /// fire is rescheduled with its full delay measured from this step, so
    /// a stage is never applied twice. After the last stage a step wraps to
    /// the reset state, like the automatic loop does.
    pub fn step_forward(&mut self) -> SequencerState {
        self.epoch += 1;
        self.pending = None;

        match self.state.cursor {
            StageCursor::Idle => {
                self.state.entities = self.script.initial().clone();
                self.apply_stage(0);
            }
            StageCursor::Next(index) => self.apply_stage(index),
            StageCursor::Holding => self.reset_cycle(),
        }

        if self.state.is_running {
            self.schedule_for_cursor();
        }

        self.snapshot()
    }

    /// Let `elapsed` virtual time pass, firing every due stage in order.
    ///
    /// A fire due exactly at the end of the window happens in this call.
    /// Returns all events produced since the last drain.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SequencerEvent> {
        let mut budget = elapsed;

        while let Some(pending) = self.pending.as_mut() {
            if pending.remaining > budget {
                pending.remaining -= budget;
                break;
            }

            budget -= pending.remaining;
            let fire = pending.fire;
            self.pending = None;

            match fire {
                Fire::Stage(index) => self.apply_stage(index),
                Fire::Reset => self.reset_cycle(),
            }

            if self.state.is_running {
                self.schedule_for_cursor();
            }
        }

        self.take_events()
    }

    /// Drain events produced by `step_forward` or `advance`
    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn apply_stage(&mut self, index: usize) {
        let Some(stage) = self.script.stage(index) else {
            return;
        };

        self.state.entities = stage.apply(&self.state.entities);
        self.state.cursor = if index + 1 < self.script.len() {
            StageCursor::Next(index + 1)
        } else {
            StageCursor::Holding
        };

        debug!(index, label = stage.label(), "stage applied");
        self.outbox.push(SequencerEvent::StageApplied {
            index,
            label: stage.label().to_string(),
        });
    }

    fn reset_cycle(&mut self) {
        self.state.entities = self.script.initial().clone();
        self.state.iteration += 1;

        if self.script.is_looping() {
            self.state.cursor = StageCursor::Next(0);
            info!(iteration = self.state.iteration, "sequence looped");
            self.outbox.push(SequencerEvent::Looped {
                iteration: self.state.iteration,
            });
        } else {
            self.state.cursor = StageCursor::Idle;
            self.state.is_running = false;
            info!("one-shot sequence finished");
            self.outbox.push(SequencerEvent::Finished);
        }
    }

    fn schedule_for_cursor(&mut self) {
        self.pending = match self.state.cursor {
            StageCursor::Next(index) => self.script.stage(index).map(|stage| Pending {
                fire: Fire::Stage(index),
                remaining: stage.delay(),
            }),
            StageCursor::Holding => Some(Pending {
                fire: Fire::Reset,
                remaining: self.script.loop_delay(),
            }),
            StageCursor::Idle => None,
        };
    }
}
