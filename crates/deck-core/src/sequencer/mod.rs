//! Scripted animation sequencer
//!
//! Replays a fixed, ordered list of stages. Each stage waits for its delay
//! (measured from the previous stage firing) and then replaces the entity
//! snapshot with the output of its pure `apply` function. The core
//! [`Sequencer`] runs on virtual time supplied through `advance`; the
//! [`SequencerDriver`] feeds it real time from tokio.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod driver;
mod engine;
mod script;

pub use driver::{EventSink, SequencerDriver};
pub use engine::Sequencer;
pub use script::{EntityUpdate, Script, ScriptSpec, Stage, StageFn, StageSpec};

/// Position of an animated entity in diagram coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Display status of an animated entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Hidden,
    #[default]
    Idle,
    Selected,
    Active,
    Running,
    Completed,
}

/// Visual state of one entity at a point in the script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub position: Point,
    pub status: EntityStatus,
    pub label: String,
}

impl EntitySnapshot {
    pub fn new(position: Point, status: EntityStatus, label: impl Into<String>) -> Self {
        Self {
            position,
            status,
            label: label.into(),
        }
    }
}

/// Entity snapshots keyed by the ids the script author chose
pub type EntityMap = IndexMap<String, EntitySnapshot>;

/// Where the sequencer is within the current iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageCursor {
    /// Not started, or a one-shot script has finished
    Idle,
    /// Stage `n` is the next one to apply
    Next(usize),
    /// Every stage has been applied; waiting out the loop delay
    Holding,
}

/// Read-only snapshot handed to the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerState {
    pub cursor: StageCursor,
    pub entities: EntityMap,
    pub is_running: bool,
    /// Completed loop iterations since the last `start`
    pub iteration: u64,
}

impl SequencerState {
    /// Index of the next stage to apply, if one is pending in this iteration
    pub fn stage_index(&self) -> Option<usize> {
        match self.cursor {
            StageCursor::Next(index) => Some(index),
            StageCursor::Idle | StageCursor::Holding => None,
        }
    }

    pub fn entity(&self, id: &str) -> Option<&EntitySnapshot> {
        self.entities.get(id)
    }
}

/// Something observable that happened while the script ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    StageApplied { index: usize, label: String },
    Looped { iteration: u64 },
    Finished,
}
