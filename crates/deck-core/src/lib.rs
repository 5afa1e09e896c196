//! Core functionality for the GPU scheduling presentation deck
//!
//! This crate provides the state and timing logic behind the deck:
//! slide navigation, sections, personas, and the scripted animation
//! sequencer that drives the interactive job-flow demo. Rendering and
//! input handling live in other crates and only consume snapshots.

pub mod config;
pub mod events;
pub mod job_flow;
pub mod navigation;
pub mod persona;
pub mod sequencer;
pub mod slides;
pub mod state;

use thiserror::Error;

// Re-export commonly used types
pub use config::{DeckConfig, DemoConfig, SectionSpec};
pub use events::EventBus;
pub use job_flow::{JobState, CLUSTERS, QUEUES};
pub use navigation::{
    DeckNavigator, DeckState, DeckSubscriber, Direction, DotState, Intent, Section, SectionTable,
    StepCursor,
};
pub use persona::{Audience, Persona};
pub use sequencer::{
    EntityMap, EntitySnapshot, EntityStatus, Point, Script, Sequencer, SequencerDriver,
    SequencerEvent, SequencerState, Stage, StageCursor,
};
pub use slides::{
    ArchitectureStep, OutlineRenderer, SlideContext, SlideDescriptor, SlideKind, SlideRenderer,
    ARCHITECTURE_STEPS,
};
pub use state::Presentation;

/// Errors that can occur in deck operations
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Slide index {index} out of range (deck has {slide_count} slides)")]
    OutOfRange { index: usize, slide_count: usize },

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Invalid stage configuration: {0}")]
    InvalidStageConfig(String),

    #[error("Invalid deck configuration: {0}")]
    InvalidDeckConfig(String),

    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    #[error("A job is already in flight")]
    JobInFlight,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;
