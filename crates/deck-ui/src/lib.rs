//! User interface components for the presentation deck
//!
//! This crate provides the egui rendering layer. Widgets read snapshots
//! from `deck-core` and report what the viewer clicked; they never mutate
//! core state themselves.

pub mod job_flow_view;
pub mod navigation_bar;
pub mod persona_toggle;
pub mod slide_view;
pub mod theme;
pub mod transition;

/// Re-export commonly used types
pub use job_flow_view::{DemoAction, JobFlowView};
pub use navigation_bar::{NavigationBar, NavigationBarConfig};
pub use persona_toggle::persona_toggle;
pub use slide_view::{EguiSlideRenderer, SlideAction};
pub use theme::{Theme, apply_theme};
pub use transition::SlideTransition;
