//! egui implementation of the slide renderer

use egui::{Align, Layout, RichText, Ui};
use deck_core::persona::visible_cards;
use deck_core::{
    ArchitectureStep, SequencerState, SlideContext, SlideDescriptor, SlideRenderer, ARCHITECTURE_STEPS,
};

use crate::job_flow_view::{DemoAction, JobFlowView};
use crate::theme::{accent_color, highlight_color, muted_color};

/// Interaction reported by a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideAction {
    ArchitectureNext,
    ArchitecturePrevious,
    ArchitectureGoTo(usize),
    Demo(DemoAction),
}

const FEATURES: [(&str, &str, &str); 4] = [
    ("🎯", "Single Entry Point", "Submit to hub"),
    ("🏷️", "Label-Based", "GPU selection"),
    ("📊", "Score-Based", "Dynamic routing"),
    ("⚡", "Auto-Dispatch", "Best cluster"),
];

/// Draws one slide into a `Ui`
pub struct EguiSlideRenderer<'a> {
    ui: &'a mut Ui,
    demo: Option<&'a SequencerState>,
    active_queue: &'a str,
    job_flow: &'a JobFlowView,
}

impl<'a> EguiSlideRenderer<'a> {
    pub fn new(ui: &'a mut Ui, job_flow: &'a JobFlowView) -> Self {
        Self {
            ui,
            demo: None,
            active_queue: "",
            job_flow,
        }
    }

    /// Demo snapshot to draw on the demo slide
    pub fn with_demo(mut self, demo: Option<&'a SequencerState>, active_queue: &'a str) -> Self {
        self.demo = demo;
        self.active_queue = active_queue;
        self
    }

    fn heading(ui: &mut Ui, slide: &SlideDescriptor) {
        ui.heading(RichText::new(&slide.title).strong());
        ui.add_space(16.0);
    }
}

impl SlideRenderer for EguiSlideRenderer<'_> {
    type Output = Option<SlideAction>;

    fn title(&mut self, slide: &SlideDescriptor, _ctx: &SlideContext) -> Option<SlideAction> {
        self.ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.label(RichText::new("Red Hat Advanced Cluster Management").color(muted_color()).size(22.0));
            ui.label(RichText::new(&slide.title).size(64.0).strong().color(accent_color()));
            ui.label(RichText::new("with MultiKueue").size(28.0).color(highlight_color()));
            ui.add_space(24.0);
            ui.label("Intelligent multi-cluster workload scheduling for AI/ML training jobs");
            ui.add_space(40.0);

            ui.columns(FEATURES.len(), |columns| {
                for (column, (icon, title, subtitle)) in columns.iter_mut().zip(FEATURES) {
                    column.vertical_centered(|ui| {
                        ui.label(RichText::new(icon).size(32.0));
                        ui.label(RichText::new(title).strong());
                        ui.label(RichText::new(subtitle).small().color(muted_color()));
                    });
                }
            });

            ui.add_space(40.0);
            ui.label(RichText::new("Press → to explore").color(muted_color()));
        });
        None
    }

    fn architecture(
        &mut self,
        slide: &SlideDescriptor,
        step_index: usize,
        step: &ArchitectureStep,
        _ctx: &SlideContext,
    ) -> Option<SlideAction> {
        let mut action = None;
        let ui = &mut *self.ui;

        Self::heading(ui, slide);

        ui.horizontal(|ui| {
            for index in 0..ARCHITECTURE_STEPS.len() {
                let text = RichText::new(format!("{}", index + 1));
                let text = if index == step_index { text.color(accent_color()).strong() } else { text };
                let response = ui.selectable_label(index == step_index, text);
                if response.on_hover_text(ARCHITECTURE_STEPS[index].title).clicked() {
                    action = Some(SlideAction::ArchitectureGoTo(index));
                }
            }
        });

        ui.add_space(24.0);
        ui.label(
            RichText::new(format!("Step {} of {}", step_index + 1, ARCHITECTURE_STEPS.len()))
                .small()
                .color(muted_color()),
        );
        ui.label(RichText::new(step.title).size(32.0).strong());
        ui.add_space(8.0);
        ui.label(step.description);
        ui.add_space(12.0);
        ui.label(RichText::new(format!("💡 {}", step.highlight)).color(highlight_color()));

        ui.add_space(24.0);
        ui.horizontal(|ui| {
            if ui.add_enabled(step_index > 0, egui::Button::new("◀ Back")).clicked() {
                action = Some(SlideAction::ArchitecturePrevious);
            }
            let last = step_index + 1 >= ARCHITECTURE_STEPS.len();
            if ui.add_enabled(!last, egui::Button::new("Next Step ▶")).clicked() {
                action = Some(SlideAction::ArchitectureNext);
            }
        });

        action
    }

    fn persona(&mut self, slide: &SlideDescriptor, ctx: &SlideContext) -> Option<SlideAction> {
        let ui = &mut *self.ui;
        Self::heading(ui, slide);

        let cards = visible_cards(ctx.persona);
        ui.columns(cards.len().max(1), |columns| {
            for (column, card) in columns.iter_mut().zip(&cards) {
                column.group(|ui| {
                    ui.label(RichText::new(card.heading).size(26.0).strong().color(accent_color()));
                    ui.label(RichText::new(format!("Knows: {}", card.knows)).color(muted_color()));
                    ui.add_space(12.0);
                    for (number, step) in card.steps.iter().enumerate() {
                        ui.label(RichText::new(format!("{}. {}", number + 1, step.title)).strong());
                        ui.label(RichText::new(step.description).small());
                        ui.add_space(6.0);
                    }
                });
            }
        });
        None
    }

    fn demo(&mut self, slide: &SlideDescriptor, _ctx: &SlideContext) -> Option<SlideAction> {
        let ui = &mut *self.ui;
        Self::heading(ui, slide);

        match self.demo {
            Some(state) => self
                .job_flow
                .ui(ui, state, self.active_queue)
                .map(SlideAction::Demo),
            None => {
                ui.with_layout(Layout::top_down(Align::Center), |ui| {
                    ui.label(RichText::new("Demo is not running").color(muted_color()));
                });
                None
            }
        }
    }
}
