//! eframe application: frame loop, input, and slide rendering

use std::sync::Arc;
use std::time::Instant;
use eframe::egui::{self, Context, RichText};
use tracing::{debug, warn};

use deck_core::events::events::DemoStage;
use deck_core::Presentation;
use deck_ui::{
    apply_theme, persona_toggle, DemoAction, EguiSlideRenderer, JobFlowView, NavigationBar, SlideAction,
    SlideTransition, Theme,
};

use crate::keys::intents_for_keys;

pub struct DeckApp {
    presentation: Presentation,
    navigation_bar: NavigationBar,
    job_flow: JobFlowView,
    transition: Arc<SlideTransition>,
    last_frame: Instant,

    /// Keeps the demo timers alive for the lifetime of the window
    _runtime: tokio::runtime::Runtime,
}

impl DeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>, presentation: Presentation, runtime: tokio::runtime::Runtime) -> Self {
        apply_theme(&cc.egui_ctx, &Theme::default());

        // Timer-driven demo stages arrive off the UI thread
        let ctx = cc.egui_ctx.clone();
        presentation.event_bus().on::<DemoStage, _>(move |_| ctx.request_repaint());

        let transition = Arc::new(SlideTransition::default());
        presentation.navigator().add_subscriber(transition.clone());

        Self {
            presentation,
            navigation_bar: NavigationBar::new(),
            job_flow: JobFlowView::default(),
            transition,
            last_frame: Instant::now(),
            _runtime: runtime,
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        let slide_count = self.presentation.deck_state().slide_count;
        let intents = ctx.input(|input| intents_for_keys(|key| input.key_pressed(key), slide_count));

        for intent in intents {
            self.presentation.handle(&intent);
        }
    }

    fn top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("deck_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&self.presentation.current_descriptor().title).strong());

                if self.presentation.persona_toggle_visible() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(persona) = persona_toggle(ui, self.presentation.persona()) {
                            self.presentation.set_persona(persona);
                        }
                    });
                }
            });
        });
    }

    fn bottom_bar(&mut self, ctx: &Context) {
        let state = self.presentation.deck_state();
        let titles: Vec<String> = self
            .presentation
            .config()
            .slides
            .iter()
            .map(|slide| slide.title.clone())
            .collect();
        let titles: Vec<&str> = titles.iter().map(String::as_str).collect();

        let intent = egui::TopBottomPanel::bottom("deck_navigation")
            .show(ctx, |ui| {
                ui.add_space(6.0);
                let intent = self.navigation_bar.ui(ui, &state, &titles);
                ui.add_space(6.0);
                intent
            })
            .inner;

        if let Some(intent) = intent {
            self.presentation.handle(&intent);
        }
    }

    fn slide(&mut self, ctx: &Context) {
        let now = Instant::now();
        let offset = self.transition.offset(now);
        if self.transition.is_animating(now) {
            ctx.request_repaint();
        }

        let slide = self.presentation.current_descriptor().clone();
        let kind = self.presentation.current_slide();
        let slide_ctx = self.presentation.slide_context();
        let demo = self.presentation.demo_state();
        let active_queue = self.presentation.active_queue().to_string();

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let rect = ui.max_rect().translate(egui::vec2(offset * ui.max_rect().width(), 0.0));
                ui.allocate_ui_at_rect(rect, |ui| {
                    let mut renderer =
                        EguiSlideRenderer::new(ui, &self.job_flow).with_demo(demo.as_ref(), &active_queue);
                    kind.render(&slide, &slide_ctx, &mut renderer)
                })
                .inner
            })
            .inner;

        if let Some(action) = action {
            self.apply_slide_action(action);
        }
    }

    fn apply_slide_action(&mut self, action: SlideAction) {
        debug!(?action, "slide action");
        match action {
            SlideAction::ArchitectureNext => {
                self.presentation.architecture_next();
            }
            SlideAction::ArchitecturePrevious => {
                self.presentation.architecture_previous();
            }
            SlideAction::ArchitectureGoTo(step) => {
                self.presentation.architecture_go_to(step);
            }
            SlideAction::Demo(DemoAction::Submit(queue)) => {
                if let Err(err) = self.presentation.submit_job(queue) {
                    warn!(%err, queue, "job submission rejected");
                }
            }
            SlideAction::Demo(DemoAction::Play) => self.presentation.play_demo(),
            SlideAction::Demo(DemoAction::Pause) => self.presentation.pause_demo(),
            SlideAction::Demo(DemoAction::Step) => {
                self.presentation.step_demo();
            }
        }
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.presentation.tick(now.duration_since(self.last_frame));
        self.last_frame = now;

        self.handle_keys(ctx);
        self.top_bar(ctx);
        self.bottom_bar(ctx);
        self.slide(ctx);
    }
}
