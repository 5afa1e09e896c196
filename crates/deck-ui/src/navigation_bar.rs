//! Bottom navigation bar: previous/next buttons, slide dots and progress

use egui::{Color32, RichText, Sense, Stroke, Ui, Vec2};
use deck_core::{DeckState, DotState, Intent};

use crate::theme::{accent_color, highlight_color, muted_color};

/// Navigation bar configuration
#[derive(Debug, Clone)]
pub struct NavigationBarConfig {
    pub dot_radius: f32,
    pub dot_spacing: f32,
    pub show_progress: bool,
}

impl Default for NavigationBarConfig {
    fn default() -> Self {
        Self {
            dot_radius: 6.0,
            dot_spacing: 22.0,
            show_progress: true,
        }
    }
}

/// Stateless widget; reads a [`DeckState`] and reports the clicked intent
#[derive(Debug, Clone, Default)]
pub struct NavigationBar {
    config: NavigationBarConfig,
}

impl NavigationBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: NavigationBarConfig) -> Self {
        self.config = config;
        self
    }

    /// Draw the bar. Returns the intent of any button or dot clicked.
    pub fn ui(&self, ui: &mut Ui, state: &DeckState, titles: &[&str]) -> Option<Intent> {
        let mut intent = None;

        if self.config.show_progress {
            ui.add(
                egui::ProgressBar::new(state.progress_fraction())
                    .desired_width(ui.available_width())
                    .fill(accent_color()),
            );
            ui.add_space(6.0);
        }

        ui.horizontal(|ui| {
            let previous = ui.add_enabled(!state.is_first(), egui::Button::new("◀ Previous"));
            if previous.on_hover_text("Previous slide (Left Arrow)").clicked() {
                intent = Some(Intent::Previous);
            }

            ui.add_space(12.0);

            for index in 0..state.slide_count {
                if let Some(clicked) = self.dot(ui, state, index, titles.get(index).copied()) {
                    intent = Some(clicked);
                }
            }

            ui.add_space(12.0);

            let next = ui.add_enabled(!state.is_last(), egui::Button::new("Next ▶"));
            if next.on_hover_text("Next slide (Right Arrow / Space)").clicked() {
                intent = Some(Intent::Next);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{} / {}", state.current_index + 1, state.slide_count))
                        .color(muted_color()),
                );
            });
        });

        intent
    }

    fn dot(&self, ui: &mut Ui, state: &DeckState, index: usize, title: Option<&str>) -> Option<Intent> {
        let size = Vec2::splat(self.config.dot_spacing);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        let (fill, radius) = match state.dot(index) {
            DotState::Current => (accent_color(), self.config.dot_radius * 1.4),
            DotState::Visited => (highlight_color(), self.config.dot_radius),
            DotState::Upcoming => (Color32::TRANSPARENT, self.config.dot_radius),
        };

        let painter = ui.painter();
        painter.circle_filled(rect.center(), radius, fill);
        if response.hovered() {
            painter.circle_stroke(rect.center(), radius + 2.0, Stroke::new(1.5, highlight_color()));
        } else {
            painter.circle_stroke(rect.center(), radius, Stroke::new(1.0, muted_color()));
        }

        let response = response.on_hover_text(title.unwrap_or("Slide").to_string());
        response.clicked().then_some(Intent::GoToIndex(index))
    }
}
