use egui::{Context, Visuals, Style, Color32, Rounding, Stroke, FontId, FontFamily, TextStyle};
use std::collections::BTreeMap;

use deck_core::EntityStatus;

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Deck Dark".to_string(),
            dark_mode: true,
        }
    }
}

/// Apply the deck theme (dark slate with red and amber accents)
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let bg_color = Color32::from_rgb(15, 23, 42);          // slate-900
    let panel_bg = Color32::from_rgb(20, 28, 48);
    let widget_bg = Color32::from_rgb(30, 41, 59);         // slate-800
    let hover_color = Color32::from_rgb(51, 65, 85);       // slate-700
    let text_color = Color32::from_rgb(226, 232, 240);     // slate-200

    visuals.window_fill = panel_bg;
    visuals.panel_fill = bg_color;
    visuals.extreme_bg_color = bg_color;
    visuals.faint_bg_color = widget_bg;

    visuals.widgets.noninteractive.bg_fill = widget_bg;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, hover_color);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.noninteractive.rounding = Rounding::same(8.0);

    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, hover_color);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.inactive.rounding = Rounding::same(8.0);

    visuals.widgets.hovered.bg_fill = hover_color;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.hovered.rounding = Rounding::same(8.0);

    visuals.widgets.active.bg_fill = accent_color();
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(8.0);

    visuals.selection.bg_fill = accent_color().linear_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = highlight_color();

    visuals.window_shadow.extrusion = 12.0;
    visuals.popup_shadow.extrusion = 6.0;

    style.spacing.item_spacing = egui::vec2(10.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    // Slides are read from a distance, so everything is larger than a normal app
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(16.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(36.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(15.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Primary accent (buttons, current slide dot)
pub fn accent_color() -> Color32 {
    Color32::from_rgb(220, 38, 38)
}

/// Secondary accent for highlights and callouts
pub fn highlight_color() -> Color32 {
    Color32::from_rgb(251, 191, 36)
}

pub fn muted_color() -> Color32 {
    Color32::from_rgb(100, 116, 139)
}

pub fn success_color() -> Color32 {
    Color32::from_rgb(34, 197, 94)
}

/// Fill used for a demo entity in the given status
pub fn status_color(status: EntityStatus) -> Color32 {
    match status {
        EntityStatus::Hidden => Color32::TRANSPARENT,
        EntityStatus::Idle => Color32::from_rgb(30, 41, 59),
        EntityStatus::Selected => Color32::from_rgb(59, 130, 246),
        EntityStatus::Active => highlight_color(),
        EntityStatus::Running => accent_color(),
        EntityStatus::Completed => success_color(),
    }
}
