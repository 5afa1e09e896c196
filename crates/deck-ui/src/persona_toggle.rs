use egui::{RichText, Ui};
use deck_core::Persona;

use crate::theme::highlight_color;

/// Segmented persona selector. Returns the persona the user picked.
pub fn persona_toggle(ui: &mut Ui, current: Persona) -> Option<Persona> {
    let mut picked = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("View as:").small());
        for persona in Persona::ALL {
            let text = format!("{} {}", persona.icon(), persona.label());
            let text = if persona == current {
                RichText::new(text).color(highlight_color()).strong()
            } else {
                RichText::new(text)
            };
            if ui.selectable_label(persona == current, text).clicked() && persona != current {
                picked = Some(persona);
            }
        }
    });

    picked
}
