pub mod panels;
pub mod plot;
pub mod tables;

use eframe::egui::{RichText, Ui};

use crate::state::{AppState, Explanation};

/// A toggle button with a body that is shown only while expanded.
pub fn explanation_box(ui: &mut Ui, state: &mut AppState, which: Explanation, title: &str, body: &str) {
    let open = state.expanded.contains(&which);
    let marker = if open { "▼" } else { "▶" };
    if ui
        .button(RichText::new(format!("{marker} {title}")).strong())
        .clicked()
    {
        state.toggle_explanation(which);
    }
    if open {
        ui.label(body);
    }
}
