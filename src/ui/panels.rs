use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use summary_lab::data::{loader, sample};
use summary_lab::Value;

use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Left side panel – filter, grouping and sandbox widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns = dataset.columns().to_vec();
    let numeric = dataset.numeric_columns();
    let categories: Vec<(String, Vec<Value>)> = state
        .equals
        .keys()
        .map(|field| {
            let values = dataset
                .unique_values(field)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            (field.clone(), values)
        })
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Filters ----
            ui.strong("Filter");
            let threshold_fields: Vec<String> = state.min_thresholds.keys().cloned().collect();
            for field in &threshold_fields {
                let mut text = state.min_thresholds.get(field).cloned().unwrap_or_default();
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(format!("{field} ≥"));
                    let edit = egui::TextEdit::singleline(&mut text)
                        .hint_text(format!("Min {field}"))
                        .desired_width(90.0);
                    if ui.add(edit).changed() {
                        state.set_min_threshold(field, text.clone());
                    }
                });
            }

            for (field, values) in &categories {
                let current = state.equals.get(field).cloned().flatten();
                let selected_text = current
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| "All".to_string());
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(field.as_str());
                    egui::ComboBox::from_id_salt(format!("equals_{field}"))
                        .selected_text(selected_text)
                        .show_ui(ui, |ui: &mut Ui| {
                            if ui.selectable_label(current.is_none(), "All").clicked() {
                                state.set_equals(field, None);
                            }
                            for value in values {
                                let is_selected = current.as_ref() == Some(value);
                                if ui.selectable_label(is_selected, value.to_string()).clicked() {
                                    state.set_equals(field, Some(value.clone()));
                                }
                            }
                        });
                });
            }

            if let Some(err) = &state.input_error {
                ui.label(RichText::new(format!("Invalid filter: {err}")).color(Color32::RED));
            }
            ui.separator();

            // ---- Grouping ----
            ui.strong("Group by");
            let current_group = state.group_by.clone();
            egui::ComboBox::from_id_salt("group_by")
                .selected_text(current_group.as_deref().unwrap_or("No grouping"))
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(current_group.is_none(), "No grouping")
                        .clicked()
                    {
                        state.set_group_by(None);
                    }
                    for col in &columns {
                        if ui
                            .selectable_label(current_group.as_deref() == Some(col.as_str()), col.as_str())
                            .clicked()
                        {
                            state.set_group_by(Some(col.clone()));
                        }
                    }
                });

            ui.label("Average per group:");
            for field in &numeric {
                let mut checked = state.aggregate_fields.contains(field);
                if ui.checkbox(&mut checked, field.as_str()).changed() {
                    state.toggle_aggregate(field);
                }
            }
            ui.separator();

            // ---- Statistics field ----
            ui.strong("Describe");
            let current_stats = state.stats_field.clone();
            egui::ComboBox::from_id_salt("stats_field")
                .selected_text(current_stats.as_deref().unwrap_or("—"))
                .show_ui(ui, |ui: &mut Ui| {
                    for field in &numeric {
                        if ui
                            .selectable_label(current_stats.as_deref() == Some(field.as_str()), field.as_str())
                            .clicked()
                        {
                            state.set_stats_field(Some(field.clone()));
                        }
                    }
                });

            // ---- Sandbox data entry ----
            if state.is_sandbox() {
                ui.separator();
                ui.strong("Add data point");
                ui.horizontal(|ui: &mut Ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut state.new_name)
                            .hint_text("Name")
                            .desired_width(70.0),
                    );
                    ui.add(
                        egui::TextEdit::singleline(&mut state.new_value)
                            .hint_text("Value")
                            .desired_width(70.0),
                    );
                    if ui.button("Add").clicked() {
                        state.add_point();
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("Samples", |ui: &mut Ui| {
            if ui.button("Employees").clicked() {
                state.set_dataset("employees", sample::employees());
                ui.close_menu();
            }
            if ui.button("Chart sandbox").clicked() {
                state.set_dataset("sandbox", sample::sandbox_points());
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(source), Some(report)) = (&state.dataset, &state.report) {
            ui.label(format!(
                "{}: {} records, {} visible",
                source.name,
                source.dataset.len(),
                report.filtered.len()
            ));
        }

        ui.separator();

        ui.selectable_value(&mut state.chart_kind, ChartKind::Bar, "Bar chart");
        ui.selectable_value(&mut state.chart_kind, ChartKind::Line, "Line chart");

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                state.set_dataset(name, dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
