use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use summary_lab::{DescriptiveStatistics, Warning};

use crate::state::{AppState, Explanation};
use crate::ui::explanation_box;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Central panel – records, grouped summary and statistics
// ---------------------------------------------------------------------------

pub fn summary_tables(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = state.report.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file or pick a sample  (Samples → Employees)");
        });
        return;
    };

    // ---- Filtered records ----
    ui.heading("Records");
    explanation_box(
        ui,
        state,
        Explanation::Filtering,
        "How does filtering work?",
        "Each filter keeps only the rows that satisfy it, and all filters must hold at once \
         (logical AND), like data[(data['age'] >= 30) & (data['city'] == 'Chicago')] in pandas.",
    );

    let columns = report.filtered.columns().to_vec();
    let removable = state.is_sandbox() && state.request().is_ok_and(|r| r.predicates.is_empty());
    let mut remove: Option<usize> = None;

    ui.push_id("records_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), columns.len() + usize::from(removable))
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for col in &columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.as_str());
                    });
                }
                if removable {
                    header.col(|_ui: &mut Ui| {});
                }
            })
            .body(|mut body| {
                for (index, record) in report.filtered.records().iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        for col in &columns {
                            row.col(|ui: &mut Ui| {
                                let text = record.get(col).map(|v| v.to_string()).unwrap_or_default();
                                ui.label(text);
                            });
                        }
                        if removable {
                            row.col(|ui: &mut Ui| {
                                if ui.small_button("Remove").clicked() {
                                    remove = Some(index);
                                }
                            });
                        }
                    });
                }
            });
    });
    if let Some(index) = remove {
        state.remove_point(index);
    }
    if report.warnings.contains(&Warning::EmptyDataset) {
        ui.label(RichText::new("No records match the current filters.").color(Color32::YELLOW));
    }
    ui.separator();

    // ---- Grouped summary ----
    ui.heading("Grouped summary");
    explanation_box(
        ui,
        state,
        Explanation::Grouping,
        "What does grouping do?",
        "Rows are split by the value of the group-by field, in the order each value first \
         appears, and every group reports its size and the average of the selected fields. \
         Without a group-by field the whole dataset is one group.",
    );

    let key_header = state.group_by.clone().unwrap_or_else(|| "All Data".to_string());
    let agg_headers: Vec<String> = report
        .groups
        .first()
        .map(|g| {
            g.aggregates
                .iter()
                .map(|a| format!("{} {}", a.aggregator.name(), a.field))
                .collect()
        })
        .unwrap_or_default();

    ui.push_id("groups_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(80.0), 2 + agg_headers.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong(key_header.as_str());
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("count");
                });
                for h in &agg_headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h.as_str());
                    });
                }
            })
            .body(|mut body| {
                for group in &report.groups {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(group.label());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(group.count.to_string());
                        });
                        for agg in &group.aggregates {
                            row.col(|ui: &mut Ui| {
                                ui.label(format!("{:.2}", agg.value));
                            });
                        }
                    });
                }
            });
    });
    ui.separator();

    // ---- Descriptive statistics ----
    ui.heading("Statistics");
    explanation_box(
        ui,
        state,
        Explanation::Statistics,
        "What are these statistics?",
        "Mean is the average, median the middle value of the sorted data (the upper one of \
         the two middle values for an even count), and mode the most frequent value (the first \
         one to reach the highest count on a tie).",
    );
    for (field, stats) in &report.statistics {
        statistics_list(ui, field, stats);
    }
}

fn statistics_list(ui: &mut Ui, field: &str, stats: &DescriptiveStatistics) {
    ui.strong(field);
    ui.label(format!("Count: {}", stats.count));
    ui.label(format!("Mean: {:.2}", stats.mean));
    ui.label(format!("Min: {}", stats.min));
    ui.label(format!("Max: {}", stats.max));
    ui.label(format!("Median: {}", stats.median));
    ui.label(format!("Mode: {}", stats.mode));
    if stats.is_degenerate() {
        ui.label(RichText::new("No values: all statistics shown as 0.").italics());
    }
}
