use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SummaryLabApp {
    pub state: AppState,
}

impl SummaryLabApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SummaryLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters, grouping, sandbox ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables, statistics, chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    tables::summary_tables(ui, &mut self.state);
                    ui.separator();
                    plot::summary_chart(ui, &mut self.state);
                });
        });
    }
}
