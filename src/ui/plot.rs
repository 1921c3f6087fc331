use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use summary_lab::{Dataset, SummaryReport};

use crate::color::{generate_palette, GroupColors};
use crate::state::{AppState, ChartKind, Explanation};
use crate::ui::explanation_box;

// ---------------------------------------------------------------------------
// Summary chart (bottom of the central panel)
// ---------------------------------------------------------------------------

/// Render the chart: group averages when grouped, raw values otherwise.
pub fn summary_chart(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = state.report.clone() else {
        return;
    };

    ui.heading("Chart");
    let body = match state.chart_kind {
        ChartKind::Bar => "Each bar's height corresponds to its value; hover a bar to see it.",
        ChartKind::Line => "The line connects the values in order to show a trend.",
    };
    explanation_box(ui, state, Explanation::Chart, "Understanding the chart", body);

    let plot = Plot::new("summary_plot")
        .legend(Legend::default())
        .height(300.0)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true);

    match (&state.group_by, &state.stats_field) {
        (Some(_), _) => {
            let colors = state.group_colors.clone();
            let kind = state.chart_kind;
            plot.x_axis_label("Group").show(ui, |plot_ui| {
                for item in group_series(&report, colors.as_ref(), kind) {
                    match item {
                        Series::Bars(chart) => plot_ui.bar_chart(chart),
                        Series::Line(line) => plot_ui.line(line),
                    }
                }
            });
        }
        (None, Some(field)) => {
            let points = record_values(&report.filtered, field);
            let kind = state.chart_kind;
            let field = field.clone();
            plot.x_axis_label("Record").show(ui, |plot_ui| match kind {
                ChartKind::Bar => {
                    let bars = points
                        .iter()
                        .enumerate()
                        .map(|(i, (label, v))| Bar::new(i as f64, *v).name(label).width(0.6))
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(&field).color(Color32::LIGHT_BLUE));
                }
                ChartKind::Line => {
                    let line_points: PlotPoints = points
                        .iter()
                        .enumerate()
                        .map(|(i, (_, v))| [i as f64, *v])
                        .collect();
                    plot_ui.line(Line::new(line_points).name(&field).color(Color32::LIGHT_BLUE).width(2.0));
                }
            });
        }
        (None, None) => {
            ui.label("Pick a field to describe or a field to group by.");
        }
    }
}

enum Series {
    Bars(BarChart),
    Line(Line<'static>),
}

/// One series per aggregate, x = group position in first-occurrence order.
fn group_series(report: &SummaryReport, colors: Option<&GroupColors>, kind: ChartKind) -> Vec<Series> {
    let n_aggs = report.groups.first().map_or(0, |g| g.aggregates.len());
    let palette = generate_palette(n_aggs);
    let bar_width = 0.8 / n_aggs.max(1) as f64;

    (0..n_aggs)
        .map(|j| {
            let name = report.groups[0].aggregates[j].field.clone();
            let series_color = palette[j];
            match kind {
                ChartKind::Bar => {
                    let offset = (j as f64 - (n_aggs as f64 - 1.0) / 2.0) * bar_width;
                    let bars = report
                        .groups
                        .iter()
                        .enumerate()
                        .map(|(i, g)| {
                            let fill = colors.map_or(series_color, |c| c.color_for(g.key.as_ref()));
                            Bar::new(i as f64 + offset, g.aggregates[j].value)
                                .name(format!("{} – {name}", g.label()))
                                .fill(fill)
                                .width(bar_width)
                        })
                        .collect();
                    Series::Bars(BarChart::new(bars).name(format!("avg {name}")).color(series_color))
                }
                ChartKind::Line => {
                    let points: PlotPoints = report
                        .groups
                        .iter()
                        .enumerate()
                        .map(|(i, g)| [i as f64, g.aggregates[j].value])
                        .collect();
                    Series::Line(Line::new(points).name(format!("avg {name}")).color(series_color).width(2.0))
                }
            }
        })
        .collect()
}

/// (label, value) per record; labels come from a `name` field when there is one.
fn record_values(dataset: &Dataset, field: &str) -> Vec<(String, f64)> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let value = r.get(field)?.as_f64()?;
            let label = r
                .get("name")
                .map(|v| v.to_string())
                .unwrap_or_else(|| format!("record {i}"));
            Some((label, value))
        })
        .collect()
}
