use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::chart::ChartData;
use crate::state::AppState;

fn empty_notice(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

// ---------------------------------------------------------------------------
// Comparison chart (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter / bar / curve chart of the comparison tab.
pub fn comparison_plot(ui: &mut Ui, state: &AppState) {
    let view = &state.comparison;
    if view.chart.is_empty() {
        empty_notice(ui, "No data: select regions or countries on the left");
        return;
    }
    let colors = &view.colors;

    match &view.chart {
        ChartData::Scatter { x, y, points } => {
            Plot::new("scatter_plot")
                .legend(Legend::default())
                .x_axis_label(x.column())
                .y_axis_label(y.column())
                .show(ui, |plot_ui| {
                    for p in points {
                        plot_ui.points(
                            Points::new(vec![[p.x, p.y]])
                                .name(&p.country)
                                .color(colors.color_for(&p.country))
                                .radius(5.0),
                        );
                    }
                });
        }
        ChartData::Bar { indicator, bars } => {
            let bars: Vec<Bar> = bars
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    Bar::new(i as f64, b.value)
                        .name(&b.country)
                        .fill(colors.color_for(&b.country))
                        .width(0.8)
                })
                .collect();
            Plot::new("bar_plot")
                .x_axis_label("Country (hover for name)")
                .y_axis_label(indicator.column())
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).name(indicator.label()));
                });
        }
        ChartData::Curves { indicator, curves } => {
            Plot::new("curves_plot")
                .legend(Legend::default())
                .x_axis_label("Year")
                .y_axis_label(indicator.column())
                .show(ui, |plot_ui| {
                    for curve in curves {
                        let points: PlotPoints = curve.points.iter().map(|&(x, y)| [x, y]).collect();
                        plot_ui.line(
                            Line::new(points)
                                .name(&curve.country)
                                .color(colors.color_for(&curve.country))
                                .width(1.5),
                        );
                    }
                });
        }
    }
}

// ---------------------------------------------------------------------------
// Choropleth (central panel)
// ---------------------------------------------------------------------------

/// Render the map tab: one ISO3 tile per country, coloured by happiness.
pub fn choropleth(ui: &mut Ui, state: &AppState) {
    if state.table.is_empty() {
        empty_notice(ui, "No data");
        return;
    }
    let data = &state.map.data;
    if data.entries.is_empty() {
        empty_notice(ui, "No country with a valid ISO code");
        return;
    }

    ui.heading(format!("Filtered countries: {}", data.country_count()));
    if !data.unresolved.is_empty() {
        ui.label(
            RichText::new(format!("{} without ISO code: {}", data.unresolved.len(), data.unresolved.join(", ")))
                .weak(),
        );
    }

    if let Some(scale) = data.scale {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("{:.2}", scale.min));
            for step in 0..=10 {
                let value = scale.min + (scale.max - scale.min) * step as f64 / 10.0;
                let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 0.0, scale.color_for(value));
            }
            ui.label(format!("{:.2}", scale.max));
        });
    }
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for entry in &data.entries {
                    let c = entry.color;
                    let luma = 0.299 * c.r() as f32 + 0.587 * c.g() as f32 + 0.114 * c.b() as f32;
                    let text_color = if luma > 140.0 {
                        Color32::BLACK
                    } else {
                        Color32::WHITE
                    };
                    let tile = egui::Button::new(RichText::new(&entry.iso3).monospace().color(text_color))
                        .fill(entry.color)
                        .min_size(egui::vec2(52.0, 32.0));
                    ui.add(tile).on_hover_text(format!(
                        "{}\n{}\nHappiness Score: {:.3}",
                        entry.country,
                        entry.region.as_deref().unwrap_or("-"),
                        entry.score
                    ));
                }
            });
        });
}
