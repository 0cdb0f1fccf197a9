use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Indicator;
use crate::state::AppState;

/// Render the rows matching the overview filters.
pub fn overview_table(ui: &mut Ui, state: &AppState) {
    if state.table.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data loaded  (File → Open…)");
        });
        return;
    }
    let rows = &state.overview.rows;

    let scores: Vec<f64> = rows
        .rows
        .iter()
        .filter_map(|r| r.value(Indicator::Happiness))
        .collect();
    let mean = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };
    ui.label(match mean {
        Some(mean) => format!("{} rows, mean happiness {mean:.3}", rows.len()),
        None => format!("{} rows", rows.len()),
    });
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto())
        .columns(Column::auto(), Indicator::ALL.len())
        .header(20.0, |mut header| {
            for title in ["Country", "Region", "Year"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            for ind in Indicator::ALL {
                header.col(|ui| {
                    ui.strong(ind.label()).on_hover_text(ind.column());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows.rows[row.index()];
                row.col(|ui| {
                    ui.label(&r.country);
                });
                row.col(|ui| {
                    ui.label(r.region.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(&r.year);
                });
                for ind in Indicator::ALL {
                    row.col(|ui| {
                        match r.value(ind) {
                            Some(v) => ui.label(format!("{v:.3}")),
                            None => ui.weak("–"),
                        };
                    });
                }
            });
        });
}
