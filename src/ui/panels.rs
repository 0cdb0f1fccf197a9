use std::collections::BTreeSet;

use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::chart::ChartMode;
use crate::data::filter::{Bounds, Choice, FilterOutcome};
use crate::data::model::{Indicator, Table};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// Combo box offering "All" plus every value. Returns the new choice when the
/// user picks a different one.
fn choice_combo(ui: &mut Ui, id: &str, current: &Choice, options: &BTreeSet<String>) -> Option<Choice> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_all(), "All").clicked() && !current.is_all() {
                picked = Some(Choice::All);
            }
            for value in options {
                let selected = matches!(current, Choice::Exact(v) if v == value);
                if ui.selectable_label(selected, value).clicked() && !selected {
                    picked = Some(Choice::Exact(value.clone()));
                }
            }
        });
    picked
}

fn indicator_combo(ui: &mut Ui, id: &str, current: Indicator, table: &Table) -> Option<Indicator> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.column())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for ind in Indicator::ALL {
                let enabled = table.is_empty() || table.has_indicator(ind);
                let resp = ui.add_enabled(enabled, egui::SelectableLabel::new(ind == current, ind.column()));
                if resp.clicked() && ind != current {
                    picked = Some(ind);
                }
            }
        });
    picked
}

/// Warning line listing columns whose filter was skipped.
fn missing_columns_note(ui: &mut Ui, outcome: &FilterOutcome) {
    if outcome.missing_columns.is_empty() {
        return;
    }
    let cols: Vec<&str> = outcome.missing_columns.iter().map(String::as_str).collect();
    ui.label(
        RichText::new(format!("Missing column(s), filter skipped: {}", cols.join(", ")))
            .color(Color32::from_rgb(230, 160, 40)),
    );
}

// ---------------------------------------------------------------------------
// Overview panel
// ---------------------------------------------------------------------------

pub fn overview_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let AppState { table, overview, .. } = state;
    let table: &Table = table;

    ui.label("Year:");
    if let Some(year) = choice_combo(ui, "overview_year", &overview.query.year, table.years()) {
        overview.set_year(year);
    }
    ui.label("Region:");
    if let Some(region) = choice_combo(ui, "overview_region", &overview.query.region, table.regions()) {
        overview.set_region(region);
    }
    ui.label("Country:");
    if let Some(country) = choice_combo(ui, "overview_country", &overview.query.country, table.countries()) {
        overview.set_country(country);
    }

    ui.separator();
    missing_columns_note(ui, &overview.outcome);
}

// ---------------------------------------------------------------------------
// Comparison panel – chart settings and region → country cascade
// ---------------------------------------------------------------------------

pub fn comparison_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    let AppState { table, comparison, .. } = state;
    let table: &Table = table;

    ui.strong("Chart type");
    egui::ComboBox::from_id_salt("chart_mode")
        .selected_text(comparison.mode.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for mode in ChartMode::ALL {
                if ui.selectable_label(comparison.mode == mode, mode.label()).clicked() {
                    comparison.set_mode(mode);
                }
            }
        });
    ui.add_space(6.0);

    // Curves span every year.
    ui.add_enabled_ui(comparison.mode.uses_year(), |ui: &mut Ui| {
        ui.label("Year:");
        let current = comparison.year.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("comparison_year")
            .selected_text(&current)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for year in table.years() {
                    if ui.selectable_label(*year == current, year).clicked() && *year != current {
                        comparison.set_year(year.clone());
                    }
                }
            });
    });

    ui.label("X axis / indicator:");
    if let Some(ind) = indicator_combo(ui, "comparison_x", comparison.x, table) {
        comparison.set_x(ind);
    }
    if comparison.mode.uses_y_axis() {
        ui.label("Y axis:");
        if let Some(ind) = indicator_combo(ui, "comparison_y", comparison.y, table) {
            comparison.set_y(ind);
        }
    }
    ui.add_space(6.0);

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Select all").clicked() {
            comparison.select_all_countries(table);
        }
        if ui.button("Clear").clicked() {
            comparison.reset_selection();
        }
    });
    ui.separator();

    ui.strong(format!(
        "1. Regions ({}/{})",
        comparison.selected_regions.len(),
        table.regions().len()
    ));
    ScrollArea::vertical()
        .id_salt("regions")
        .max_height(140.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for region in table.regions() {
                let selected = comparison.selected_regions.contains(region);
                if ui.selectable_label(selected, region).clicked() {
                    comparison.toggle_region(table, region);
                }
            }
        });
    ui.separator();

    ui.strong(format!(
        "2. Countries ({}/{})",
        comparison.selected_countries.len(),
        table.countries().len()
    ));
    ScrollArea::vertical()
        .id_salt("countries")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for country in table.countries() {
                let selected = comparison.selected_countries.contains(country);
                let text = RichText::new(country).color(comparison.colors.color_for(country));
                if ui.selectable_label(selected, text).clicked() {
                    comparison.toggle_country(country);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Map panel – advanced filter
// ---------------------------------------------------------------------------

pub fn map_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let AppState { table, map, .. } = state;
    let table: &Table = table;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label("Year:");
            if let Some(year) = choice_combo(ui, "map_year", &map.query.year, table.years()) {
                map.set_year(year);
            }
            ui.label("Country:");
            if let Some(country) = choice_combo(ui, "map_country", &map.query.country, table.countries()) {
                map.set_country(country);
            }
            ui.label("Region:");
            if let Some(region) = choice_combo(ui, "map_region", &map.query.region, table.regions()) {
                map.set_region(region);
            }
            ui.separator();

            let mut bounds = map.query.bounds;
            egui::Grid::new("map_bounds")
                .num_columns(3)
                .spacing([8.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Indicator");
                    ui.strong("Min");
                    ui.strong("Max");
                    ui.end_row();
                    for ind in Indicator::ALL {
                        let (lo, hi) = ind.default_range();
                        let range = bounds.get_mut(ind);
                        ui.label(ind.label());
                        ui.add(DragValue::new(&mut range.min).range(lo..=hi).speed(0.01).fixed_decimals(2));
                        ui.add(DragValue::new(&mut range.max).range(lo..=hi).speed(0.01).fixed_decimals(2));
                        ui.end_row();
                    }
                });
            if ui.small_button("Reset ranges").clicked() {
                bounds = Bounds::default();
            }
            map.set_bounds(bounds);

            ui.separator();
            missing_columns_note(ui, &map.outcome);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, tab switcher and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }

        ui.separator();

        ui.label(format!(
            "{} rows, {} countries, {} years",
            state.table.len(),
            state.table.countries().len(),
            state.table.years().len()
        ));

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
        .set_title("Open happiness data")
        .add_filter("Semicolon-separated", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
