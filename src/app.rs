use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HappinessApp {
    pub state: AppState,
}

impl HappinessApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::from_config(config),
        }
    }
}

impl eframe::App for HappinessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters of the active tab ----
        egui::SidePanel::left("filter_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| match self.state.tab {
                Tab::Overview => panels::overview_panel(ui, &mut self.state),
                Tab::Comparison => panels::comparison_panel(ui, &mut self.state),
                Tab::Map => panels::map_panel(ui, &mut self.state),
            });

        // Every change made above is applied in one pass.
        self.state.refresh();

        // ---- Central panel: view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Overview => table::overview_table(ui, &self.state),
            Tab::Comparison => plot::comparison_plot(ui, &self.state),
            Tab::Map => plot::choropleth(ui, &self.state),
        });
    }
}
