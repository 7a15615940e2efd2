use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{map, panels, table};

/// Share of the central panel given to the map; the table gets the rest.
const MAP_FRACTION: f32 = 0.55;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CityAffordabilityApp {
    pub state: AppState,
}

impl CityAffordabilityApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::from_config(config),
        }
    }
}

impl eframe::App for CityAffordabilityApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map above, ranked table below ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("City affordability map");
            map::legend(ui, &self.state);
            let map_height = ui.available_height() * MAP_FRACTION;
            map::city_map(ui, &mut self.state, map_height);

            ui.separator();
            ui.heading("Top cities by combined affordability");
            table::results_table(ui, &self.state);
        });
    }
}
