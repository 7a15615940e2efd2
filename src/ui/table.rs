use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use super::format::{dollars, optional_dollars};
use crate::data::model::Occupation;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Results table (central panel, bottom)
// ---------------------------------------------------------------------------

/// Visible cities, already ranked by combined affordability.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let records = state.visible_records();
    if records.is_empty() {
        ui.weak("No rows to show.");
        return;
    }

    let stat = state.criteria.stat;
    let scale = &state.color_scale;
    let headers = [
        String::new(),
        "City".to_string(),
        "State".to_string(),
        format!("{} salary ({stat})", Occupation::DataScientist.short_label()),
        format!("{} salary ({stat})", Occupation::RegisteredNurse.short_label()),
        format!("Combined salary ({stat})"),
        "Affordability (combined)".to_string(),
        "Cost of Living Index".to_string(),
        "Home value".to_string(),
    ];

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(16.0))
        .columns(Column::auto().at_least(60.0), headers.len() - 1)
        .header(20.0, |mut header| {
            for title in &headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(title.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let record = records[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new("⏺").color(scale.color32_for_record(record)));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.city.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.state.as_str());
                });
                for occ in Occupation::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(optional_dollars(record.salary(occ, stat)));
                    });
                }
                row.col(|ui: &mut Ui| {
                    ui.label(optional_dollars(record.combined_salary(stat)));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.4}", record.affordability_combined));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.1}", record.cost_of_living_index));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(dollars(record.home_value));
                });
            });
        });
}
