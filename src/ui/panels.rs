use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::Bounds;
use crate::data::model::Metric;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

enum SelectionChange {
    Toggle(String),
    Clear,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter cities and data");
    ui.separator();

    // Keep the table alive independently of `state` so widgets can mutate it.
    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Colour-by selector ----
            ui.strong("Color by");
            let current_metric = state.metric;
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(current_metric.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for metric in Metric::choices(state.criteria.stat) {
                        if ui
                            .selectable_label(current_metric == metric, metric.to_string())
                            .clicked()
                        {
                            state.set_metric(metric);
                        }
                    }
                });

            // ---- Salary statistic the filters apply to ----
            ui.strong("Salary statistic");
            let current_stat = state.criteria.stat;
            egui::ComboBox::from_id_salt("salary_stat")
                .selected_text(current_stat.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for &stat in &table.stats {
                        if ui
                            .selectable_label(current_stat == stat, stat.to_string())
                            .clicked()
                        {
                            state.set_stat(stat);
                        }
                    }
                });
            ui.separator();

            changed |= ui
                .checkbox(
                    &mut state.criteria.exclude_imputed,
                    "Only show non-imputed cities",
                )
                .changed();
            ui.separator();

            // ---- State / city multi-selects ----
            match multi_select(ui, "Select state(s)", &table.states, &state.criteria.states) {
                Some(SelectionChange::Toggle(s)) => state.toggle_state(&s),
                Some(SelectionChange::Clear) => {
                    state.criteria.states.clear();
                    changed = true;
                }
                None => {}
            }

            ui.horizontal(|ui: &mut Ui| {
                ui.label("Search");
                ui.text_edit_singleline(&mut state.city_query);
            });
            let cities = state.city_choices();
            match multi_select(ui, "Select city/cities", &cities, &state.criteria.cities) {
                Some(SelectionChange::Toggle(c)) => state.toggle_city(&c),
                Some(SelectionChange::Clear) => {
                    state.criteria.cities.clear();
                    changed = true;
                }
                None => {}
            }
            ui.separator();

            // ---- Numeric constraints ----
            ui.strong("Thresholds");
            let ranges = state.ranges;
            let criteria = &mut state.criteria;
            changed |= min_slider(
                ui,
                "Minimum data scientist salary",
                &mut criteria.min_data_scientist_salary,
                ranges.data_scientist_salary,
                0,
            );
            changed |= min_slider(
                ui,
                "Minimum nurse salary",
                &mut criteria.min_nurse_salary,
                ranges.nurse_salary,
                0,
            );
            changed |= min_slider(
                ui,
                "Minimum combined salary",
                &mut criteria.min_combined_salary,
                ranges.combined_salary,
                0,
            );
            changed |= bounds_slider(
                ui,
                "Home value range",
                &mut criteria.home_value,
                ranges.home_value,
                0,
            );
            changed |= bounds_slider(
                ui,
                "Affordability range",
                &mut criteria.affordability,
                ranges.affordability,
                4,
            );
            ui.separator();

            if ui.button("Clear all filters").clicked() {
                state.clear_filters();
            }
        });

    if changed {
        state.refresh();
    }
}

/// Collapsible checkbox list.  Nothing selected means no restriction.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    options: &[String],
    selected: &BTreeSet<String>,
) -> Option<SelectionChange> {
    let mut change = None;
    let header = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                change = Some(SelectionChange::Clear);
            }
            for option in options {
                let mut checked = selected.contains(option);
                if ui.checkbox(&mut checked, option.as_str()).changed() {
                    change = Some(SelectionChange::Toggle(option.clone()));
                }
            }
        });

    change
}

/// Checkbox enabling a lower bound, plus its slider when enabled.
fn min_slider(
    ui: &mut Ui,
    label: &str,
    value: &mut Option<f64>,
    range: Option<(f64, f64)>,
    decimals: usize,
) -> bool {
    let Some((lo, hi)) = range else {
        ui.weak(format!("{label}: no data"));
        return false;
    };

    let mut changed = false;
    let mut enabled = value.is_some();
    if ui.checkbox(&mut enabled, label).changed() {
        *value = enabled.then_some(lo);
        changed = true;
    }
    if let Some(v) = value {
        changed |= ui
            .add(Slider::new(v, lo..=hi).fixed_decimals(decimals))
            .changed();
    }
    changed
}

/// Checkbox enabling an inclusive range, plus min/max sliders when enabled.
fn bounds_slider(
    ui: &mut Ui,
    label: &str,
    bounds: &mut Bounds,
    range: Option<(f64, f64)>,
    decimals: usize,
) -> bool {
    let Some((lo, hi)) = range else {
        ui.weak(format!("{label}: no data"));
        return false;
    };

    let mut changed = false;
    let mut enabled = bounds.is_active();
    if ui.checkbox(&mut enabled, label).changed() {
        *bounds = if enabled {
            Bounds::between(lo, hi)
        } else {
            Bounds::default()
        };
        changed = true;
    }
    if let (Some(min), Some(max)) = (&mut bounds.min, &mut bounds.max) {
        changed |= ui
            .add(Slider::new(min, lo..=hi).text("min").fixed_decimals(decimals))
            .changed();
        changed |= ui
            .add(Slider::new(max, lo..=hi).text("max").fixed_decimals(decimals))
            .changed();
        if *min > *max {
            *max = *min;
        }
    }
    changed
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

        if ui.button("Reset map view").clicked() {
            state.reset_map_view = true;
        }

        ui.separator();
        ui.label(state.summary());

        if let Some(path) = &state.source {
            ui.separator();
            ui.weak(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open city table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
