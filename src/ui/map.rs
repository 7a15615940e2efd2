use std::collections::HashMap;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, Points};

use super::format::{metric_value, popup_text};
use crate::color::{to_color32, to_hex};
use crate::state::AppState;

/// Marker fill opacity (0.6).
const MARKER_ALPHA: u8 = 153;

// ---------------------------------------------------------------------------
// City map (central panel, top)
// ---------------------------------------------------------------------------

/// Render the filtered cities as coloured circle markers at lon/lat.
pub fn city_map(ui: &mut Ui, state: &mut AppState, height: f32) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view cities  (File → Open…)");
        });
        return;
    }

    let reset_view = std::mem::take(&mut state.reset_map_view);
    let (min_lon, min_lat, max_lon, max_lat) = state.map.view_bounds();
    let radius = state.map.marker_radius;
    let scale = state.color_scale;
    let stat = state.criteria.stat;
    let records = state.visible_records();

    let popups: HashMap<String, String> = records
        .iter()
        .map(|r| (r.label(), popup_text(r, stat)))
        .collect();

    Plot::new("city_map")
        .height(height)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| match popups.get(name) {
            Some(text) => text.clone(),
            None => format!("{:.3}°, {:.3}°", value.y, value.x),
        })
        .show(ui, |plot_ui| {
            if reset_view {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [min_lon, min_lat],
                    [max_lon, max_lat],
                ));
            }
            for record in &records {
                let color = scale.color32_for_record(record);
                let fill =
                    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), MARKER_ALPHA);
                plot_ui.points(
                    Points::new(vec![[record.longitude, record.latitude]])
                        .name(record.label())
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(fill),
                );
            }
        });
}

/// One row of swatches explaining the marker colours.
pub fn legend(ui: &mut Ui, state: &AppState) {
    let scale = &state.color_scale;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong(state.metric.to_string());
        if scale.is_fallback() {
            ui.weak("no values to scale");
            return;
        }
        for (value, color) in scale.legend_entries(5) {
            ui.label(RichText::new("⏺").color(to_color32(color)))
                .on_hover_text(to_hex(color));
            ui.label(metric_value(state.metric, value));
        }
    });
}
