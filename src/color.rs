use eframe::egui::Color32;
use palette::{named, Srgb};

use crate::data::filter::metric_range;
use crate::data::model::{CityRecord, Metric};

// ---------------------------------------------------------------------------
// Five-stop palette: red → yellow → green → blue → purple
// ---------------------------------------------------------------------------

const STOPS: [Srgb<u8>; 5] = [
    named::RED,
    named::YELLOW,
    named::GREEN,
    named::BLUE,
    named::PURPLE,
];

/// Colour for values that cannot be placed on the scale.
pub const MISSING: Srgb<u8> = named::GRAY;

/// Piecewise-linear interpolation over evenly spaced palette breakpoints.
///
/// `t` is clamped to `[0, 1]`; stop `i` sits at `i / (STOPS.len() - 1)`.
pub fn interpolate(t: f64) -> Srgb<u8> {
    if t.is_nan() {
        return MISSING;
    }
    let last_segment = STOPS.len() - 2;
    let pos = t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(last_segment);
    let frac = (pos - i as f64) as f32;

    let a: Srgb = STOPS[i].into_format();
    let b: Srgb = STOPS[i + 1].into_format();
    let lerp = |x: f32, y: f32| x + (y - x) * frac;
    Srgb::new(
        lerp(a.red, b.red),
        lerp(a.green, b.green),
        lerp(a.blue, b.blue),
    )
    .into_format()
}

pub fn to_color32(color: Srgb<u8>) -> Color32 {
    Color32::from_rgb(color.red, color.green, color.blue)
}

/// `#rrggbb` form, as used by HTML popups and exports.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

// ---------------------------------------------------------------------------
// ColorScale: metric value → colour over the observed range
// ---------------------------------------------------------------------------

/// Continuous colour scale over `[min, max]` of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub metric: Metric,
    min: f64,
    max: f64,
    fallback: bool,
}

/// Scale `metric` over the finite values found in `records`.
///
/// With no finite value (e.g. an empty filter result) the scale spans the
/// fixed range `[0, 1]` and reports `is_fallback()`.
pub fn build_color_scale<'a>(
    records: impl IntoIterator<Item = &'a CityRecord>,
    metric: Metric,
) -> ColorScale {
    match metric_range(records, metric) {
        Some((min, max)) => ColorScale {
            metric,
            min,
            max,
            fallback: false,
        },
        None => ColorScale {
            metric,
            min: 0.0,
            max: 1.0,
            fallback: true,
        },
    }
}

impl ColorScale {
    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// All observed values were equal.
    pub fn is_constant(&self) -> bool {
        self.min == self.max
    }

    /// Relative position of `value` in `[0, 1]`, clamped.
    pub fn position(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        if self.is_constant() {
            return Some(0.0);
        }
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }

    pub fn color_for(&self, value: f64) -> Srgb<u8> {
        self.position(value).map_or(MISSING, interpolate)
    }

    pub fn color_for_record(&self, record: &CityRecord) -> Srgb<u8> {
        self.metric
            .value(record)
            .map_or(MISSING, |v| self.color_for(v))
    }

    pub fn color32_for_record(&self, record: &CityRecord) -> Color32 {
        to_color32(self.color_for_record(record))
    }

    /// `n` evenly spaced `(value, colour)` pairs from min to max for a legend.
    /// A constant scale has a single entry.
    pub fn legend_entries(&self, n: usize) -> Vec<(f64, Srgb<u8>)> {
        if self.is_constant() || n < 2 {
            return vec![(self.min, self.color_for(self.min))];
        }
        (0..n)
            .map(|i| {
                let value = self.min + (self.max - self.min) * i as f64 / (n - 1) as f64;
                (value, self.color_for(value))
            })
            .collect()
    }
}
