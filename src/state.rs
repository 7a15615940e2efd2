use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::{build_color_scale, ColorScale};
use crate::config::{AppConfig, MapConfig};
use crate::data::filter::{city_options, metric_range, select, FilterCriteria};
use crate::data::loader::{self, LoadOptions};
use crate::data::model::{CityRecord, CityTable, Metric, Occupation, SalaryStat};

// ---------------------------------------------------------------------------
// Slider bounds derived from the full table
// ---------------------------------------------------------------------------

/// `(min, max)` of each constrainable field over the whole table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderRanges {
    pub data_scientist_salary: Option<(f64, f64)>,
    pub nurse_salary: Option<(f64, f64)>,
    pub combined_salary: Option<(f64, f64)>,
    pub home_value: Option<(f64, f64)>,
    pub affordability: Option<(f64, f64)>,
}

impl SliderRanges {
    pub fn compute(records: &[CityRecord], stat: SalaryStat) -> Self {
        Self {
            data_scientist_salary: metric_range(
                records,
                Metric::Salary(Occupation::DataScientist, stat),
            ),
            nurse_salary: metric_range(records, Metric::Salary(Occupation::RegisteredNurse, stat)),
            combined_salary: metric_range(records, Metric::CombinedSalary(stat)),
            home_value: metric_range(records, Metric::HomeValue),
            affordability: metric_range(records, Metric::Affordability),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Widgets mutate `criteria` / `metric` and then call [`AppState::refresh`];
/// nothing is recomputed implicitly.
pub struct AppState {
    /// Loaded table (None until a load succeeds).
    pub table: Option<Arc<CityTable>>,

    /// File the table came from.
    pub source: Option<PathBuf>,

    pub load_options: LoadOptions,

    pub map: MapConfig,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Indices of rows passing the filters, ranked by affordability (cached).
    pub visible_indices: Vec<usize>,

    /// Which metric is used for colouring.
    pub metric: Metric,

    /// Active colour scale over the visible rows.
    pub color_scale: ColorScale,

    pub ranges: SliderRanges,

    /// Text typed into the city search box.
    pub city_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Ask the map to jump back to the configured center on the next frame.
    pub reset_map_view: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source: None,
            load_options: LoadOptions::default(),
            map: MapConfig::default(),
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            metric: Metric::default(),
            color_scale: build_color_scale(std::iter::empty(), Metric::default()),
            ranges: SliderRanges::default(),
            city_query: String::new(),
            status_message: None,
            reset_map_view: true,
        }
    }
}

impl AppState {
    /// Build the state for `config` and load its dataset.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut state = Self {
            load_options: config.load_options(),
            map: config.map.clone(),
            ..Self::default()
        };
        state.open(&config.data.path);
        state
    }

    /// Load (or fetch from cache) the table at `path`.  A failure keeps the
    /// previous table and is surfaced through `status_message`.
    pub fn open(&mut self, path: &Path) {
        match loader::load(path, &self.load_options) {
            Ok(table) => {
                self.source = Some(path.to_path_buf());
                self.set_table(table);
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table, reset filters and colour.
    pub fn set_table(&mut self, table: Arc<CityTable>) {
        self.criteria = FilterCriteria::default();
        self.metric = Metric::default();
        self.city_query.clear();
        self.ranges = SliderRanges::compute(&table.records, self.criteria.stat);
        self.table = Some(table);
        self.status_message = None;
        self.reset_map_view = true;
        self.refresh();
    }

    /// Recompute visible rows and the colour scale from the current criteria.
    pub fn refresh(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.visible_indices = select(table, &self.criteria);
        self.color_scale = build_color_scale(
            self.visible_indices.iter().map(|&i| &table.records[i]),
            self.metric,
        );
        log::debug!(
            "{} of {} cities visible, colouring by {}",
            self.visible_indices.len(),
            table.len(),
            self.metric
        );
    }

    /// Visible rows in display order.
    pub fn visible_records(&self) -> Vec<&CityRecord> {
        match &self.table {
            Some(table) => self
                .visible_indices
                .iter()
                .map(|&i| &table.records[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// City choices for the multi-select, narrowed by selected states and
    /// the search box.  Already-selected cities always stay listed, so a
    /// selection hidden by a state filter can still be unchecked.
    pub fn city_choices(&self) -> Vec<String> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        let query = self.city_query.trim().to_lowercase();
        let mut choices: BTreeSet<String> = city_options(&table.records, &self.criteria.states)
            .into_iter()
            .filter(|c| query.is_empty() || c.to_lowercase().contains(&query))
            .collect();
        choices.extend(self.criteria.cities.iter().cloned());
        choices.into_iter().collect()
    }

    /// Switch the salary statistic the filters and metric use.
    ///
    /// Active salary minimums are clamped into the new statistic's range, or
    /// dropped when the statistic has no values.
    pub fn set_stat(&mut self, stat: SalaryStat) {
        self.criteria.stat = stat;
        self.metric = self.metric.with_stat(stat);
        if let Some(table) = &self.table {
            self.ranges = SliderRanges::compute(&table.records, stat);
        }
        let ranges = self.ranges;
        let criteria = &mut self.criteria;
        clamp_minimum(&mut criteria.min_data_scientist_salary, ranges.data_scientist_salary);
        clamp_minimum(&mut criteria.min_nurse_salary, ranges.nurse_salary);
        clamp_minimum(&mut criteria.min_combined_salary, ranges.combined_salary);
        self.refresh();
    }

    /// Set colour metric and rebuild the scale.
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
        self.refresh();
    }

    pub fn toggle_state(&mut self, state: &str) {
        toggle(&mut self.criteria.states, state);
        self.refresh();
    }

    pub fn toggle_city(&mut self, city: &str) {
        toggle(&mut self.criteria.cities, city);
        self.refresh();
    }

    /// Reset every constraint; the table stays loaded.
    pub fn clear_filters(&mut self) {
        let stat = self.criteria.stat;
        self.criteria = FilterCriteria {
            stat,
            ..FilterCriteria::default()
        };
        self.city_query.clear();
        self.refresh();
    }

    /// One-line summary for the top bar.
    pub fn summary(&self) -> String {
        match &self.table {
            None => "No dataset loaded".to_string(),
            Some(table) if table.is_empty() => "The dataset has no rows".to_string(),
            Some(_) if self.visible_indices.is_empty() => {
                "No cities match the current filters".to_string()
            }
            Some(table) if self.criteria.is_unrestricted() => {
                format!("All {} cities shown", table.len())
            }
            Some(table) => format!(
                "{} of {} cities shown",
                self.visible_indices.len(),
                table.len()
            ),
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

fn clamp_minimum(minimum: &mut Option<f64>, range: Option<(f64, f64)>) {
    *minimum = match (*minimum, range) {
        (Some(v), Some((lo, hi))) => Some(v.clamp(lo, hi)),
        _ => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{city, with_salary};

    fn loaded() -> AppState {
        let records = vec![
            city("Austin", "TX", 0.02),
            city("Dallas", "TX", 0.03),
            city("Reno", "NV", 0.025),
        ];
        let mut state = AppState::default();
        state.set_table(Arc::new(CityTable::from_records(records, vec![SalaryStat::Mean])));
        state
    }

    fn visible_names(state: &AppState) -> Vec<String> {
        state
            .visible_records()
            .iter()
            .map(|r| r.city.clone())
            .collect()
    }

    #[test]
    fn new_table_shows_everything_ranked() {
        let mut state = loaded();
        assert_eq!(visible_names(&state), vec!["Dallas", "Reno", "Austin"]);
        assert_eq!(state.color_scale.min(), 0.02);
        assert_eq!(state.color_scale.max(), 0.03);
        assert_eq!(state.ranges.affordability, Some((0.02, 0.03)));
        assert_eq!(state.summary(), "All 3 cities shown");

        state.toggle_state("NV");
        assert_eq!(state.summary(), "1 of 3 cities shown");
    }

    #[test]
    fn toggling_a_state_narrows_and_rescales() {
        let mut state = loaded();
        state.toggle_state("TX");
        assert_eq!(visible_names(&state), vec!["Dallas", "Austin"]);
        assert_eq!(state.city_choices(), vec!["Austin", "Dallas"]);

        state.toggle_state("TX");
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn empty_result_renders_as_empty_state() {
        let mut state = loaded();
        state.toggle_city("Reno");
        state.toggle_state("TX");
        assert!(state.visible_records().is_empty());
        assert!(state.color_scale.is_fallback());
        assert_eq!(state.summary(), "No cities match the current filters");

        state.clear_filters();
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn switching_stat_repoints_metric_and_ranges() {
        let mut state = loaded();
        state.set_metric(Metric::Salary(Occupation::RegisteredNurse, SalaryStat::Mean));
        state.set_stat(SalaryStat::Median);

        assert_eq!(
            state.metric,
            Metric::Salary(Occupation::RegisteredNurse, SalaryStat::Median)
        );
        assert_eq!(state.ranges.nurse_salary, None);
        assert!(state.color_scale.is_fallback());
    }

    #[test]
    fn city_search_keeps_selected_entries() {
        let mut state = loaded();
        state.toggle_city("Reno");
        state.city_query = "dal".to_string();
        assert_eq!(state.city_choices(), vec!["Dallas", "Reno"]);
    }

    #[test]
    fn selected_city_outside_state_filter_stays_listed() {
        let mut state = loaded();
        state.toggle_city("Reno");
        state.toggle_state("TX");
        assert!(state.visible_records().is_empty());
        assert_eq!(state.city_choices(), vec!["Austin", "Dallas", "Reno"]);

        state.toggle_city("Reno");
        assert_eq!(visible_names(&state), vec!["Dallas", "Austin"]);
    }

    #[test]
    fn switching_stat_clamps_salary_minimums() {
        let records = vec![
            with_salary(
                city("Austin", "TX", 0.02),
                Occupation::DataScientist,
                SalaryStat::Median,
                90_000.0,
                false,
            ),
            with_salary(
                city("Dallas", "TX", 0.03),
                Occupation::DataScientist,
                SalaryStat::Median,
                95_000.0,
                false,
            ),
        ];
        let mut state = AppState::default();
        state.set_table(Arc::new(CityTable::from_records(
            records,
            vec![SalaryStat::Mean, SalaryStat::Median],
        )));
        state.criteria.min_data_scientist_salary = Some(110_000.0);
        state.criteria.min_nurse_salary = Some(80_000.0);
        state.refresh();
        assert_eq!(state.visible_indices.len(), 2);

        state.set_stat(SalaryStat::Median);
        assert_eq!(state.criteria.min_data_scientist_salary, Some(95_000.0));
        assert_eq!(state.criteria.min_nurse_salary, None);
        assert_eq!(visible_names(&state), vec!["Dallas"]);
    }

    #[test]
    fn exclude_imputed_through_state() {
        let records = vec![
            city("Austin", "TX", 0.02),
            with_salary(
                city("Dallas", "TX", 0.03),
                Occupation::RegisteredNurse,
                SalaryStat::Mean,
                75_000.0,
                true,
            ),
        ];
        let mut state = AppState::default();
        state.set_table(Arc::new(CityTable::from_records(records, vec![SalaryStat::Mean])));
        state.criteria.exclude_imputed = true;
        state.refresh();
        assert_eq!(visible_names(&state), vec!["Austin"]);
        assert!(state.color_scale.is_constant());
    }

    #[test]
    fn failed_open_reports_and_keeps_table() {
        let mut state = loaded();
        let missing = std::env::temp_dir().join("city-affordability-missing-table.csv");
        state.open(&missing);
        assert!(state.table.is_some());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error: cannot read dataset")));
    }
}
