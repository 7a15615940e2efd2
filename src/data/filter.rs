use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::model::{CityRecord, CityTable, Metric, Occupation, SalaryStat};

// ---------------------------------------------------------------------------
// Filter predicate: the user's constraints for one interaction
// ---------------------------------------------------------------------------

/// Inclusive numeric range; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// `min <= value <= max`.  NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Everything the side panel lets the user constrain.
///
/// Empty `states` / `cities` sets mean "no restriction".  The salary and
/// imputation predicates read the figures of the `stat` variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub exclude_imputed: bool,
    pub stat: SalaryStat,
    pub min_data_scientist_salary: Option<f64>,
    pub min_nurse_salary: Option<f64>,
    pub min_combined_salary: Option<f64>,
    pub home_value: Bounds,
    pub affordability: Bounds,
}

impl FilterCriteria {
    /// True when no predicate category is active.
    pub fn is_unrestricted(&self) -> bool {
        self.states.is_empty()
            && self.cities.is_empty()
            && !self.exclude_imputed
            && self.min_data_scientist_salary.is_none()
            && self.min_nurse_salary.is_none()
            && self.min_combined_salary.is_none()
            && !self.home_value.is_active()
            && !self.affordability.is_active()
    }

    /// Whether `record` satisfies every active predicate (logical AND).
    pub fn matches(&self, record: &CityRecord) -> bool {
        if !self.states.is_empty() && !self.states.contains(&record.state) {
            return false;
        }
        if !self.cities.is_empty() && !self.cities.contains(&record.city) {
            return false;
        }
        if self.exclude_imputed {
            // Both occupations must be observed; an absent flag counts as unknown.
            let observed = Occupation::ALL
                .iter()
                .all(|&occ| record.is_imputed(occ, self.stat) == Some(false));
            if !observed {
                return false;
            }
        }
        if !at_least(self.min_data_scientist_salary, || {
            record.salary(Occupation::DataScientist, self.stat)
        }) {
            return false;
        }
        if !at_least(self.min_nurse_salary, || {
            record.salary(Occupation::RegisteredNurse, self.stat)
        }) {
            return false;
        }
        if !at_least(self.min_combined_salary, || record.combined_salary(self.stat)) {
            return false;
        }
        if self.home_value.is_active() && !self.home_value.contains(record.home_value) {
            return false;
        }
        if self.affordability.is_active()
            && !self.affordability.contains(record.affordability_combined)
        {
            return false;
        }
        true
    }
}

/// Inactive minimum passes; an active one needs a present value `>= min`.
fn at_least(min: Option<f64>, value: impl FnOnce() -> Option<f64>) -> bool {
    match min {
        None => true,
        Some(min) => value().is_some_and(|v| v >= min),
    }
}

// ---------------------------------------------------------------------------
// Applying the criteria
// ---------------------------------------------------------------------------

/// Records passing all active predicates, in input order.
pub fn apply<'a>(records: &'a [CityRecord], criteria: &FilterCriteria) -> Vec<&'a CityRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Indices of records passing all active predicates, in input order.
pub fn filtered_indices(records: &[CityRecord], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Descending by combined affordability.  Stable; NaN sorts last.
pub fn sort_by_affordability(records: &mut [&CityRecord]) {
    records.sort_by(|a, b| affordability_desc(a, b));
}

fn affordability_desc(a: &CityRecord, b: &CityRecord) -> Ordering {
    let (x, y) = (a.affordability_combined, b.affordability_combined);
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => y.total_cmp(&x),
    }
}

/// The rows the table shows: filtered, then ranked by affordability.
pub fn select(table: &CityTable, criteria: &FilterCriteria) -> Vec<usize> {
    let mut indices = filtered_indices(&table.records, criteria);
    indices.sort_by(|&a, &b| affordability_desc(&table.records[a], &table.records[b]));
    indices
}

// ---------------------------------------------------------------------------
// Option helpers for the widget layer
// ---------------------------------------------------------------------------

/// Sorted unique city names, narrowed to `states` when any are selected.
pub fn city_options(records: &[CityRecord], states: &BTreeSet<String>) -> Vec<String> {
    let cities: BTreeSet<&str> = records
        .iter()
        .filter(|r| states.is_empty() || states.contains(&r.state))
        .map(|r| r.city.as_str())
        .collect();
    cities.into_iter().map(str::to_string).collect()
}

/// Finite `(min, max)` of `metric` over `records`, for slider bounds.
pub fn metric_range<'a>(
    records: impl IntoIterator<Item = &'a CityRecord>,
    metric: Metric,
) -> Option<(f64, f64)> {
    records
        .into_iter()
        .filter_map(|r| metric.value(r))
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
