use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Occupation / SalaryStat – the two axes of the salary columns
// ---------------------------------------------------------------------------

/// The two occupations whose salaries the dataset tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Occupation {
    DataScientist,
    RegisteredNurse,
}

impl Occupation {
    pub const ALL: [Occupation; 2] = [Occupation::DataScientist, Occupation::RegisteredNurse];

    /// Column-name prefix used by the source table.
    pub fn column_prefix(self) -> &'static str {
        match self {
            Occupation::DataScientist => "Data Scientists",
            Occupation::RegisteredNurse => "Registered Nurses",
        }
    }

    /// Short label for table headers and popups.
    pub fn short_label(self) -> &'static str {
        match self {
            Occupation::DataScientist => "DS",
            Occupation::RegisteredNurse => "RN",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupation::DataScientist => write!(f, "Data scientist"),
            Occupation::RegisteredNurse => write!(f, "Registered nurse"),
        }
    }
}

/// Annual wage statistic variants (OEWS naming).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SalaryStat {
    #[default]
    Mean,
    Median,
    Pct10,
    Pct25,
    Pct75,
    Pct90,
}

impl SalaryStat {
    pub const ALL: [SalaryStat; 6] = [
        SalaryStat::Mean,
        SalaryStat::Median,
        SalaryStat::Pct10,
        SalaryStat::Pct25,
        SalaryStat::Pct75,
        SalaryStat::Pct90,
    ];

    pub fn column_suffix(self) -> &'static str {
        match self {
            SalaryStat::Mean => "A_MEAN",
            SalaryStat::Median => "A_MEDIAN",
            SalaryStat::Pct10 => "A_PCT10",
            SalaryStat::Pct25 => "A_PCT25",
            SalaryStat::Pct75 => "A_PCT75",
            SalaryStat::Pct90 => "A_PCT90",
        }
    }
}

impl fmt::Display for SalaryStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SalaryStat::Mean => "Mean",
            SalaryStat::Median => "Median",
            SalaryStat::Pct10 => "10th percentile",
            SalaryStat::Pct25 => "25th percentile",
            SalaryStat::Pct75 => "75th percentile",
            SalaryStat::Pct90 => "90th percentile",
        };
        write!(f, "{label}")
    }
}

/// Name of the salary value column, e.g. `Data Scientists_A_MEAN`.
pub fn salary_column(occupation: Occupation, stat: SalaryStat) -> String {
    format!("{}_{}", occupation.column_prefix(), stat.column_suffix())
}

/// Name of the matching imputation flag column.
pub fn imputed_column(occupation: Occupation, stat: SalaryStat) -> String {
    format!("{}_imputed", salary_column(occupation, stat))
}

// ---------------------------------------------------------------------------
// CityRecord – one row of the table
// ---------------------------------------------------------------------------

/// A salary value together with whether it was estimated upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryFigure {
    pub value: f64,
    pub imputed: bool,
}

/// One city of the precomputed affordability table.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Salary figures keyed by occupation and statistic variant.
    pub salaries: BTreeMap<(Occupation, SalaryStat), SalaryFigure>,
    /// Upstream-derived combined salary (mean variant).
    pub total_salary: f64,
    pub cost_of_living_index: f64,
    /// Typical home value at the dataset's reference date.
    pub home_value: f64,
    /// Upstream-derived ratio; the table is ranked by it.
    pub affordability_combined: f64,
}

impl CityRecord {
    pub fn salary(&self, occupation: Occupation, stat: SalaryStat) -> Option<f64> {
        self.salaries.get(&(occupation, stat)).map(|f| f.value)
    }

    pub fn is_imputed(&self, occupation: Occupation, stat: SalaryStat) -> Option<bool> {
        self.salaries.get(&(occupation, stat)).map(|f| f.imputed)
    }

    /// Combined salary of both occupations for `stat`.
    ///
    /// The mean variant reads the precomputed `Total_Salary` column; the
    /// other variants add the two occupations' figures.
    pub fn combined_salary(&self, stat: SalaryStat) -> Option<f64> {
        if stat == SalaryStat::Mean {
            return Some(self.total_salary);
        }
        let ds = self.salary(Occupation::DataScientist, stat)?;
        let rn = self.salary(Occupation::RegisteredNurse, stat)?;
        Some(ds + rn)
    }

    /// "City, ST" label used in popups and logs.
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

// ---------------------------------------------------------------------------
// Metric – a numeric column the map can be coloured by
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    #[default]
    Affordability,
    CombinedSalary(SalaryStat),
    CostOfLiving,
    HomeValue,
    Salary(Occupation, SalaryStat),
}

impl Metric {
    /// The same metric, re-pointed at another statistic variant.
    pub fn with_stat(self, stat: SalaryStat) -> Metric {
        match self {
            Metric::CombinedSalary(_) => Metric::CombinedSalary(stat),
            Metric::Salary(occ, _) => Metric::Salary(occ, stat),
            other => other,
        }
    }

    /// Colour-by choices for the selected statistic variant.
    pub fn choices(stat: SalaryStat) -> Vec<Metric> {
        vec![
            Metric::Affordability,
            Metric::CombinedSalary(stat),
            Metric::CostOfLiving,
            Metric::HomeValue,
            Metric::Salary(Occupation::DataScientist, stat),
            Metric::Salary(Occupation::RegisteredNurse, stat),
        ]
    }

    pub fn value(self, record: &CityRecord) -> Option<f64> {
        match self {
            Metric::Affordability => Some(record.affordability_combined),
            Metric::CombinedSalary(stat) => record.combined_salary(stat),
            Metric::CostOfLiving => Some(record.cost_of_living_index),
            Metric::HomeValue => Some(record.home_value),
            Metric::Salary(occ, stat) => record.salary(occ, stat),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Affordability => write!(f, "Affordability (combined)"),
            Metric::CombinedSalary(stat) => write!(f, "Combined salary ({stat})"),
            Metric::CostOfLiving => write!(f, "Cost of living index"),
            Metric::HomeValue => write!(f, "Home value"),
            Metric::Salary(occ, stat) => write!(f, "{occ} salary ({stat})"),
        }
    }
}

// ---------------------------------------------------------------------------
// CityTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed option lists.
#[derive(Debug, Clone)]
pub struct CityTable {
    pub records: Vec<CityRecord>,
    /// Sorted unique state abbreviations.
    pub states: Vec<String>,
    /// Sorted unique city names.
    pub cities: Vec<String>,
    /// Statistic variants present for both occupations.
    pub stats: Vec<SalaryStat>,
}

impl CityTable {
    pub fn from_records(records: Vec<CityRecord>, stats: Vec<SalaryStat>) -> Self {
        let states: BTreeSet<&str> = records.iter().map(|r| r.state.as_str()).collect();
        let cities: BTreeSet<&str> = records.iter().map(|r| r.city.as_str()).collect();
        let states = states.into_iter().map(str::to_string).collect();
        let cities = cities.into_iter().map(str::to_string).collect();
        CityTable {
            records,
            states,
            cities,
            stats,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A record with mean figures only, none imputed.
    pub fn city(city: &str, state: &str, affordability: f64) -> CityRecord {
        let mut salaries = BTreeMap::new();
        salaries.insert(
            (Occupation::DataScientist, SalaryStat::Mean),
            SalaryFigure {
                value: 110_000.0,
                imputed: false,
            },
        );
        salaries.insert(
            (Occupation::RegisteredNurse, SalaryStat::Mean),
            SalaryFigure {
                value: 80_000.0,
                imputed: false,
            },
        );
        CityRecord {
            city: city.to_string(),
            state: state.to_string(),
            latitude: 30.0,
            longitude: -97.0,
            salaries,
            total_salary: 190_000.0,
            cost_of_living_index: 100.0,
            home_value: 300_000.0,
            affordability_combined: affordability,
        }
    }

    pub fn with_salary(
        mut record: CityRecord,
        occupation: Occupation,
        stat: SalaryStat,
        value: f64,
        imputed: bool,
    ) -> CityRecord {
        record
            .salaries
            .insert((occupation, stat), SalaryFigure { value, imputed });
        record
    }
}
