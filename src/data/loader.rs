use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    imputed_column, salary_column, CityRecord, CityTable, Occupation, SalaryFigure, SalaryStat,
};

/// Home-value column of the bundled dataset (a dated index snapshot).
pub const DEFAULT_HOME_VALUE_COLUMN: &str = "6/30/2025";

const CITY: &str = "City";
const STATE: &str = "State";
const LATITUDE: &str = "Latitude";
const LONGITUDE: &str = "Longitude";
const TOTAL_SALARY: &str = "Total_Salary";
const COST_OF_LIVING: &str = "Cost of Living Index";
const AFFORDABILITY: &str = "Affordability_Combined";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Every way the dataset can be missing or unusable.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("cannot read dataset {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: expected a top-level JSON array of row objects")]
    NotRecords { path: PathBuf },
    #[error("malformed Parquet file {path}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },
    #[error("failed to decode Parquet batch in {path}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },
    #[error("required column '{0}' is missing")]
    MissingColumn(String),
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("unsupported dataset extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Knobs for interpreting the source table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Name of the column holding home values.
    pub home_value_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            home_value_column: DEFAULT_HOME_VALUE_COLUMN.to_string(),
        }
    }
}

/// Load the city table through the process-wide cache.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Arc<CityTable>, DataUnavailable> {
    static CACHE: OnceLock<DatasetCache> = OnceLock::new();
    CACHE.get_or_init(DatasetCache::new).load(path, options)
}

/// Memoizes loaded tables per `(path, home value column)`.
///
/// Failed loads are not remembered, so a fixed file can be retried.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<(PathBuf, String), Arc<CityTable>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &self,
        path: &Path,
        options: &LoadOptions,
    ) -> Result<Arc<CityTable>, DataUnavailable> {
        let key = (path.to_path_buf(), options.home_value_column.clone());
        if let Some(table) = self.lock().get(&key) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_file(path, options)?);
        log::info!(
            "Loaded {} cities from {} (statistics: {:?})",
            table.len(),
            path.display(),
            table.stats
        );
        Ok(Arc::clone(self.lock().entry(key).or_insert(table)))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(PathBuf, String), Arc<CityTable>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read and parse a table without caching.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one city per line
/// * `.json`    – `[{ "City": ..., "State": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<CityTable, DataUnavailable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DataUnavailable::UnsupportedFormat(other.to_string())),
    };

    let columns = ColumnIndex::resolve(&raw.headers, options)?;
    let records = raw
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| columns.parse_row(i + 1, cells))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CityTable::from_records(records, columns.stats()))
}

// ---------------------------------------------------------------------------
// Format readers: every format is flattened to text cells first
// ---------------------------------------------------------------------------

struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_csv(path: &Path) -> Result<RawTable, DataUnavailable> {
    let file = File::open(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| DataUnavailable::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// The first object's keys define the columns.
fn read_json(path: &Path) -> Result<RawTable, DataUnavailable> {
    let text = std::fs::read_to_string(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataUnavailable::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let not_records = || DataUnavailable::NotRecords {
        path: path.to_path_buf(),
    };

    let items = root.as_array().ok_or_else(not_records)?;
    let headers: Vec<String> = match items.first() {
        Some(first) => first.as_object().ok_or_else(not_records)?.keys().cloned().collect(),
        None => Vec::new(),
    };

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(items.len());
    for item in items {
        let obj = item.as_object().ok_or_else(not_records)?;
        rows.push(
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or_default())
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

fn json_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn read_parquet(path: &Path) -> Result<RawTable, DataUnavailable> {
    let file = File::open(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parquet_err = |source| DataUnavailable::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| DataUnavailable::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        for row in 0..batch.num_rows() {
            rows.push(batch.columns().iter().map(|col| cell_text(col, row)).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Render a single Arrow cell as text; nulls become empty cells.
fn cell_text(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Boolean => col.as_boolean().value(row).to_string(),
        other => format!("<{other:?}>"),
    }
}

// ---------------------------------------------------------------------------
// Column resolution and row parsing
// ---------------------------------------------------------------------------

struct SalaryColumns {
    occupation: Occupation,
    stat: SalaryStat,
    value: usize,
    imputed: usize,
}

struct ColumnIndex {
    headers: Vec<String>,
    city: usize,
    state: usize,
    latitude: usize,
    longitude: usize,
    total_salary: usize,
    cost_of_living: usize,
    home_value: usize,
    affordability: usize,
    salaries: Vec<SalaryColumns>,
}

impl ColumnIndex {
    fn resolve(headers: &[String], options: &LoadOptions) -> Result<Self, DataUnavailable> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require =
            |name: &str| find(name).ok_or_else(|| DataUnavailable::MissingColumn(name.to_string()));

        let mut salaries = Vec::new();
        for stat in SalaryStat::ALL {
            let any_present = Occupation::ALL.iter().any(|&occ| {
                find(&salary_column(occ, stat)).is_some()
                    || find(&imputed_column(occ, stat)).is_some()
            });
            // Mean is mandatory; other variants are all-or-nothing.
            if stat != SalaryStat::Mean && !any_present {
                continue;
            }
            for occupation in Occupation::ALL {
                salaries.push(SalaryColumns {
                    occupation,
                    stat,
                    value: require(&salary_column(occupation, stat))?,
                    imputed: require(&imputed_column(occupation, stat))?,
                });
            }
        }

        Ok(ColumnIndex {
            headers: headers.to_vec(),
            city: require(CITY)?,
            state: require(STATE)?,
            latitude: require(LATITUDE)?,
            longitude: require(LONGITUDE)?,
            total_salary: require(TOTAL_SALARY)?,
            cost_of_living: require(COST_OF_LIVING)?,
            home_value: require(&options.home_value_column)?,
            affordability: require(AFFORDABILITY)?,
            salaries,
        })
    }

    fn stats(&self) -> Vec<SalaryStat> {
        let mut stats: Vec<SalaryStat> = self.salaries.iter().map(|c| c.stat).collect();
        stats.dedup();
        stats
    }

    fn parse_row(&self, row: usize, cells: &[String]) -> Result<CityRecord, DataUnavailable> {
        let mut salaries = std::collections::BTreeMap::new();
        for cols in &self.salaries {
            // Blank optional variants are dropped; a blank mean stays as NaN.
            if cols.stat != SalaryStat::Mean && cell(cells, cols.value).is_empty() {
                continue;
            }
            salaries.insert(
                (cols.occupation, cols.stat),
                SalaryFigure {
                    value: self.number(row, cells, cols.value)?,
                    imputed: self.flag(row, cells, cols.imputed)?,
                },
            );
        }

        Ok(CityRecord {
            city: self.text(row, cells, self.city)?,
            state: self.text(row, cells, self.state)?,
            latitude: self.number(row, cells, self.latitude)?,
            longitude: self.number(row, cells, self.longitude)?,
            salaries,
            total_salary: self.number(row, cells, self.total_salary)?,
            cost_of_living_index: self.number(row, cells, self.cost_of_living)?,
            home_value: self.number(row, cells, self.home_value)?,
            affordability_combined: self.number(row, cells, self.affordability)?,
        })
    }

    fn invalid(&self, row: usize, idx: usize, value: &str) -> DataUnavailable {
        DataUnavailable::InvalidValue {
            row,
            column: self.headers[idx].clone(),
            value: value.to_string(),
        }
    }

    fn text(&self, row: usize, cells: &[String], idx: usize) -> Result<String, DataUnavailable> {
        let s = cell(cells, idx);
        if s.is_empty() {
            return Err(self.invalid(row, idx, s));
        }
        Ok(s.to_string())
    }

    /// A blank cell is a missing value (NaN); unparsable text is an error.
    fn number(&self, row: usize, cells: &[String], idx: usize) -> Result<f64, DataUnavailable> {
        let s = cell(cells, idx);
        if s.is_empty() {
            return Ok(f64::NAN);
        }
        s.parse::<f64>().map_err(|_| self.invalid(row, idx, s))
    }

    fn flag(&self, row: usize, cells: &[String], idx: usize) -> Result<bool, DataUnavailable> {
        let s = cell(cells, idx);
        match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "1.0" => Ok(true),
            "false" | "0" | "0.0" => Ok(false),
            _ => Err(self.invalid(row, idx, s)),
        }
    }
}

fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(|s| s.trim()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "City,State,Latitude,Longitude,\
Data Scientists_A_MEAN,Data Scientists_A_MEAN_imputed,\
Registered Nurses_A_MEAN,Registered Nurses_A_MEAN_imputed,\
Total_Salary,Cost of Living Index,6/30/2025,Affordability_Combined";

    const ROWS: &str = "Austin,TX,30.27,-97.74,120000,False,85000,False,205000,101.2,450000,0.02\n\
Reno,NV,39.53,-119.81,110000,True,90000,False,200000,105.5,480000,0.025\n";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("city-affordability-{}-{name}", std::process::id()))
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = temp_path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_csv_rows() {
        let path = write_temp("basic.csv", &format!("{HEADER}\n{ROWS}"));
        let table = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.stats, vec![SalaryStat::Mean]);
        let reno = &table.records[1];
        assert_eq!(reno.city, "Reno");
        assert_eq!(reno.state, "NV");
        assert_eq!(reno.longitude, -119.81);
        assert_eq!(reno.salary(Occupation::DataScientist, SalaryStat::Mean), Some(110_000.0));
        assert_eq!(reno.is_imputed(Occupation::DataScientist, SalaryStat::Mean), Some(true));
        assert_eq!(reno.is_imputed(Occupation::RegisteredNurse, SalaryStat::Mean), Some(false));
        assert_eq!(reno.home_value, 480_000.0);
        assert_eq!(reno.affordability_combined, 0.025);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(&temp_path("does-not-exist.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataUnavailable::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("cities.xlsx"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataUnavailable::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let header = HEADER.replace(",Affordability_Combined", "");
        let rows: String = ROWS
            .lines()
            .map(|l| format!("{}\n", l.rsplit_once(',').unwrap().0))
            .collect();
        let path = write_temp("no-afford.csv", &format!("{header}\n{rows}"));
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataUnavailable::MissingColumn(c) if c == "Affordability_Combined"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn home_value_column_is_configurable() {
        let path = write_temp("home.csv", &format!("{HEADER}\n{ROWS}"));
        let options = LoadOptions {
            home_value_column: "ZHVI".to_string(),
        };
        let err = load_file(&path, &options).unwrap_err();
        assert!(matches!(err, DataUnavailable::MissingColumn(c) if c == "ZHVI"));

        let renamed = format!("{}\n{ROWS}", HEADER.replace("6/30/2025", "ZHVI"));
        std::fs::write(&path, renamed).unwrap();
        let table = load_file(&path, &options).unwrap();
        assert_eq!(table.records[0].home_value, 450_000.0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unparsable_cells_are_invalid_values() {
        let rows = ROWS.replacen("120000", "lots", 1);
        let path = write_temp("bad-number.csv", &format!("{HEADER}\n{rows}"));
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        match err {
            DataUnavailable::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Data Scientists_A_MEAN");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }

        let rows = ROWS.replacen("False", "maybe", 1);
        std::fs::write(&path, format!("{HEADER}\n{rows}")).unwrap();
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataUnavailable::InvalidValue { value, .. } if value == "maybe"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn blank_required_number_loads_as_missing() {
        use crate::color::{build_color_scale, MISSING};
        use crate::data::filter::{select, FilterCriteria};
        use crate::data::model::Metric;

        let rows = ROWS.replace(",480000,0.025", ",,0.025");
        let path = write_temp("blank-home.csv", &format!("{HEADER}\n{rows}"));
        let table = load_file(&path, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 2);
        let reno = &table.records[1];
        assert!(reno.home_value.is_nan());
        assert_eq!(reno.affordability_combined, 0.025);

        let ranked = select(&table, &FilterCriteria::default());
        assert_eq!(ranked, vec![1, 0]);

        let scale = build_color_scale(&table.records, Metric::HomeValue);
        assert!(!scale.is_fallback());
        assert_eq!(scale.min(), 450_000.0);
        assert_eq!(scale.color_for_record(reno), MISSING);

        let blank_city = ROWS.replacen("Austin", "", 1);
        std::fs::write(&path, format!("{HEADER}\n{blank_city}")).unwrap();
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataUnavailable::InvalidValue { column, .. } if column == "City"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn optional_variant_needs_its_imputed_column() {
        let header = format!("{HEADER},Data Scientists_A_MEDIAN,Registered Nurses_A_MEDIAN");
        let rows: String = ROWS.lines().map(|l| format!("{l},100000,80000\n")).collect();
        let path = write_temp("median-no-flag.csv", &format!("{header}\n{rows}"));
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert!(
            matches!(err, DataUnavailable::MissingColumn(c) if c == "Data Scientists_A_MEDIAN_imputed")
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn blank_optional_variant_is_dropped_from_record() {
        let header = format!(
            "{HEADER},Data Scientists_A_MEDIAN,Data Scientists_A_MEDIAN_imputed,\
Registered Nurses_A_MEDIAN,Registered Nurses_A_MEDIAN_imputed"
        );
        let mut lines = ROWS.lines();
        let rows = format!(
            "{},100000,false,80000,true\n{},,,,\n",
            lines.next().unwrap(),
            lines.next().unwrap()
        );
        let path = write_temp("median.csv", &format!("{header}\n{rows}"));
        let table = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(table.stats, vec![SalaryStat::Mean, SalaryStat::Median]);
        let austin = &table.records[0];
        assert_eq!(austin.combined_salary(SalaryStat::Median), Some(180_000.0));
        assert_eq!(austin.is_imputed(Occupation::RegisteredNurse, SalaryStat::Median), Some(true));
        assert_eq!(table.records[1].salary(Occupation::DataScientist, SalaryStat::Median), None);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn json_records_match_csv() {
        let csv_path = write_temp("same.csv", &format!("{HEADER}\n{ROWS}"));
        let json = r#"[
            {"City": "Austin", "State": "TX", "Latitude": 30.27, "Longitude": -97.74,
             "Data Scientists_A_MEAN": 120000, "Data Scientists_A_MEAN_imputed": false,
             "Registered Nurses_A_MEAN": 85000, "Registered Nurses_A_MEAN_imputed": false,
             "Total_Salary": 205000, "Cost of Living Index": 101.2, "6/30/2025": 450000,
             "Affordability_Combined": 0.02},
            {"City": "Reno", "State": "NV", "Latitude": 39.53, "Longitude": -119.81,
             "Data Scientists_A_MEAN": 110000, "Data Scientists_A_MEAN_imputed": true,
             "Registered Nurses_A_MEAN": 90000, "Registered Nurses_A_MEAN_imputed": false,
             "Total_Salary": 200000, "Cost of Living Index": 105.5, "6/30/2025": 480000,
             "Affordability_Combined": 0.025}
        ]"#;
        let json_path = write_temp("same.json", json);

        let from_csv = load_file(&csv_path, &LoadOptions::default()).unwrap();
        let from_json = load_file(&json_path, &LoadOptions::default()).unwrap();
        assert_eq!(from_csv.records, from_json.records);

        std::fs::write(&json_path, r#"{"City": "Austin"}"#).unwrap();
        let err = load_file(&json_path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataUnavailable::NotRecords { .. }));

        std::fs::remove_file(csv_path).ok();
        std::fs::remove_file(json_path).ok();
    }

    #[test]
    fn parquet_columns_match_csv() {
        use arrow::array::{BooleanArray, Float64Array, StringArray};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let f64s = |v: Vec<f64>| Arc::new(Float64Array::from(v)) as ArrayRef;
        let bools = |v: Vec<bool>| Arc::new(BooleanArray::from(v)) as ArrayRef;
        let strs = |v: Vec<&str>| Arc::new(StringArray::from(v)) as ArrayRef;
        let batch = RecordBatch::try_from_iter(vec![
            ("City", strs(vec!["Austin", "Reno"])),
            ("State", strs(vec!["TX", "NV"])),
            ("Latitude", f64s(vec![30.27, 39.53])),
            ("Longitude", f64s(vec![-97.74, -119.81])),
            ("Data Scientists_A_MEAN", f64s(vec![120000.0, 110000.0])),
            ("Data Scientists_A_MEAN_imputed", bools(vec![false, true])),
            ("Registered Nurses_A_MEAN", f64s(vec![85000.0, 90000.0])),
            ("Registered Nurses_A_MEAN_imputed", bools(vec![false, false])),
            ("Total_Salary", f64s(vec![205000.0, 200000.0])),
            ("Cost of Living Index", f64s(vec![101.2, 105.5])),
            ("6/30/2025", f64s(vec![450000.0, 480000.0])),
            ("Affordability_Combined", f64s(vec![0.02, 0.025])),
        ])
        .unwrap();

        let pq_path = temp_path("same.parquet");
        let file = File::create(&pq_path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let csv_path = write_temp("same-pq.csv", &format!("{HEADER}\n{ROWS}"));
        let from_csv = load_file(&csv_path, &LoadOptions::default()).unwrap();
        let from_parquet = load_file(&pq_path, &LoadOptions::default()).unwrap();
        assert_eq!(from_csv.records, from_parquet.records);

        std::fs::remove_file(csv_path).ok();
        std::fs::remove_file(pq_path).ok();
    }

    #[test]
    fn cache_returns_same_table_without_rereading() {
        let path = write_temp("cached.csv", &format!("{HEADER}\n{ROWS}"));
        let cache = DatasetCache::new();
        let first = cache.load(&path, &LoadOptions::default()).unwrap();

        std::fs::remove_file(&path).unwrap();
        let second = cache.load(&path, &LoadOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cache_does_not_remember_failures() {
        let path = temp_path("late.csv");
        let cache = DatasetCache::new();
        assert!(cache.load(&path, &LoadOptions::default()).is_err());

        std::fs::write(&path, format!("{HEADER}\n{ROWS}")).unwrap();
        let table = cache.load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
        std::fs::remove_file(path).ok();
    }
}
