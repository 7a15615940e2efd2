use crate::data::model::{CityRecord, Metric, Occupation, SalaryStat};

// ---------------------------------------------------------------------------
// Number formatting shared by the map popups, legend and table
// ---------------------------------------------------------------------------

/// Whole dollars with thousands separators, e.g. `$123,457`.
pub fn dollars(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn optional_dollars(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), dollars)
}

/// A metric value in the unit its column uses.
pub fn metric_value(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Affordability => format!("{value:.4}"),
        Metric::CostOfLiving => format!("{value:.1}"),
        Metric::CombinedSalary(_) | Metric::HomeValue | Metric::Salary(..) => dollars(value),
    }
}

/// Hover text for a city marker.
pub fn popup_text(record: &CityRecord, stat: SalaryStat) -> String {
    let salary = |occ| optional_dollars(record.salary(occ, stat));
    format!(
        "{}\nData Scientist Salary: {}\nRN Salary: {}\nAffordability (Combined): {:.4}",
        record.label(),
        salary(Occupation::DataScientist),
        salary(Occupation::RegisteredNurse),
        record.affordability_combined
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::city;

    #[test]
    fn dollars_group_thousands() {
        assert_eq!(dollars(0.0), "$0");
        assert_eq!(dollars(999.4), "$999");
        assert_eq!(dollars(1000.0), "$1,000");
        assert_eq!(dollars(123_456.6), "$123,457");
        assert_eq!(dollars(-1_234_567.0), "-$1,234,567");
        assert_eq!(dollars(f64::NAN), "n/a");
    }

    #[test]
    fn metric_values_use_column_units() {
        assert_eq!(metric_value(Metric::Affordability, 0.02), "0.0200");
        assert_eq!(metric_value(Metric::CostOfLiving, 101.24), "101.2");
        assert_eq!(metric_value(Metric::HomeValue, 450_000.0), "$450,000");
    }

    #[test]
    fn popup_lists_both_salaries() {
        let record = city("Austin", "TX", 0.02);
        assert_eq!(
            popup_text(&record, SalaryStat::Mean),
            "Austin, TX\nData Scientist Salary: $110,000\nRN Salary: $80,000\nAffordability (Combined): 0.0200"
        );
        assert!(popup_text(&record, SalaryStat::Pct10).contains("RN Salary: n/a"));
    }
}
