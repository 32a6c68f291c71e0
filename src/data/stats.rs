use thiserror::Error;

use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// A cell that could not be read as a finite number. Counts as missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not numeric: {0:?}")]
pub struct CoercionFailure(pub String);

/// Best-effort numeric reading of a text cell.
pub fn coerce(cell: &str) -> Result<f64, CoercionFailure> {
    let trimmed = cell.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoercionFailure(cell.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Per-column statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumnStat {
    pub column: String,
    /// Cells that coerced successfully.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN when `count < 2`.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericColumnStat {
    /// `None` when `values` is empty.
    pub fn from_values(column: &str, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        };

        Some(Self {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: values[0],
            q25: percentile(&values, 0.25),
            median: percentile(&values, 0.50),
            q75: percentile(&values, 0.75),
            max: values[n - 1],
        })
    }

    /// Rows of the statistics panel, in display order.
    pub fn describe(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty
/// and ascending.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Statistics for every column of a view that has at least one numeric cell,
/// in column order. Columns with no numeric cell are absent, not empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSummary {
    pub stats: Vec<NumericColumnStat>,
}

impl NumericSummary {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&NumericColumnStat> {
        self.stats.iter().find(|s| s.column == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(|s| s.column.as_str())
    }
}

/// Coerce every cell of every column in `view` and describe the columns
/// where at least one cell is numeric.
pub fn summarize(view: &FilteredView<'_>) -> NumericSummary {
    let stats = view
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(idx, column)| {
            let values: Vec<f64> = view
                .records()
                .filter_map(|r| r.get(idx))
                .filter_map(|cell| coerce(cell).ok())
                .collect();
            NumericColumnStat::from_values(column, values)
        })
        .collect();
    NumericSummary { stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterState, filter, init_filter_state};
    use crate::data::model::{Record, Table};

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| Record::new(r.iter().map(|c| c.to_string()).collect()))
                .collect(),
        )
    }

    fn summarize_all(t: &Table) -> NumericSummary {
        summarize(&filter(t, &FilterState::new()))
    }

    #[test]
    fn coerce_accepts_numbers_and_rejects_text() {
        assert_eq!(coerce(" 12.5 "), Ok(12.5));
        assert_eq!(coerce("-3"), Ok(-3.0));
        assert_eq!(coerce("1e3"), Ok(1000.0));
        assert!(coerce("abc").is_err());
        assert!(coerce("").is_err());
        assert!(coerce("nan").is_err());
        assert!(coerce("inf").is_err());
        assert!(coerce("1,5").is_err());
    }

    #[test]
    fn partially_numeric_column_is_included() {
        let t = table(&["n", "s"], &[&["10", "abc"], &["20", "def"], &["abc", "ghi"]]);
        let summary = summarize_all(&t);
        assert_eq!(summary.len(), 1);
        let n = summary.get("n").unwrap();
        assert_eq!(n.count, 2);
        assert_eq!(n.min, 10.0);
        assert_eq!(n.max, 20.0);
        assert_eq!(n.mean, 15.0);
        assert!(summary.get("s").is_none());
    }

    #[test]
    fn fully_textual_table_gives_empty_summary() {
        let t = table(&["s"], &[&["abc"], &["def"]]);
        assert!(summarize_all(&t).is_empty());
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let stat = NumericColumnStat::from_values("v", vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stat.min, 1.0);
        assert_eq!(stat.q25, 1.75);
        assert_eq!(stat.median, 2.5);
        assert_eq!(stat.q75, 3.25);
        assert_eq!(stat.max, 4.0);
        assert!((stat.std - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let stat = NumericColumnStat::from_values("v", vec![7.0]).unwrap();
        assert_eq!(stat.count, 1);
        assert!(stat.std.is_nan());
        assert_eq!(stat.median, 7.0);
    }

    #[test]
    fn count_never_exceeds_view_rows() {
        let t = table(
            &["Origem", "UF_Origem", "UF_Destino", "Destino", "Peso"],
            &[
                &["A", "SP", "RJ", "X", "1"],
                &["A", "SP", "RJ", "Y", "x"],
                &["B", "SP", "RJ", "X", "3"],
            ],
        );
        let mut filters = init_filter_state();
        filters.insert(
            "Origem".into(),
            crate::data::filter::FilterSelection::from_picked(["A"]),
        );
        let view = filter(&t, &filters);
        let summary = summarize(&view);
        let peso = summary.get("Peso").unwrap();
        assert_eq!(peso.count, 1);
        assert!(summary.stats.iter().all(|s| s.count <= view.len()));
    }
}
