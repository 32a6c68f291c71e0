use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Filterable columns
// ---------------------------------------------------------------------------

/// The four columns exposed for multi-value selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterableColumn {
    Origin,
    OriginState,
    DestinationState,
    Destination,
}

impl FilterableColumn {
    pub const ALL: [FilterableColumn; 4] = [
        FilterableColumn::Origin,
        FilterableColumn::OriginState,
        FilterableColumn::DestinationState,
        FilterableColumn::Destination,
    ];

    /// Exact header label in the source file.
    pub fn header(self) -> &'static str {
        match self {
            FilterableColumn::Origin => "Origem",
            FilterableColumn::OriginState => "UF_Origem",
            FilterableColumn::DestinationState => "UF_Destino",
            FilterableColumn::Destination => "Destino",
        }
    }

    /// Label shown above the selector.
    pub fn label(self) -> &'static str {
        match self {
            FilterableColumn::Origin => "Origin",
            FilterableColumn::OriginState => "Origin state",
            FilterableColumn::DestinationState => "Destination state",
            FilterableColumn::Destination => "Destination",
        }
    }

    pub fn headers() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::header)
    }
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// What the user picked for one column.
///
/// `Values` with an empty set is treated exactly like `All`: deselecting
/// everything never hides every row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterSelection {
    #[default]
    All,
    Values(BTreeSet<String>),
}

impl FilterSelection {
    /// Build a selection from whatever the user has ticked.
    pub fn from_picked<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            FilterSelection::All
        } else {
            FilterSelection::Values(set)
        }
    }

    /// `true` when this selection imposes no constraint.
    pub fn is_all(&self) -> bool {
        match self {
            FilterSelection::All => true,
            FilterSelection::Values(v) => v.is_empty(),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            FilterSelection::All => true,
            FilterSelection::Values(v) => v.is_empty() || v.contains(value),
        }
    }

    /// Whether `value` is explicitly ticked (never true under `All`).
    pub fn is_picked(&self, value: &str) -> bool {
        matches!(self, FilterSelection::Values(v) if v.contains(value))
    }

    /// Tick or untick a single value. Unticking the last value returns to `All`.
    pub fn toggle(&mut self, value: &str) {
        match self {
            FilterSelection::All => {
                *self = FilterSelection::from_picked([value]);
            }
            FilterSelection::Values(v) => {
                if !v.remove(value) {
                    v.insert(value.to_string());
                }
                if v.is_empty() {
                    *self = FilterSelection::All;
                }
            }
        }
    }
}

/// One entry in a column's option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOption {
    All,
    Value(String),
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOption::All => f.write_str("All"),
            FilterOption::Value(v) => f.write_str(v),
        }
    }
}

/// Per-column selection state, keyed by header name.
/// Columns without an entry are unconstrained.
pub type FilterState = BTreeMap<String, FilterSelection>;

/// Initialise a [`FilterState`] with every filterable column set to `All`.
pub fn init_filter_state() -> FilterState {
    FilterableColumn::headers()
        .map(|h| (h.to_string(), FilterSelection::All))
        .collect()
}

// ---------------------------------------------------------------------------
// Distinct values & options
// ---------------------------------------------------------------------------

/// Unique values of `column` in first-seen order.
///
/// `column` must be a header of `table`.
pub fn distinct_values(table: &Table, column: &str) -> Vec<String> {
    let Some(idx) = table.column_index(column) else {
        debug_assert!(false, "unknown column {column:?}");
        return Vec::new();
    };
    let mut seen = HashSet::new();
    table
        .rows()
        .iter()
        .filter_map(|r| r.get(idx))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// `All` followed by the distinct values of `column`.
pub fn filter_options(table: &Table, column: &str) -> Vec<FilterOption> {
    std::iter::once(FilterOption::All)
        .chain(distinct_values(table, column).into_iter().map(FilterOption::Value))
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The rows of a table that pass every active selection, in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a Table,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn columns(&self) -> &'a [String] {
        self.table.columns()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let rows = self.table.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }

    /// Copy the visible rows into a new table with a fresh dense index.
    #[cfg(test)]
    pub fn to_table(&self) -> Table {
        Table::new(
            self.table.columns().to_vec(),
            self.records().cloned().collect(),
        )
    }
}

/// Return the rows of `table` that satisfy every selection in `filters`.
///
/// A row passes a column when the selection is `All` (or empty), or when
/// the row's value is one of the selected values. Every key of `filters`
/// must be a header of `table`.
pub fn filter<'a>(table: &'a Table, filters: &FilterState) -> FilteredView<'a> {
    let active: Vec<(Option<usize>, &FilterSelection)> = filters
        .iter()
        .filter(|(_, sel)| !sel.is_all())
        .map(|(col, sel)| {
            let idx = table.column_index(col);
            debug_assert!(idx.is_some(), "unknown column {col:?}");
            (idx, sel)
        })
        .collect();

    let indices = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active.iter().all(|(idx, sel)| {
                idx.and_then(|i| row.get(i))
                    .is_some_and(|value| sel.matches(value))
            })
        })
        .map(|(i, _)| i)
        .collect();

    FilteredView { table, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| Record::new(r.iter().map(|c| c.to_string()).collect()))
                .collect(),
        )
    }

    fn markets() -> Table {
        table(
            &["Origem", "UF_Origem", "UF_Destino", "Destino", "Peso"],
            &[
                &["A", "SP", "RJ", "X", "10"],
                &["A", "SP", "MG", "Y", "20"],
                &["B", "PR", "RJ", "X", "30"],
                &["B", "PR", "MG", "Y", "40"],
            ],
        )
    }

    fn state(pairs: &[(FilterableColumn, FilterSelection)]) -> FilterState {
        let mut s = init_filter_state();
        for (col, sel) in pairs {
            s.insert(col.header().to_string(), sel.clone());
        }
        s
    }

    #[test]
    fn distinct_values_keep_first_seen_order_without_duplicates() {
        let t = table(&["c"], &[&["z"], &["a"], &["z"], &["m"], &["a"]]);
        assert_eq!(distinct_values(&t, "c"), vec!["z", "a", "m"]);
    }

    #[test]
    fn options_start_with_all() {
        let opts = filter_options(&markets(), "Origem");
        assert_eq!(
            opts,
            vec![
                FilterOption::All,
                FilterOption::Value("A".into()),
                FilterOption::Value("B".into()),
            ]
        );
    }

    #[test]
    fn all_selections_return_whole_table() {
        let t = markets();
        let view = filter(&t, &init_filter_state());
        assert_eq!(view.indices(), &[0, 1, 2, 3]);
        assert_eq!(view.to_table(), t);
    }

    #[test]
    fn empty_explicit_selection_behaves_like_all() {
        let t = markets();
        let empty = FilterSelection::Values(BTreeSet::new());
        let view = filter(&t, &state(&[(FilterableColumn::Destination, empty)]));
        assert_eq!(view.len(), 4);
        assert_eq!(FilterSelection::from_picked(Vec::<String>::new()), FilterSelection::All);
    }

    #[test]
    fn origin_a_with_any_destination_yields_two_rows() {
        let t = markets();
        let view = filter(
            &t,
            &state(&[(FilterableColumn::Origin, FilterSelection::from_picked(["A"]))]),
        );
        assert_eq!(view.indices(), &[0, 1]);
        assert!(view.records().all(|r| r.get(0) == Some("A")));
    }

    #[test]
    fn selections_combine_with_and() {
        let t = markets();
        let view = filter(
            &t,
            &state(&[
                (FilterableColumn::Origin, FilterSelection::from_picked(["A", "B"])),
                (FilterableColumn::DestinationState, FilterSelection::from_picked(["MG"])),
                (FilterableColumn::Destination, FilterSelection::from_picked(["Y"])),
            ]),
        );
        assert_eq!(view.indices(), &[1, 3]);
    }

    #[test]
    fn refiltering_is_idempotent() {
        let t = markets();
        let s = state(&[
            (FilterableColumn::OriginState, FilterSelection::from_picked(["PR"])),
            (FilterableColumn::Destination, FilterSelection::from_picked(["X"])),
        ]);
        let once = filter(&t, &s).to_table();
        let twice = filter(&once, &s).to_table();
        assert_eq!(once, twice);
        assert_eq!(once.row_count(), 1);
    }

    #[test]
    fn toggle_cycles_back_to_all() {
        let mut sel = FilterSelection::All;
        sel.toggle("A");
        assert!(sel.is_picked("A"));
        assert!(!sel.matches("B"));
        sel.toggle("B");
        sel.toggle("A");
        assert_eq!(sel, FilterSelection::from_picked(["B"]));
        sel.toggle("B");
        assert_eq!(sel, FilterSelection::All);
    }
}
