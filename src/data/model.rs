use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single row. Cells are positional and line up with [`Table::columns`];
/// every value is kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub cells: Vec<String>,
}

impl Record {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// `true` when every cell is blank (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Ordered rows plus a fixed, ordered list of unique column names.
///
/// Invariants upheld by [`Table::new`]:
/// * every record has exactly `columns.len()` cells,
/// * no record is blank,
/// * the row index is dense and zero-based (it is simply the `Vec` position).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Build a table, normalising rows to the header width and dropping
    /// blank rows.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.cells.resize(width, String::new());
                r
            })
            .filter(|r| !r.is_blank())
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of `name` in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (`row`, `column`).
    #[cfg(test)]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Names from `required` that are absent from the header, in input order.
    pub fn missing_columns<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        required
            .into_iter()
            .filter(|name| self.column_index(name).is_none())
            .map(str::to_string)
            .collect()
    }
}

/// Make header names unique: a repeated `name` becomes `name.1`, `name.2`, …
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for h in headers {
        let mut candidate = h.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{h}.{n}");
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(cells: &[&str]) -> Record {
        Record::new(cells.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn new_drops_blank_rows_and_pads_short_ones() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![rec(&["1", "2"]), rec(&["", "  "]), rec(&["3"])],
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1].cells, vec!["3".to_string(), String::new()]);
        assert_eq!(table.cell(1, "a"), Some("3"));
    }

    #[test]
    fn missing_columns_reports_absent_names() {
        let table = Table::new(vec!["Origem".into()], Vec::new());
        assert_eq!(
            table.missing_columns(["Origem", "Destino"]),
            vec!["Destino".to_string()]
        );
    }

    #[test]
    fn duplicate_headers_get_numeric_suffixes() {
        let cols = dedupe_headers(vec!["a".into(), "a".into(), "b".into(), "a".into()]);
        assert_eq!(cols, vec!["a", "a.1", "b", "a.2"]);
    }
}
