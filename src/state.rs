use std::collections::BTreeMap;
use std::path::Path;

use crate::data::filter::{
    FilterOption, FilterState, FilterableColumn, filter, filter_options, init_filter_state,
};
use crate::data::loader::{self, Decoding, LoadError, LoadedTable};
use crate::data::model::Table;
use crate::data::stats::{NumericSummary, summarize};

// ---------------------------------------------------------------------------
// Load status
// ---------------------------------------------------------------------------

/// Outcome of the last load, shown above the data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loaded(Decoding),
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The data-side UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded table (None until a load succeeds).
    pub table: Option<Table>,

    /// What happened on the last load attempt.
    pub load_status: LoadStatus,

    /// Selectable options per filterable column, `All` first.
    pub options: BTreeMap<FilterableColumn, Vec<FilterOption>>,

    /// Per-column filter selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Statistics of the visible rows (cached).
    pub summary: NumericSummary,
}

impl AppState {
    /// Load `path` and replace the current table. On failure the state is
    /// cleared and the error kept for display.
    pub fn load_from(&mut self, path: &Path) {
        match loader::load(path).and_then(|loaded| {
            loader::require_columns(&loaded.table, FilterableColumn::headers())?;
            Ok(loaded)
        }) {
            Ok(loaded) => {
                log::info!(
                    "Loaded {} rows x {} columns from {} ({})",
                    loaded.table.row_count(),
                    loaded.table.column_count(),
                    path.display(),
                    loaded.decoding
                );
                if loaded.decoding.is_lossy() {
                    log::warn!("{} decoded with substitutions", path.display());
                }
                self.set_table(loaded);
            }
            Err(e) => self.set_load_error(&e),
        }
    }

    /// Ingest a newly loaded table, reset filters and recompute.
    pub fn set_table(&mut self, loaded: LoadedTable) {
        let LoadedTable { table, decoding } = loaded;
        self.options = FilterableColumn::ALL
            .into_iter()
            .map(|col| (col, filter_options(&table, col.header())))
            .collect();
        self.filters = init_filter_state();
        self.table = Some(table);
        self.load_status = LoadStatus::Loaded(decoding);
        self.refilter();
    }

    /// Drop any table and remember why.
    pub fn set_load_error(&mut self, err: &LoadError) {
        log::error!("Failed to load table: {err}");
        *self = Self {
            load_status: LoadStatus::Failed(err.to_string()),
            ..Self::default()
        };
    }

    /// Forget everything (used on sign-out).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recompute `visible_indices` and `summary` after a filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            self.visible_indices.clear();
            self.summary = NumericSummary::default();
            return;
        };
        let view = filter(table, &self.filters);
        log::debug!("{} of {} rows pass the filters", view.len(), table.row_count());
        self.summary = summarize(&view);
        self.visible_indices = view.into_indices();
    }

    /// Tick or untick a value in one column's selection.
    pub fn toggle_filter_value(&mut self, column: FilterableColumn, value: &str) {
        self.filters
            .entry(column.header().to_string())
            .or_default()
            .toggle(value);
        self.refilter();
    }

    /// Reset one column to `All`.
    pub fn select_all(&mut self, column: FilterableColumn) {
        self.filters
            .insert(column.header().to_string(), Default::default());
        self.refilter();
    }

    /// Total rows before filtering.
    pub fn total_rows(&self) -> usize {
        self.table.as_ref().map_or(0, Table::row_count)
    }

    /// Rows after filtering.
    pub fn filtered_rows(&self) -> usize {
        self.visible_indices.len()
    }
}
