use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{FilterOption, FilterableColumn};
use crate::state::{AppState, LoadStatus};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

enum FilterAction {
    SelectAll(FilterableColumn),
    Toggle(FilterableColumn, String),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No data loaded.");
        return;
    }

    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height((ui.available_height() - 80.0).max(120.0))
        .show(ui, |ui: &mut Ui| {
            for col in FilterableColumn::ALL {
                let Some(options) = state.options.get(&col) else {
                    continue;
                };
                let selection = state
                    .filters
                    .get(col.header())
                    .cloned()
                    .unwrap_or_default();

                let header_text = if selection.is_all() {
                    format!("{}  (All)", col.label())
                } else {
                    let n_total = options.len() - 1;
                    let n_selected = options
                        .iter()
                        .filter(|o| matches!(o, FilterOption::Value(v) if selection.is_picked(v)))
                        .count();
                    format!("{}  ({n_selected}/{n_total})", col.label())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.header())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for option in options {
                            match option {
                                FilterOption::All => {
                                    let mut checked = selection.is_all();
                                    if ui.checkbox(&mut checked, "All").clicked() {
                                        actions.push(FilterAction::SelectAll(col));
                                    }
                                }
                                FilterOption::Value(v) => {
                                    let mut checked = selection.is_picked(v);
                                    if ui.checkbox(&mut checked, v.as_str()).clicked() {
                                        actions.push(FilterAction::Toggle(col, v.clone()));
                                    }
                                }
                            }
                        }
                    });
            }
        });

    for action in actions {
        match action {
            FilterAction::SelectAll(col) => state.select_all(col),
            FilterAction::Toggle(col, v) => state.toggle_filter_value(col, &v),
        }
    }

    ui.separator();
    ui.label(format!("Filtered records: {}", state.filtered_rows()));
    ui.label(format!("Total records: {}", state.total_rows()));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// What the user asked for from the top bar.
pub enum TopBarAction {
    Open(PathBuf),
    Reload,
    SignOut,
}

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState, user: &str) -> Option<TopBarAction> {
    let mut action = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                action = open_file_dialog().map(TopBarAction::Open);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                action = Some(TopBarAction::Reload);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Subsidiary Markets Data Analysis");

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.button("Sign out").clicked() {
                action = Some(TopBarAction::SignOut);
            }
            ui.label(format!("👤 {user}"));
            ui.separator();
            if let Some(ds) = &state.table {
                ui.label(format!(
                    "{} records loaded, {} visible",
                    ds.row_count(),
                    state.filtered_rows()
                ));
            }
        });
    });

    action
}

/// One-line banner describing the last load.
pub fn load_banner(ui: &mut Ui, status: &LoadStatus) {
    match status {
        LoadStatus::NotLoaded => {}
        LoadStatus::Loaded(decoding) if decoding.is_lossy() => {
            ui.label(
                RichText::new(format!(
                    "File loaded with substitutions ({}): some characters may be incorrect.",
                    decoding.encoding()
                ))
                .color(Color32::from_rgb(230, 160, 40)),
            );
        }
        LoadStatus::Loaded(decoding) => {
            ui.label(
                RichText::new(format!("File loaded using encoding: {decoding}"))
                    .color(Color32::from_rgb(80, 180, 90)),
            );
        }
        LoadStatus::Failed(msg) => {
            ui.label(RichText::new(format!("Error loading file: {msg}")).color(Color32::RED));
        }
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open market table")
        .add_filter("Delimited text", &["csv", "txt"])
        .add_filter("All files", &["*"])
        .pick_file()
}
