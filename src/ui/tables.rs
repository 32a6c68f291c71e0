use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::data::stats::NumericSummary;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

/// Three headline figures above the data.
pub fn metrics(ui: &mut Ui, table: &Table, user: &str) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total records", &table.row_count().to_string());
        metric(&mut cols[1], "Total columns", &table.column_count().to_string());
        metric(&mut cols[2], "Signed in as", user);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.small(label);
        ui.heading(value);
    });
}

// ---------------------------------------------------------------------------
// Filtered records
// ---------------------------------------------------------------------------

/// Render the rows of `table` listed in `indices`.
pub fn records_table(ui: &mut Ui, table: &Table, indices: &[usize]) {
    if indices.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    ui.push_id("records_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(70.0).clip(true), table.column_count())
            .min_scrolled_height(0.0)
            .max_scroll_height(360.0)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for name in table.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                    let idx = indices[row.index()];
                    let record = &table.rows()[idx];
                    row.col(|ui: &mut Ui| {
                        ui.label(idx.to_string());
                    });
                    for cell in &record.cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.as_str());
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Format one statistic the way the panel shows it.
pub fn format_stat(name: &str, value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if name == "count" {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Describe-style table: one row per statistic, one column per numeric column.
pub fn statistics_table(ui: &mut Ui, summary: &NumericSummary) {
    if summary.is_empty() {
        ui.label("No numeric columns were found for statistical analysis.");
        return;
    }

    let stat_names: Vec<&'static str> = summary.stats[0].describe().iter().map(|(n, _)| *n).collect();

    ui.push_id("statistics_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(50.0))
            .columns(Column::auto().at_least(80.0), summary.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|_ui: &mut Ui| {});
                for column in summary.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column);
                    });
                }
            })
            .body(|mut body| {
                for (i, name) in stat_names.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.strong(*name);
                        });
                        for stat in &summary.stats {
                            let (_, value) = stat.describe()[i];
                            row.col(|ui: &mut Ui| {
                                ui.label(format_stat(name, value));
                            });
                        }
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_are_formatted_for_display() {
        assert_eq!(format_stat("count", 3.0), "3");
        assert_eq!(format_stat("mean", 2.0 / 3.0), "0.67");
        assert_eq!(format_stat("std", f64::NAN), "NaN");
    }
}
