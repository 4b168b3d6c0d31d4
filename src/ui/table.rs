use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::EXPLORER_COLUMNS;
use crate::export;
use crate::state::AppState;

/// Rows rendered in the explorer grid; exports always cover the full
/// filtered set.
const PREVIEW_ROWS: usize = 100;

// ---------------------------------------------------------------------------
// Data explorer tab
// ---------------------------------------------------------------------------

pub fn explorer_tab(ui: &mut Ui, state: &mut AppState) {
    if state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data available to explore.");
        });
        return;
    }

    // ---- Sort + export controls ----
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Sort by");
        egui::ComboBox::from_id_salt("sort_field")
            .selected_text(state.sort.column.clone())
            .show_ui(ui, |ui: &mut Ui| {
                for col in EXPLORER_COLUMNS {
                    if ui
                        .selectable_label(state.sort.column == *col, *col)
                        .clicked()
                    {
                        state.sort.column = col.to_string();
                    }
                }
            });
        if ui
            .selectable_label(state.sort.ascending, "Ascending")
            .clicked()
        {
            state.sort.ascending = !state.sort.ascending;
        }

        ui.separator();
        if ui.button("Download CSV").clicked() {
            save_export(state, ExportFormat::Csv);
        }
        if ui.button("Download JSON").clicked() {
            save_export(state, ExportFormat::Json);
        }
    });

    let table = state.table.clone();
    let sorted = export::sorted_indices(&table, &state.visible_indices, &state.sort);
    let shown = &sorted[..sorted.len().min(PREVIEW_ROWS)];

    ui.label(
        RichText::new(format!(
            "Showing {} of {} records",
            shown.len(),
            sorted.len()
        ))
        .small(),
    );

    // ---- Grid ----
    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(72.0), EXPLORER_COLUMNS.len())
            .header(20.0, |mut header| {
                for col in EXPLORER_COLUMNS {
                    header.col(|ui| {
                        ui.strong(*col);
                    });
                }
            })
            .body(|mut body| {
                for &i in shown {
                    let row_data = &table.rows[i];
                    body.row(18.0, |mut row| {
                        for col in EXPLORER_COLUMNS {
                            row.col(|ui| {
                                ui.label(row_data.cell(col).to_string());
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Export save dialogs
// ---------------------------------------------------------------------------

enum ExportFormat {
    Csv,
    Json,
}

fn save_export(state: &mut AppState, format: ExportFormat) {
    let (name, extension) = match format {
        ExportFormat::Csv => ("sales_data.csv", "csv"),
        ExportFormat::Json => ("sales_data.json", "json"),
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(name)
        .add_filter(extension.to_uppercase(), &[extension])
        .save_file()
    else {
        return;
    };

    let table = state.table.clone();
    let sorted = export::sorted_indices(&table, &state.visible_indices, &state.sort);
    let rendered = match format {
        ExportFormat::Csv => export::to_csv(&table, &sorted),
        ExportFormat::Json => export::to_json(&table, &sorted),
    };

    let result = rendered.and_then(|contents| {
        std::fs::write(&path, contents).map_err(anyhow::Error::from)
    });
    match result {
        Ok(()) => {
            log::info!("Exported {} rows to {}", sorted.len(), path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e}"));
        }
    }
}
