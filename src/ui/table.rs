use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Preview table
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;

/// Render the first rows of `dataset` as a striped table. Every table needs
/// its own `id_salt` since several files are shown at once.
pub fn preview_table(
    ui: &mut Ui,
    id_salt: impl std::hash::Hash,
    dataset: &Dataset,
    rows: usize,
) {
    if dataset.column_count() == 0 {
        ui.label(RichText::new("No columns selected.").italics());
        return;
    }

    if dataset.is_empty() {
        ui.label(RichText::new("No rows.").italics());
    }

    let head = dataset.head(rows);

    ui.push_id(id_salt, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(TableColumn::auto().at_least(60.0), head.column_count())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for col in head.columns() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(&col.name).on_hover_text(col.kind.label());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, head.row_count(), |mut row| {
                        let idx = row.index();
                        for col in head.columns() {
                            row.col(|ui: &mut Ui| {
                                let value = &col.values[idx];
                                let text = RichText::new(value.to_string());
                                if matches!(value, CellValue::Null) {
                                    ui.label(text.color(Color32::GRAY).italics());
                                } else {
                                    ui.label(text);
                                }
                            });
                        }
                    });
                });
        });
    });

    ui.label(
        RichText::new(format!(
            "Showing {} of {} rows, {} columns, {} missing cells",
            head.row_count(),
            dataset.row_count(),
            dataset.column_count(),
            dataset.missing_count()
        ))
        .small(),
    );
}
