use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::notice_color;
use crate::data::export::{save_export, ExportFormat, ExportedFile};
use crate::error::SweepError;
use crate::state::{AppState, FileSession, NoticeKind};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload files…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Close all").clicked() {
                state.files.clear();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} file(s) loaded", state.files.len()));
    });
}

// ---------------------------------------------------------------------------
// Left side panel
// ---------------------------------------------------------------------------

/// About text, loaded files, load errors.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("About Data Sweeper");
    ui.label(
        "Clean, analyze and convert CSV/Excel files. Upload a file, clean the \
         data, visualize insights and download the transformed dataset.",
    );
    ui.separator();

    if ui.button("📂 Upload files (CSV or Excel)…").clicked() {
        open_file_dialog(state);
    }
    ui.label(RichText::new("…or drop files onto the window.").small());
    ui.separator();

    ui.strong("Files");
    let mut to_close = None;
    for file in &state.files {
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("✖").on_hover_text("Close").clicked() {
                to_close = Some(file.id);
            }
            ui.label(&file.name);
        });
    }
    if let Some(id) = to_close {
        state.close_file(id);
    }

    if !state.notices.is_empty() {
        ui.separator();
        ScrollArea::vertical()
            .id_salt("notices")
            .max_height(160.0)
            .show(ui, |ui: &mut Ui| {
                for notice in &state.notices {
                    ui.label(RichText::new(&notice.text).color(notice_color(notice.kind)));
                }
            });
        if ui.small_button("Clear messages").clicked() {
            state.clear_notices();
        }
    }

    ui.separator();
    ui.label(
        RichText::new("Ready to clean and transform your data!")
            .color(notice_color(NoticeKind::Success)),
    );
}

// ---------------------------------------------------------------------------
// Per-file section (central panel)
// ---------------------------------------------------------------------------

/// Render every widget for one loaded file. Returns `false` when the user
/// asked to close it.
pub fn file_section(ui: &mut Ui, file: &mut FileSession, preview_rows: usize) -> bool {
    let mut keep = true;

    ui.horizontal(|ui: &mut Ui| {
        ui.heading(format!("📄 File: {}", file.name));
        if ui.small_button("✖").on_hover_text("Close file").clicked() {
            keep = false;
        }
    });
    ui.label(format!("📏 File Size: {:.2} KB", file.size_kb()));

    // ---- Preview ----
    ui.add_space(4.0);
    ui.strong("🔍 Data Preview");
    table::preview_table(ui, ("preview", file.id), &file.source, preview_rows);

    // ---- Cleaning ----
    ui.add_space(4.0);
    ui.strong("🛠 Data Cleaning");
    ui.columns(2, |cols: &mut [Ui]| {
        let mut dedup = file.options.remove_duplicates;
        if cols[0]
            .checkbox(&mut dedup, format!("✅ Remove duplicates ({})", file.name))
            .changed()
        {
            file.set_remove_duplicates(dedup);
        }

        if file.options.fill_missing {
            if cols[1]
                .button(format!("↩ Revert missing-value fill ({})", file.name))
                .clicked()
            {
                file.revert_fill();
            }
        } else if cols[1]
            .button(format!("🧹 Fill Missing Values ({})", file.name))
            .clicked()
        {
            file.fill_missing();
        }
    });
    file.refresh();
    cleaning_messages(ui, file);

    // ---- Column selection ----
    ui.add_space(4.0);
    ui.strong("📌 Select Columns");
    column_selector(ui, file);
    file.refresh();
    let working = file.working();
    ui.label(
        RichText::new(format!(
            "Result: {} rows × {} columns",
            working.row_count(),
            working.column_count()
        ))
        .small(),
    );

    // ---- Visualization ----
    ui.add_space(4.0);
    ui.strong("📊 Data Visualization");
    let mut show = file.show_chart;
    if ui
        .checkbox(&mut show, format!("📈 Show Data Visualization ({})", file.name))
        .changed()
    {
        file.set_show_chart(show);
        file.refresh();
    }
    match file.chart() {
        Some(Ok(chart)) => plot::bar_chart(ui, file.id, chart),
        Some(Err(e)) => {
            let response =
                ui.label(RichText::new(e.to_string()).color(notice_color(NoticeKind::Warning)));
            if let SweepError::NotEnoughNumericColumns { found } = e {
                response.on_hover_text(format!("{found} numeric column(s) selected, 2 needed"));
            }
        }
        None => {}
    }

    // ---- Conversion ----
    ui.add_space(4.0);
    ui.strong("🔄 Convert File Format");
    conversion_controls(ui, file);

    keep
}

fn cleaning_messages(ui: &mut Ui, file: &FileSession) {
    let success = notice_color(NoticeKind::Success);
    let cleaned = file.cleaned();
    if let Some(removed) = cleaned.duplicates_removed {
        ui.label(
            RichText::new(format!("Duplicates removed! ({removed} row(s))")).color(success),
        );
    }
    if let Some(fill) = &cleaned.fill {
        let means: Vec<String> = fill
            .filled_columns
            .iter()
            .map(|(col, mean)| format!("{col}: {mean}"))
            .collect();
        ui.label(
            RichText::new(format!(
                "Missing values filled with column means! ({} cell(s))",
                fill.cells_filled
            ))
            .color(success),
        )
        .on_hover_text(if means.is_empty() {
            "Nothing to fill".to_string()
        } else {
            means.join("\n")
        });
    }
}

fn column_selector(ui: &mut Ui, file: &mut FileSession) {
    let columns = file.source.column_names();

    egui::CollapsingHeader::new(format!(
        "Choose columns to keep ({})  ({}/{})",
        file.name,
        file.selected_columns.len(),
        columns.len()
    ))
    .id_salt(("columns", file.id))
    .default_open(false)
    .show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("All").clicked() {
                file.select_all_columns();
            }
            if ui.small_button("None").clicked() {
                file.select_no_columns();
            }
        });
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for col in &columns {
                let mut checked = file.is_column_selected(col);
                if ui.checkbox(&mut checked, col).changed() {
                    file.set_column_selected(col, checked);
                }
            }
        });
    });
}

fn conversion_controls(ui: &mut Ui, file: &mut FileSession) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Convert {} to:", file.name));
        let mut target = file.target_format;
        for format in ExportFormat::ALL {
            ui.radio_value(&mut target, format, format.label());
        }
        file.set_target_format(target);
    });

    if ui.button(format!("🚀 Convert {}", file.name)).clicked() {
        file.convert();
    }

    if let Some(prepared) = &file.prepared {
        if ui
            .button(format!("⬇ Download {}", prepared.file_name))
            .on_hover_text(prepared.mime_type)
            .clicked()
        {
            file.last_error = save_dialog(prepared);
        }
    }

    if let Some(err) = &file.last_error {
        ui.label(RichText::new(err).color(notice_color(NoticeKind::Error)));
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Upload your files (CSV or Excel)")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("All files", &["*"])
        .pick_files();

    for path in files.unwrap_or_default() {
        state.add_path(&path);
    }
}

/// Ask where to save a prepared export. Returns an error message on failure.
fn save_dialog(prepared: &ExportedFile) -> Option<String> {
    let ext = prepared
        .file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_string();

    let path = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(&prepared.file_name)
        .add_filter(&ext, &[ext.as_str()])
        .save_file()?;

    match save_export(prepared, &path) {
        Ok(()) => None,
        Err(e) => {
            log::error!("Failed to save {}: {e}", path.display());
            Some(format!("Error: {e}"))
        }
    }
}
