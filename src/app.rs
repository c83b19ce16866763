use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::SweeperConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataSweeperApp {
    pub state: AppState,
}

impl DataSweeperApp {
    pub fn new(config: SweeperConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    /// Files dropped onto the window count as uploads.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(bytes) = &file.bytes {
                self.state.add_upload(&file.name, bytes);
            } else if let Some(path) = &file.path {
                self.state.add_path(path);
            }
        }
    }
}

impl eframe::App for DataSweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.state.refresh();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: about, files, messages ----
        egui::SidePanel::left("side_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: one section per file ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("💿 Data Sweeper");
            ui.label(
                RichText::new(
                    "Transform your files between CSV and Excel formats with built-in \
                     data cleaning and visualization!",
                )
                .strong(),
            );
            ui.separator();

            if self.state.files.is_empty() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading(
                        "Upload CSV or Excel files to get started  (File → Upload files…)",
                    );
                });
                return;
            }

            let preview_rows = self.state.config.preview_rows;
            let mut to_close = Vec::new();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for file in &mut self.state.files {
                        ui.push_id(file.id, |ui: &mut Ui| {
                            if !panels::file_section(ui, file, preview_rows) {
                                to_close.push(file.id);
                            }
                        });
                        ui.separator();
                    }
                });
            for id in to_close {
                self.state.close_file(id);
            }
        });
    }
}
