use std::path::Path;

use crate::config::SweeperConfig;
use crate::data::chart::{bar_comparison, BarComparison};
use crate::data::clean::{run_pipeline, CleanedDataset, CleaningOptions};
use crate::data::export::{export, ExportFormat, ExportedFile};
use crate::data::loader::{load_bytes, load_file};
use crate::data::model::Dataset;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Notices shown to the user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// One loaded file
// ---------------------------------------------------------------------------

/// A loaded file with its cleaning choices and cached results.
///
/// `source` is never modified; the working dataset is rebuilt from it by
/// [`FileSession::refresh`] whenever an option changed.
pub struct FileSession {
    /// Unique within the app; file names may repeat.
    pub id: u64,
    pub name: String,
    pub size_bytes: usize,
    pub source: Dataset,

    pub options: CleaningOptions,
    /// Kept in source column order.
    pub selected_columns: Vec<String>,
    pub show_chart: bool,
    pub target_format: ExportFormat,

    cleaned: CleanedDataset,
    chart: Option<Result<BarComparison>>,
    /// Result of the last "Convert" click, cleared on any change.
    pub prepared: Option<ExportedFile>,
    pub last_error: Option<String>,
    dirty: bool,
}

impl FileSession {
    pub fn new(
        id: u64,
        name: &str,
        size_bytes: usize,
        source: Dataset,
        config: &SweeperConfig,
    ) -> Self {
        let selected_columns = source.column_names();
        let mut session = Self {
            id,
            name: name.to_string(),
            size_bytes,
            source,
            options: CleaningOptions::default(),
            selected_columns,
            show_chart: false,
            target_format: config.default_format,
            cleaned: CleanedDataset::default(),
            chart: None,
            prepared: None,
            last_error: None,
            dirty: true,
        };
        session.refresh();
        session
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// The dataset after cleaning and projection.
    pub fn working(&self) -> &Dataset {
        &self.cleaned.dataset
    }

    pub fn cleaned(&self) -> &CleanedDataset {
        &self.cleaned
    }

    /// `None` while the chart is hidden.
    pub fn chart(&self) -> Option<&Result<BarComparison>> {
        self.chart.as_ref()
    }

    pub fn set_remove_duplicates(&mut self, on: bool) {
        if self.options.remove_duplicates != on {
            self.options.remove_duplicates = on;
            self.dirty = true;
        }
    }

    /// Latch mean-fill on; it stays active until [`Self::revert_fill`].
    pub fn fill_missing(&mut self) {
        if !self.options.fill_missing {
            self.options.fill_missing = true;
            self.dirty = true;
        }
    }

    pub fn revert_fill(&mut self) {
        if self.options.fill_missing {
            self.options.fill_missing = false;
            self.dirty = true;
        }
    }

    pub fn is_column_selected(&self, name: &str) -> bool {
        self.selected_columns.iter().any(|c| c == name)
    }

    pub fn set_column_selected(&mut self, name: &str, selected: bool) {
        if self.is_column_selected(name) == selected {
            return;
        }
        self.selected_columns = self
            .source
            .column_names()
            .into_iter()
            .filter(|c| if c == name { selected } else { self.is_column_selected(c) })
            .collect();
        self.dirty = true;
    }

    pub fn select_all_columns(&mut self) {
        self.selected_columns = self.source.column_names();
        self.dirty = true;
    }

    pub fn select_no_columns(&mut self) {
        self.selected_columns.clear();
        self.dirty = true;
    }

    pub fn set_show_chart(&mut self, on: bool) {
        if self.show_chart != on {
            self.show_chart = on;
            self.dirty = true;
        }
    }

    pub fn set_target_format(&mut self, format: ExportFormat) {
        if self.target_format != format {
            self.target_format = format;
            self.prepared = None;
        }
    }

    /// Rebuild the working dataset and chart if anything changed.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.cleaned = run_pipeline(&self.source, self.options, &self.selected_columns);
        self.chart = self
            .show_chart
            .then(|| bar_comparison(&self.cleaned.dataset));
        self.prepared = None;
        self.dirty = false;
    }

    /// Serialize the working dataset into the chosen format.
    pub fn convert(&mut self) {
        self.refresh();
        match export(&self.cleaned.dataset, self.target_format, &self.name) {
            Ok(file) => {
                self.prepared = Some(file);
                self.last_error = None;
            }
            Err(e) => {
                log::error!("Failed to convert {}: {e}", self.name);
                self.prepared = None;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: SweeperConfig,
    /// Loaded files in upload order.
    pub files: Vec<FileSession>,
    /// Messages about files that could not be loaded.
    pub notices: Vec<Notice>,
    next_id: u64,
}

impl AppState {
    pub fn new(config: SweeperConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            notices: Vec::new(),
            next_id: 0,
        }
    }

    /// Parse an uploaded buffer into a new session. Unsupported or broken
    /// files are reported and skipped. Returns whether a session was added.
    pub fn add_upload(&mut self, name: &str, bytes: &[u8]) -> bool {
        let loaded = load_bytes(name, bytes);
        self.push_loaded(name, bytes.len(), loaded)
    }

    /// Load a file picked from disk, with the same reporting as
    /// [`Self::add_upload`].
    pub fn add_path(&mut self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = std::fs::metadata(path).map(|m| m.len() as usize).unwrap_or(0);
        let loaded = load_file(path);
        self.push_loaded(&name, size, loaded)
    }

    fn push_loaded(&mut self, name: &str, size_bytes: usize, loaded: Result<Dataset>) -> bool {
        match loaded {
            Ok(dataset) => {
                log::info!(
                    "Loaded {name}: {} rows, columns {:?}",
                    dataset.row_count(),
                    dataset.column_names()
                );
                let session =
                    FileSession::new(self.next_id, name, size_bytes, dataset, &self.config);
                self.next_id += 1;
                self.files.push(session);
                true
            }
            Err(e) => {
                log::warn!("Skipping {name}: {e}");
                self.notices.push(Notice::error(format!("{name}: {e}")));
                false
            }
        }
    }

    pub fn close_file(&mut self, id: u64) {
        self.files.retain(|f| f.id != id);
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    pub fn refresh(&mut self) {
        for file in &mut self.files {
            file.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::error::SweepError;

    const SAMPLE: &[u8] = b"a,b,c\n1,2,\n1,2,3\n4,5,6\n1,2,\n";

    fn state_with_sample() -> AppState {
        let mut state = AppState::new(SweeperConfig::default());
        assert!(state.add_upload("sample.csv", SAMPLE));
        state
    }

    #[test]
    fn unsupported_file_is_reported_and_skipped() {
        let mut state = AppState::new(SweeperConfig::default());
        assert!(!state.add_upload("notes.txt", b"hello"));
        assert!(state.files.is_empty());
        assert_eq!(
            state.notices,
            vec![Notice::error("notes.txt: Unsupported file type: .txt")]
        );

        // Processing continues with the next file.
        assert!(state.add_upload("ok.csv", b"a\n1\n"));
        assert_eq!(state.files.len(), 1);
    }

    #[test]
    fn new_session_selects_every_column() {
        let state = state_with_sample();
        let file = &state.files[0];
        assert_eq!(file.selected_columns, vec!["a", "b", "c"]);
        assert_eq!(file.working().row_count(), 4);
        assert_eq!(file.size_bytes, SAMPLE.len());
        assert!(file.chart().is_none());
    }

    #[test]
    fn dedup_then_fill_regardless_of_click_order() {
        let mut a = state_with_sample();
        a.files[0].fill_missing();
        a.files[0].set_remove_duplicates(true);
        a.refresh();

        let mut b = state_with_sample();
        b.files[0].set_remove_duplicates(true);
        b.files[0].fill_missing();
        b.refresh();

        assert_eq!(a.files[0].working(), b.files[0].working());
        assert_eq!(a.files[0].cleaned().duplicates_removed, Some(1));
        assert_eq!(
            a.files[0].working().column("c").unwrap().values[0],
            CellValue::Float(4.5)
        );
    }

    #[test]
    fn fill_is_latched_until_reverted() {
        let mut state = state_with_sample();
        let file = &mut state.files[0];
        file.fill_missing();
        file.refresh();
        file.set_show_chart(true);
        file.refresh();
        assert_eq!(file.working().missing_count(), 0);

        file.revert_fill();
        file.refresh();
        assert_eq!(file.working().missing_count(), 2);
    }

    #[test]
    fn column_selection_keeps_source_order() {
        let mut state = state_with_sample();
        let file = &mut state.files[0];
        file.select_no_columns();
        file.set_column_selected("c", true);
        file.set_column_selected("a", true);
        file.refresh();
        assert_eq!(file.working().column_names(), vec!["a", "c"]);

        file.set_column_selected("a", false);
        file.refresh();
        assert_eq!(file.working().column_names(), vec!["c"]);
    }

    #[test]
    fn chart_warns_when_projection_leaves_one_numeric_column() {
        let mut state = state_with_sample();
        let file = &mut state.files[0];
        file.set_show_chart(true);
        file.refresh();
        assert!(matches!(file.chart(), Some(Ok(_))));

        file.select_no_columns();
        file.set_column_selected("b", true);
        file.refresh();
        assert!(matches!(
            file.chart(),
            Some(Err(SweepError::NotEnoughNumericColumns { found: 1 }))
        ));
    }

    #[test]
    fn convert_prepares_export_and_changes_invalidate_it() {
        let mut state = state_with_sample();
        let file = &mut state.files[0];
        file.set_target_format(ExportFormat::Xlsx);
        file.convert();
        let prepared = file.prepared.as_ref().unwrap();
        assert_eq!(prepared.file_name, "sample.xlsx");

        file.set_remove_duplicates(true);
        file.refresh();
        assert!(file.prepared.is_none());
    }

    #[test]
    fn add_path_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut state = AppState::new(SweeperConfig::default());
        assert!(state.add_path(&path));
        assert!(!state.add_path(&dir.path().join("gone.csv")));
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.notices.len(), 1);
    }

    #[test]
    fn close_file_removes_only_that_session() {
        let mut state = state_with_sample();
        state.add_upload("sample.csv", SAMPLE);
        let first = state.files[0].id;
        state.close_file(first);
        assert_eq!(state.files.len(), 1);
        assert_ne!(state.files[0].id, first);
    }
}
