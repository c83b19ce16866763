use std::collections::HashSet;

use super::model::{CellValue, ColumnKind, Dataset};

// ---------------------------------------------------------------------------
// Cleaning options chosen in the UI
// ---------------------------------------------------------------------------

/// Per-file cleaning switches. Their effect never depends on the order in
/// which the user toggled them; see [`run_pipeline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub fill_missing: bool,
}

/// Outcome of a mean-fill pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub cells_filled: usize,
    /// `(column, mean)` for every column that received values.
    pub filled_columns: Vec<(String, f64)>,
}

/// The working dataset together with what the cleaning steps did to it.
#[derive(Debug, Clone, Default)]
pub struct CleanedDataset {
    pub dataset: Dataset,
    pub duplicates_removed: Option<usize>,
    pub fill: Option<FillReport>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Derive the working dataset from the pristine source.
///
/// Steps run in a fixed order: duplicate removal, then mean-fill (computed
/// on the deduplicated rows), then column projection.
pub fn run_pipeline(
    source: &Dataset,
    options: CleaningOptions,
    selection: &[String],
) -> CleanedDataset {
    let mut working = source.clone();

    let duplicates_removed = options
        .remove_duplicates
        .then(|| drop_duplicates(&mut working));

    let fill = options
        .fill_missing
        .then(|| fill_missing_with_mean(&mut working));

    log::debug!(
        "pipeline: {options:?}, removed {duplicates_removed:?} duplicates, {} columns selected",
        selection.len()
    );

    CleanedDataset {
        dataset: select_columns(&working, selection),
        duplicates_removed,
        fill,
    }
}

// ---------------------------------------------------------------------------
// Individual steps
// ---------------------------------------------------------------------------

/// Remove every row equal to an earlier row across all columns, keeping the
/// first occurrence. Missing cells compare equal to each other.
/// Returns the number of rows removed.
pub fn drop_duplicates(dataset: &mut Dataset) -> usize {
    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(dataset.row_count());
        (0..dataset.row_count())
            .map(|i| seen.insert(dataset.row(i)))
            .collect()
    };

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        dataset.retain_rows(&keep);
    }
    removed
}

/// Replace missing cells of every numeric column with the mean of that
/// column's present values. Present values are never modified and
/// non-numeric columns are skipped. Integer columns that receive a fill are
/// widened to floats; columns without any present value stay as they are.
pub fn fill_missing_with_mean(dataset: &mut Dataset) -> FillReport {
    let mut report = FillReport::default();

    for col in dataset.columns_mut() {
        let missing = col.missing_count();
        if missing == 0 {
            continue;
        }
        let Some(mean) = col.mean() else {
            continue;
        };

        if col.kind == ColumnKind::Integer {
            col.kind = ColumnKind::Float;
            for v in &mut col.values {
                if let CellValue::Integer(i) = v {
                    *v = CellValue::Float(*i as f64);
                }
            }
        }
        for v in &mut col.values {
            if v.is_null() {
                *v = CellValue::Float(mean);
            }
        }

        report.cells_filled += missing;
        report.filled_columns.push((col.name.clone(), mean));
    }

    report
}

/// Keep the requested columns that exist, in requested order. Unknown and
/// repeated names are ignored.
pub fn select_columns(dataset: &Dataset, requested: &[String]) -> Dataset {
    let mut taken: HashSet<&str> = HashSet::new();
    let columns = requested
        .iter()
        .filter(|name| taken.insert(name.as_str()))
        .filter_map(|name| dataset.column(name).cloned())
        .collect();
    Dataset::with_columns(columns)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::data::loader::load_bytes;
    use crate::data::model::Column;

    fn csv(text: &str) -> Dataset {
        load_bytes("t.csv", text.as_bytes()).unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dedup_without_duplicates_is_noop() {
        let mut ds = csv("a,b\n1,x\n2,y\n1,y\n");
        let before = ds.clone();
        assert_eq!(drop_duplicates(&mut ds), 0);
        assert_eq!(ds, before);
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let mut ds = csv("a,b\n1,x\n2,y\n1,x\n3,z\n2,y\n");
        assert_eq!(drop_duplicates(&mut ds), 2);
        assert_eq!(
            ds.column("a").unwrap().values,
            vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)]
        );
    }

    #[test]
    fn dedup_treats_missing_as_equal() {
        let mut ds = csv("a,b\n1,\n1,\n1,NA\n");
        assert_eq!(drop_duplicates(&mut ds), 2);
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn dedup_matches_rows_with_nan_spellings() {
        let mut ds = csv("a,b\n1,NAN\n1,NAN\n");
        assert_eq!(drop_duplicates(&mut ds), 1);
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn fill_ignores_nan_spellings() {
        let mut ds = csv("a,b\n1,1\nNAN,2\n,3\n3,4\n");
        let report = fill_missing_with_mean(&mut ds);

        assert_eq!(report.cells_filled, 2);
        assert_eq!(report.filled_columns, vec![("a".to_string(), 2.0)]);
        assert_eq!(
            ds.column("a").unwrap().values,
            vec![
                CellValue::Float(1.0),
                CellValue::Float(2.0),
                CellValue::Float(2.0),
                CellValue::Float(3.0)
            ]
        );
    }

    #[test]
    fn fill_uses_mean_of_present_values() {
        let mut ds = csv("a,b,c\n1,2,\n1,2,3\n4,5,6\n");
        let report = fill_missing_with_mean(&mut ds);

        assert_eq!(report.cells_filled, 1);
        assert_eq!(report.filled_columns, vec![("c".to_string(), 4.5)]);
        let c = ds.column("c").unwrap();
        assert_eq!(c.kind, ColumnKind::Float);
        assert_eq!(
            c.values,
            vec![CellValue::Float(4.5), CellValue::Float(3.0), CellValue::Float(6.0)]
        );
        // Columns without gaps keep their dtype.
        assert_eq!(ds.column("a").unwrap().kind, ColumnKind::Integer);
    }

    #[test]
    fn fill_leaves_present_and_non_numeric_values_alone() {
        let mut ds = csv("n,label,flag\n1.5,,true\n,b,\n2.5,c,false\n");
        let before = ds.clone();
        fill_missing_with_mean(&mut ds);

        assert_eq!(ds.column("label"), before.column("label"));
        assert_eq!(ds.column("flag"), before.column("flag"));
        let n = ds.column("n").unwrap();
        assert_eq!(n.values[0], CellValue::Float(1.5));
        assert_eq!(n.values[1], CellValue::Float(2.0));
        assert_eq!(n.values[2], CellValue::Float(2.5));
    }

    #[test]
    fn fill_skips_columns_without_present_values() {
        let mut ds = Dataset::from_columns(vec![Column::from_cells(
            "empty",
            vec![CellValue::Null, CellValue::Null],
        )]);
        let report = fill_missing_with_mean(&mut ds);
        assert_eq!(report, FillReport::default());
        assert_eq!(ds.column("empty").unwrap().missing_count(), 2);
    }

    #[test]
    fn fill_after_dedup_uses_deduplicated_rows() {
        let source = csv("k,v\n1,10\n1,10\n2,40\n3,\n");
        let options = CleaningOptions {
            remove_duplicates: true,
            fill_missing: true,
        };
        let cleaned = run_pipeline(&source, options, &names(&["k", "v"]));

        assert_eq!(cleaned.duplicates_removed, Some(1));
        // mean of 10 and 40, not of 10, 10 and 40
        assert_eq!(
            cleaned.dataset.column("v").unwrap().values[2],
            CellValue::Float(25.0)
        );
    }

    #[test]
    fn pipeline_leaves_source_untouched() {
        let source = csv("a\n1\n1\n\n");
        let options = CleaningOptions {
            remove_duplicates: true,
            fill_missing: true,
        };
        let before = source.clone();
        let _ = run_pipeline(&source, options, &names(&["a"]));
        assert_eq!(source, before);
    }

    #[test]
    fn disabled_steps_report_nothing() {
        let source = csv("a\n1\n1\n");
        let cleaned = run_pipeline(&source, CleaningOptions::default(), &names(&["a"]));
        assert_eq!(cleaned.duplicates_removed, None);
        assert_eq!(cleaned.fill, None);
        assert_eq!(cleaned.dataset.row_count(), 2);
    }

    #[rstest]
    #[case(&["c", "a"], &["c", "a"])]
    #[case(&["a", "missing", "b"], &["a", "b"])]
    #[case(&["b", "b", "a"], &["b", "a"])]
    #[case(&[], &[])]
    fn projection_is_subset_in_requested_order(
        #[case] requested: &[&str],
        #[case] expected: &[&str],
    ) {
        let ds = csv("a,b,c\n1,2,3\n");
        let projected = select_columns(&ds, &names(requested));
        assert_eq!(projected.column_names(), names(expected));
    }
}
