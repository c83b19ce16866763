use std::collections::BTreeMap;

use super::model::{CellValue, Dataset};
use crate::error::{Result, SweepError};

pub const CHART_TITLE: &str = "Feature Comparison";

/// One bar: a distinct value of the x column and the mean y of its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub label: String,
    pub mean: f64,
    pub count: usize,
}

/// Bar comparison of the first two numeric columns of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BarComparison {
    pub x_column: String,
    pub y_column: String,
    /// Sorted by ascending x value.
    pub bars: Vec<CategoryBar>,
}

/// Group rows by the first numeric column and average the second one.
///
/// Rows where either value is missing are skipped. Fails with
/// [`SweepError::NotEnoughNumericColumns`] when fewer than two numeric
/// columns exist.
pub fn bar_comparison(dataset: &Dataset) -> Result<BarComparison> {
    let numeric = dataset.numeric_columns();
    let [x, y, ..] = numeric.as_slice() else {
        return Err(SweepError::NotEnoughNumericColumns {
            found: numeric.len(),
        });
    };

    // CellValue orders floats with total_cmp, so it can key a BTreeMap.
    let mut groups: BTreeMap<&CellValue, (f64, usize)> = BTreeMap::new();
    for (xv, yv) in x.values.iter().zip(&y.values) {
        if xv.is_null() {
            continue;
        }
        let Some(yf) = yv.as_f64() else {
            continue;
        };
        let entry = groups.entry(xv).or_insert((0.0, 0));
        entry.0 += yf;
        entry.1 += 1;
    }

    let bars = groups
        .into_iter()
        .map(|(xv, (sum, count))| CategoryBar {
            label: xv.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect();

    Ok(BarComparison {
        x_column: x.name.clone(),
        y_column: y.name.clone(),
        bars,
    })
}
