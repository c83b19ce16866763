use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common dataframe dtypes.
/// Rows are hashed and compared during deduplication, so `CellValue` must be
/// `Eq + Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Missing marker.
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

// -- Manual Eq/Ord/Hash so rows can be hashed and bars sorted --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (String(a), String(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            // -0.0 == 0.0, so they must hash alike.
            CellValue::Float(f) => (if *f == 0.0 { 0.0f64 } else { *f }).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Preview rendering. Export uses [`CellValue::to_field`] instead.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "NaN"),
            other => write!(f, "{}", other.to_field()),
        }
    }
}

impl CellValue {
    /// Numeric view of the value, `None` for non-numbers and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text written into a CSV field. Missing cells become an empty field,
    /// floats use the shortest representation that parses back to the same
    /// value (`3.0` is written as `3`).
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// The dtype of a column. Every non-null value of a column matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Integer => "int",
            ColumnKind::Float => "float",
            ColumnKind::Bool => "bool",
            ColumnKind::Text => "text",
        }
    }
}

/// A named, homogeneous sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column from already typed cells, unifying them to one kind.
    ///
    /// * only missing cells → `Float`
    /// * integers only → `Integer`
    /// * integers and floats → `Float`
    /// * booleans only → `Bool`
    /// * anything else → `Text`, every cell rendered as its CSV field
    pub fn from_cells(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let mut has_int = false;
        let mut has_float = false;
        let mut has_bool = false;
        let mut has_text = false;
        for cell in &cells {
            match cell {
                CellValue::Null => {}
                CellValue::Integer(_) => has_int = true,
                CellValue::Float(_) => has_float = true,
                CellValue::Bool(_) => has_bool = true,
                CellValue::String(_) => has_text = true,
            }
        }

        let kind = match (has_int, has_float, has_bool, has_text) {
            (_, _, false, false) if has_float || !has_int => ColumnKind::Float,
            (true, false, false, false) => ColumnKind::Integer,
            (false, false, true, false) => ColumnKind::Bool,
            _ => ColumnKind::Text,
        };

        let values = match kind {
            ColumnKind::Float => cells
                .into_iter()
                .map(|c| match c.as_f64() {
                    Some(v) if !v.is_nan() => CellValue::Float(v),
                    _ => CellValue::Null,
                })
                .collect(),
            ColumnKind::Text => cells
                .into_iter()
                .map(|c| match c {
                    CellValue::Null => CellValue::Null,
                    CellValue::String(s) => CellValue::String(s),
                    other => CellValue::String(other.to_field()),
                })
                .collect(),
            ColumnKind::Integer | ColumnKind::Bool => cells,
        };

        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Arithmetic mean over the non-missing values, `None` when there are none
    /// or the column is not numeric.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_numeric() {
            return None;
        }
        let (sum, count) = self
            .values
            .iter()
            .filter_map(CellValue::as_f64)
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered set of uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Assemble a dataset, enforcing its invariants: duplicate names are
    /// suffixed `.1`, `.2`, …, empty names become `Unnamed: <index>`, and
    /// short columns are padded with missing cells.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        for (idx, col) in columns.iter_mut().enumerate() {
            if col.name.is_empty() {
                col.name = format!("Unnamed: {idx}");
            }
            if seen.contains(&col.name) {
                let base = col.name.clone();
                let mut n = 1;
                while seen.contains(&format!("{base}.{n}")) {
                    n += 1;
                }
                col.name = format!("{base}.{n}");
            }
            seen.insert(col.name.clone());
        }

        let rows = columns.iter().map(Column::len).max().unwrap_or(0);
        for col in &mut columns {
            col.values.resize(rows, CellValue::Null);
        }

        Dataset { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Numeric columns in column order. Recomputed on every call.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Borrowed view of row `idx` across all columns.
    pub fn row(&self, idx: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// Total number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                values: c.values.iter().take(n).cloned().collect(),
            })
            .collect();
        Dataset { columns }
    }

    /// Keep only the rows whose flag is `true`.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for col in &mut self.columns {
            let mut flags = keep.iter();
            col.values.retain(|_| *flags.next().unwrap_or(&false));
        }
    }

    /// Columns in the given order. Callers guarantee the names are unique.
    pub(crate) fn with_columns(columns: Vec<Column>) -> Self {
        Dataset { columns }
    }
}
