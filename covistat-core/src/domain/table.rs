// covistat-core/src/domain/table.rs

// Table en mémoire : colonnes typées par inférence + lignes de cellules.
// Le nettoyage (drop_incomplete) et la troncature (head) vivent ici,
// l'I/O CSV reste dans l'infrastructure.

/// Column type inferred from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

/// A single value of the table. An empty field is `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell, if it carries one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) | Cell::Null => None,
        }
    }

    /// Serialized form used for artifacts and previews.
    /// Floats keep a trailing `.0` when integral so the column stays
    /// float-typed when the artifact is read back.
    pub fn render(&self) -> String {
        match self {
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => format!("{v:?}"),
            Cell::Text(s) => s.clone(),
            Cell::Null => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
}

/// In-memory tabular dataset, order-preserving relative to the source file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a typed table from a header and raw string records.
    ///
    /// Type inference mirrors the usual dataframe behavior: a column where
    /// every present value parses as an integer becomes `Int`, else `Float`
    /// if every present value parses as a float, else `Text`. A column with
    /// no present value at all stays `Text`.
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let types: Vec<ColumnType> = (0..headers.len())
            .map(|col| infer_column_type(&records, col))
            .collect();

        let columns = headers
            .into_iter()
            .zip(types.iter())
            .map(|(name, dtype)| Column {
                name,
                dtype: *dtype,
            })
            .collect();

        let rows = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .enumerate()
                    .map(|(col, raw)| parse_cell(&raw, types[col]))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name (ASCII case-insensitive, header style
    /// varies between upstream exports).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn dtype(&self, index: usize) -> Option<ColumnType> {
        self.columns.get(index).map(|c| c.dtype)
    }

    /// Completeness filter: keep only rows with a present value in EVERY
    /// column, not just the ones later aggregated. Relative order of the
    /// survivors is preserved.
    pub fn drop_incomplete(mut self) -> Self {
        self.rows.retain(|row| !row.iter().any(Cell::is_null));
        self
    }

    /// First `n` rows, all columns, original order.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

fn infer_column_type(records: &[Vec<String>], col: usize) -> ColumnType {
    let mut seen_value = false;
    let mut all_int = true;
    let mut all_float = true;

    for record in records {
        let raw = record.get(col).map(|s| s.trim()).unwrap_or("");
        if raw.is_empty() {
            continue;
        }
        seen_value = true;
        if raw.parse::<i64>().is_err() {
            all_int = false;
        }
        if raw.parse::<f64>().is_err() {
            all_float = false;
            break;
        }
    }

    match (seen_value, all_int, all_float) {
        (false, _, _) => ColumnType::Text,
        (true, true, _) => ColumnType::Int,
        (true, false, true) => ColumnType::Float,
        _ => ColumnType::Text,
    }
}

fn parse_cell(raw: &str, dtype: ColumnType) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Null;
    }
    match dtype {
        // Inference guarantees the parse succeeds for present values.
        ColumnType::Int => trimmed.parse::<i64>().map(Cell::Int).unwrap_or(Cell::Null),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .map(Cell::Float)
            .unwrap_or(Cell::Null),
        ColumnType::Text => Cell::Text(trimmed.to_string()),
    }
}
