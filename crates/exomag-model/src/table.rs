use serde::{Deserialize, Serialize};

/// One cell of the normalized export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Int(i64),
    Missing,
}

impl CellValue {
    /// Render the cell for tabular serialization. `Missing` becomes an
    /// empty field.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Int(value) => value.to_string(),
            CellValue::Missing => String::new(),
        }
    }
}

/// The flat, schema-complete result of a transformation run.
///
/// `columns` holds the destination names in mapping-table order; every row
/// carries exactly one cell per column, in the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ExportTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
