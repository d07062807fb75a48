use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::CoreError;
use crate::money::Money;

/// Ordered output column names read from the template. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSet(Arc<[String]>);

impl ColumnSet {
    pub fn new<I, S>(names: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(CoreError::EmptyColumnSet);
        }
        Ok(ColumnSet(names.into()))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// The first column; a `ColumnSet` always has one.
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for ColumnSet {
    type Error = CoreError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        ColumnSet::new(names)
    }
}

impl From<ColumnSet> for Vec<String> {
    fn from(columns: ColumnSet) -> Self {
        columns.0.to_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Amount(Money),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Amount(m) => write!(f, "{:.2}", m.amount()),
        }
    }
}

/// One cell per column, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    cells: Vec<CellValue>,
}

impl OutputRow {
    pub fn empty(width: usize) -> Self {
        OutputRow { cells: vec![CellValue::Empty; width] }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> Option<&CellValue> {
        self.cells.get(idx)
    }

    pub fn cell_mut(&mut self, idx: usize) -> Option<&mut CellValue> {
        self.cells.get_mut(idx)
    }

    pub fn set(&mut self, idx: usize, value: CellValue) {
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTable {
    columns: ColumnSet,
    rows: Vec<OutputRow>,
}

impl OutputTable {
    pub fn new(columns: ColumnSet) -> Self {
        OutputTable { columns, rows: Vec::new() }
    }

    /// Append a row, padding or truncating it to the table width.
    pub fn push(&mut self, mut row: OutputRow) {
        row.cells.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.columns.position(column)?;
        self.rows.get(row)?.cell(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> ColumnSet {
        ColumnSet::new(["Data", "Descricao", "Valor"]).unwrap()
    }

    #[test]
    fn column_set_rejects_empty() {
        assert_eq!(ColumnSet::new(Vec::<String>::new()), Err(CoreError::EmptyColumnSet));
    }

    #[test]
    fn column_set_keeps_order() {
        let c = cols();
        assert_eq!(c.first(), "Data");
        assert_eq!(c.position("Valor"), Some(2));
        assert_eq!(c.position("valor"), None);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec!["Data", "Descricao", "Valor"]);
    }

    #[test]
    fn row_set_ignores_out_of_range() {
        let mut row = OutputRow::empty(2);
        row.set(5, CellValue::Text("x".into()));
        assert!(row.cells().iter().all(CellValue::is_empty));
    }

    #[test]
    fn push_pads_short_rows() {
        let mut table = OutputTable::new(cols());
        let mut row = OutputRow::empty(1);
        row.set(0, CellValue::Text("05/03/2024".into()));
        table.push(row);
        assert_eq!(table.rows()[0].cells().len(), 3);
        assert_eq!(table.get(0, "Valor"), Some(&CellValue::Empty));
    }

    #[test]
    fn table_get_by_column_name() {
        let mut row = OutputRow::empty(3);
        row.set(2, CellValue::Amount(Money::from_cents(12000)));
        let mut table = OutputTable::new(cols());
        table.push(row);
        assert_eq!(table.get(0, "Valor"), Some(&CellValue::Amount(Money::from_cents(12000))));
        assert_eq!(table.get(0, "Data"), Some(&CellValue::Empty));
        assert_eq!(table.get(0, "Missing"), None);
        assert_eq!(table.get(1, "Data"), None);
    }

    #[test]
    fn cell_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Text("UBER".into()).to_string(), "UBER");
        assert_eq!(CellValue::Amount(Money::from_cents(4590)).to_string(), "45.90");
    }
}
