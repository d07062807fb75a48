use fatura_core::date::sort_ascending_dropping_invalid;
use fatura_core::{CellValue, ColumnSet, OutputRow, OutputTable, Transaction};
use serde::Serialize;

use crate::projector::TransactionProjector;

/// A row removed because its date column did not hold a valid `DD/MM/YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    /// Position in the parsed transaction list.
    pub index: usize,
    pub column: String,
    pub value: String,
}

impl std::fmt::Display for DroppedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "transaction #{} dropped: '{}' in column '{}' is not a DD/MM/YYYY date",
            self.index + 1,
            self.value,
            self.column
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledTable {
    pub table: OutputTable,
    pub warnings: Vec<DroppedRow>,
}

impl AssembledTable {
    pub fn retained(&self) -> usize {
        self.table.len()
    }
}

/// Builds the date-sorted output table for a template.
pub struct TableAssembler {
    projector: TransactionProjector,
}

impl TableAssembler {
    pub fn new(columns: ColumnSet) -> Self {
        Self { projector: TransactionProjector::new(columns) }
    }

    pub fn projector(&self) -> &TransactionProjector {
        &self.projector
    }

    pub fn assemble(&self, transactions: &[Transaction]) -> AssembledTable {
        let columns = self.projector.columns().clone();
        let date_idx = self.projector.roles().date;
        let date_column = columns.names().get(date_idx).cloned().unwrap_or_default();

        let rows: Vec<OutputRow> = transactions.iter().map(|tx| self.projector.project(tx)).collect();

        let sorted = sort_ascending_dropping_invalid(rows, |row| match row.cell_mut(date_idx) {
            Some(CellValue::Text(text)) => Some(text),
            _ => None,
        });

        let warnings: Vec<DroppedRow> = sorted
            .dropped
            .into_iter()
            .map(|(index, value)| DroppedRow { index, column: date_column.clone(), value })
            .collect();
        for w in &warnings {
            tracing::warn!("{w}");
        }

        let mut table = OutputTable::new(columns);
        for row in sorted.items {
            table.push(row);
        }

        tracing::info!(
            parsed = transactions.len(),
            retained = table.len(),
            dropped = warnings.len(),
            "table assembled"
        );

        AssembledTable { table, warnings }
    }
}

/// One-shot convenience over [`TableAssembler`].
pub fn assemble_table(transactions: &[Transaction], columns: ColumnSet) -> AssembledTable {
    TableAssembler::new(columns).assemble(transactions)
}
