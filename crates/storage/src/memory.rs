use fatura_core::{ColumnSet, OutputTable};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::template::{StorageError, TemplateStore};

/// Template held in memory. Persisted tables are kept for inspection and
/// reported under a synthetic path.
#[derive(Debug)]
pub struct MemoryTemplate {
    columns: ColumnSet,
    written: Mutex<Vec<OutputTable>>,
}

impl MemoryTemplate {
    pub fn new(columns: ColumnSet) -> Self {
        Self { columns, written: Mutex::new(Vec::new()) }
    }

    /// Tables persisted so far, oldest first.
    pub fn written(&self) -> Vec<OutputTable> {
        match self.written.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TemplateStore for MemoryTemplate {
    fn columns(&self) -> Result<ColumnSet, StorageError> {
        Ok(self.columns.clone())
    }

    fn persist(&self, table: &OutputTable) -> Result<PathBuf, StorageError> {
        let mut written = match self.written.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        written.push(table.clone());
        Ok(PathBuf::from(format!("memory://{}", written.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_every_persisted_table() {
        let cols = ColumnSet::new(["Data", "Valor"]).unwrap();
        let store = MemoryTemplate::new(cols.clone());
        assert_eq!(store.columns().unwrap(), cols);

        let first = store.persist(&OutputTable::new(cols.clone())).unwrap();
        let second = store.persist(&OutputTable::new(cols)).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.written().len(), 2);
    }
}
