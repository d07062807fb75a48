use calamine::{Data, Reader};
use chrono::NaiveDateTime;
use fatura_core::{CellValue, ColumnSet, CoreError, OutputTable};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Template workbook not found: {}", path.display())]
    TemplateMissing { path: PathBuf },
    #[error("Sheet '{sheet}' not found in template {}", path.display())]
    SheetMissing { sheet: String, path: PathBuf },
    #[error("Failed to read template {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
    #[error("Failed to write workbook {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Source of the output schema and sink for the finished table.
pub trait TemplateStore {
    /// Column names from the header row of the target sheet, in order.
    fn columns(&self) -> Result<ColumnSet, StorageError>;

    /// Writes a new workbook with the target sheet replaced by `table` and
    /// returns where it landed.
    fn persist(&self, table: &OutputTable) -> Result<PathBuf, StorageError>;
}

/// `fatura_processada_YYYYMMDD_HHMMSS.xlsx`
pub fn output_file_name(at: NaiveDateTime) -> String {
    format!("fatura_processada_{}.xlsx", at.format("%Y%m%d_%H%M%S"))
}

/// An `.xlsx` template on disk. The header row of `sheet_name` defines the
/// columns; every other sheet is carried into the output untouched.
#[derive(Debug, Clone)]
pub struct XlsxTemplate {
    template_path: PathBuf,
    sheet_name: String,
    output_dir: PathBuf,
}

impl XlsxTemplate {
    /// Output goes next to the template unless [`with_output_dir`] says otherwise.
    ///
    /// [`with_output_dir`]: XlsxTemplate::with_output_dir
    pub fn new(template_path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        let template_path = template_path.into();
        let output_dir = template_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { template_path, sheet_name: sheet_name.into(), output_dir }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn ensure_template(&self) -> Result<(), StorageError> {
        if self.template_path.is_file() {
            Ok(())
        } else {
            Err(StorageError::TemplateMissing { path: self.template_path.clone() })
        }
    }

    fn read_error(&self, e: impl std::fmt::Display) -> StorageError {
        StorageError::Read { path: self.template_path.clone(), message: e.to_string() }
    }

    /// Same as [`TemplateStore::persist`] with an explicit timestamp for the
    /// output file name.
    pub fn persist_at(&self, table: &OutputTable, at: NaiveDateTime) -> Result<PathBuf, StorageError> {
        self.ensure_template()?;

        let mut book = umya_spreadsheet::reader::xlsx::read(&self.template_path)
            .map_err(|e| self.read_error(e))?;

        let target = self.output_dir.join(output_file_name(at));
        let write_error = |e: &dyn std::fmt::Display| StorageError::Write {
            path: target.clone(),
            message: e.to_string(),
        };

        let sheet_missing = || StorageError::SheetMissing {
            sheet: self.sheet_name.clone(),
            path: self.template_path.clone(),
        };
        let position = book
            .get_sheet_collection()
            .iter()
            .position(|ws| ws.get_name() == self.sheet_name)
            .ok_or_else(sheet_missing)?;

        // Recreate the sheet so no stale rows survive below the new data, then
        // move it back to its original tab position.
        book.remove_sheet_by_name(&self.sheet_name).map_err(|_| sheet_missing())?;
        book.new_sheet(self.sheet_name.clone()).map_err(|e| write_error(&e))?;
        let sheets = book.get_sheet_collection_mut();
        sheets[position..].rotate_right(1);
        let sheet = &mut sheets[position];

        for (col, name) in (1u32..).zip(table.columns().iter()) {
            sheet.get_cell_mut((col, 1u32)).set_value_string(name);
        }
        for (row, cells) in (2u32..).zip(table.rows()) {
            for (col, value) in (1u32..).zip(cells.cells()) {
                match value {
                    CellValue::Empty => {}
                    CellValue::Text(text) => {
                        sheet.get_cell_mut((col, row)).set_value_string(text.as_str());
                    }
                    CellValue::Amount(money) => {
                        sheet.get_cell_mut((col, row)).set_value_number(money.to_f64());
                    }
                }
            }
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let mut staged = tempfile::Builder::new()
            .prefix(".fatura_processada_")
            .suffix(".xlsx.tmp")
            .tempfile_in(&self.output_dir)?;
        umya_spreadsheet::writer::xlsx::write_writer(&book, staged.as_file_mut())
            .map_err(|e| write_error(&e))?;
        staged.persist(&target).map_err(|e| StorageError::Io(e.error))?;

        tracing::info!(
            path = %target.display(),
            sheet = %self.sheet_name,
            rows = table.len(),
            "workbook written"
        );
        Ok(target)
    }
}

impl TemplateStore for XlsxTemplate {
    fn columns(&self) -> Result<ColumnSet, StorageError> {
        self.ensure_template()?;

        let mut workbook =
            calamine::open_workbook_auto(&self.template_path).map_err(|e| self.read_error(e))?;

        if !workbook.sheet_names().iter().any(|s| s == &self.sheet_name) {
            return Err(StorageError::SheetMissing {
                sheet: self.sheet_name.clone(),
                path: self.template_path.clone(),
            });
        }

        let range = workbook
            .worksheet_range(&self.sheet_name)
            .map_err(|e| self.read_error(e))?;

        // The range begins at the first used cell; blank leading columns still
        // count so positions line up with column A on write.
        let leading = range.start().map_or(0, |(_, col)| col as usize);
        let header = range.rows().next().unwrap_or(&[]);
        let blank = Data::Empty;
        let names: Vec<String> = if header.is_empty() {
            Vec::new()
        } else {
            std::iter::repeat(&blank)
                .take(leading)
                .chain(header)
                .enumerate()
                .map(|(idx, cell)| header_name(idx, cell))
                .collect()
        };

        let columns = ColumnSet::new(names)?;
        tracing::debug!(
            sheet = %self.sheet_name,
            columns = columns.len(),
            "template columns read"
        );
        Ok(columns)
    }

    fn persist(&self, table: &OutputTable) -> Result<PathBuf, StorageError> {
        self.persist_at(table, chrono::Local::now().naive_local())
    }
}

/// Blank header cells get positional names so every column stays addressable.
fn header_name(idx: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {idx}"),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
