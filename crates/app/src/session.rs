use chrono::NaiveDate;
use fatura_core::{BankFormat, StatementYear};
use fatura_import::{DroppedRow, ImportError, StatementParser, TableAssembler};
use fatura_ocr::{ImageFilePages, OcrBackend, PageSource, PipelineError, StatementOcr};
use fatura_storage::{StorageError, TemplateStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::prompt::{Prompter, TextSource};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Provide the statement text first")]
    EmptyText,
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Ocr(#[from] PipelineError),
}

/// Everything one conversion needs from the user.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub bank: BankFormat,
    pub year: Option<StatementYear>,
    pub text: String,
}

#[derive(Debug)]
pub enum RunOutcome {
    NoTransactions {
        bank: BankFormat,
        lines_read: usize,
    },
    Written {
        path: PathBuf,
        parsed: usize,
        retained: usize,
        warnings: Vec<DroppedRow>,
    },
}

/// Parse → project onto the template columns → sort → persist.
pub fn run_conversion<S>(request: &ConversionRequest, store: &S) -> Result<RunOutcome, SessionError>
where
    S: TemplateStore + ?Sized,
{
    if request.text.trim().is_empty() {
        return Err(SessionError::EmptyText);
    }
    let parser = StatementParser::new(request.bank, request.year)?;
    let columns = store.columns()?;

    let parsed = parser.parse(&request.text);
    if parsed.is_empty() {
        tracing::info!(bank = %request.bank, lines = parsed.lines_read, "no transactions found");
        return Ok(RunOutcome::NoTransactions { bank: request.bank, lines_read: parsed.lines_read });
    }

    let assembled = TableAssembler::new(columns).assemble(&parsed.transactions);
    let path = store.persist(&assembled.table)?;

    Ok(RunOutcome::Written {
        path,
        parsed: parsed.len(),
        retained: assembled.retained(),
        warnings: assembled.warnings,
    })
}

pub fn recognize_pages<B: OcrBackend>(
    ocr: &StatementOcr<B>,
    pages: &dyn PageSource,
) -> Result<String, SessionError> {
    Ok(ocr.extract_text(pages)?)
}

/// The interactive loop: one conversion per iteration until the user quits
/// or input ends. Conversion errors are reported and the loop continues.
pub fn run_interactive<R, W, S, B>(
    prompter: &mut Prompter<R, W>,
    store: &S,
    ocr: &StatementOcr<B>,
    today: NaiveDate,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    S: TemplateStore + ?Sized,
    B: OcrBackend,
{
    loop {
        let Some(bank) = prompter.choose_bank()? else {
            return Ok(());
        };
        let year = if bank.requires_year() {
            match prompter.ask_year(today)? {
                Some(year) => Some(year),
                None => return Ok(()),
            }
        } else {
            None
        };
        let Some(source) = prompter.choose_source()? else {
            return Ok(());
        };

        let text = match source {
            TextSource::Pasted(text) => text,
            TextSource::Pages(paths) => match recognize_pages(ocr, &ImageFilePages::new(paths)) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("OCR failed: {e}");
                    prompter.report_error(&e)?;
                    continue;
                }
            },
        };

        match run_conversion(&ConversionRequest { bank, year, text }, store) {
            Ok(outcome) => prompter.report(&outcome)?,
            Err(e) => {
                tracing::warn!(bank = %bank, "conversion failed: {e}");
                prompter.report_error(&e)?;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
