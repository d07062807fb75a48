use chrono::NaiveDate;
use fatura_core::{BankFormat, StatementYear};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::session::RunOutcome;

/// A line containing only this ends pasted statement text.
pub const END_OF_TEXT: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Pasted(String),
    Pages(Vec<PathBuf>),
}

/// Line-oriented terminal dialogue. `None` from any `ask_*`/`choose_*`
/// means the user quit or input ended.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|l| l.trim().to_string()))
    }

    pub fn greet(&mut self, template: &std::path::Path) -> io::Result<()> {
        writeln!(self.output, "Credit-card statement converter")?;
        writeln!(self.output, "Template: {}", template.display())
    }

    pub fn choose_bank(&mut self) -> io::Result<Option<BankFormat>> {
        loop {
            writeln!(self.output)?;
            for (idx, bank) in BankFormat::ALL.iter().enumerate() {
                writeln!(self.output, "  {}) {bank}", idx + 1)?;
            }
            writeln!(self.output, "  q) Quit")?;
            let Some(answer) = self.ask("Statement format:")? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }
            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| BankFormat::ALL.get(i).copied());
            match by_number.map(Ok).unwrap_or_else(|| answer.parse::<BankFormat>()) {
                Ok(bank) => return Ok(Some(bank)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    pub fn ask_year(&mut self, today: NaiveDate) -> io::Result<Option<StatementYear>> {
        loop {
            let Some(answer) = self.ask("Statement year (e.g. 2024):")? else {
                return Ok(None);
            };
            let year = match answer.parse::<i32>() {
                Ok(y) => y,
                Err(_) => {
                    writeln!(self.output, "'{answer}' is not a year")?;
                    continue;
                }
            };
            match StatementYear::new(year, today) {
                Ok(y) => return Ok(Some(y)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    pub fn choose_source(&mut self) -> io::Result<Option<TextSource>> {
        loop {
            writeln!(self.output, "  1) Paste statement text")?;
            writeln!(self.output, "  2) OCR scanned page images (PNG/JPEG; render PDFs first)")?;
            let Some(answer) = self.ask("Source:")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "1" => return self.read_pasted().map(Some),
                "2" => return self.read_page_paths().map(Some),
                other => writeln!(self.output, "Unknown option '{other}'")?,
            }
        }
    }

    fn read_pasted(&mut self) -> io::Result<TextSource> {
        writeln!(self.output, "Paste the statement, then a line with a single '{END_OF_TEXT}':")?;
        self.output.flush()?;
        let mut text = String::new();
        while let Some(line) = self.read_line()? {
            if line.trim() == END_OF_TEXT {
                break;
            }
            text.push_str(&line);
            text.push('\n');
        }
        Ok(TextSource::Pasted(text))
    }

    fn read_page_paths(&mut self) -> io::Result<TextSource> {
        writeln!(self.output, "PDF statements must be rendered to page images first (one PNG per page).")?;
        writeln!(self.output, "Page image paths, one per line, in page order; empty line to finish:")?;
        self.output.flush()?;
        let mut paths = Vec::new();
        while let Some(line) = self.read_line()? {
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            paths.push(PathBuf::from(line));
        }
        Ok(TextSource::Pages(paths))
    }

    pub fn report(&mut self, outcome: &RunOutcome) -> io::Result<()> {
        match outcome {
            RunOutcome::NoTransactions { bank, lines_read } => writeln!(
                self.output,
                "No {bank} purchase transactions found in {lines_read} lines."
            ),
            RunOutcome::Written { path, parsed, retained, warnings } => {
                for w in warnings {
                    writeln!(self.output, "warning: {w}")?;
                }
                writeln!(
                    self.output,
                    "{retained} of {parsed} transactions written to {}",
                    path.display()
                )
            }
        }
    }

    pub fn report_error(&mut self, err: &dyn Display) -> io::Result<()> {
        writeln!(self.output, "error: {err}")
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use fatura_import::DroppedRow;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    // ── bank ─────────────────────────────────────────────────────────────────

    #[test]
    fn bank_by_number_or_name() {
        assert_eq!(prompter("1\n").choose_bank().unwrap(), Some(BankFormat::Santander));
        assert_eq!(prompter("sicoob\n").choose_bank().unwrap(), Some(BankFormat::Sicoob));
    }

    #[test]
    fn bank_reprompts_on_garbage() {
        let mut p = prompter("9\nitau\n2\n");
        assert_eq!(p.choose_bank().unwrap(), Some(BankFormat::Sicoob));
        assert!(output(p).contains("itau"));
    }

    #[test]
    fn quit_and_eof_end_the_dialogue() {
        assert_eq!(prompter("q\n").choose_bank().unwrap(), None);
        assert_eq!(prompter("").choose_bank().unwrap(), None);
    }

    // ── year ─────────────────────────────────────────────────────────────────

    #[test]
    fn year_reprompts_until_in_range() {
        let mut p = prompter("vinte\n1999\n2026\n2024\n");
        assert_eq!(p.ask_year(today()).unwrap().map(StatementYear::get), Some(2024));
        let out = output(p);
        assert!(out.contains("'vinte' is not a year"));
        assert!(out.contains("1999"));
        assert!(out.contains("2026"));
    }

    #[test]
    fn next_year_is_accepted() {
        assert_eq!(prompter("2025\n").ask_year(today()).unwrap().map(StatementYear::get), Some(2025));
    }

    // ── source ───────────────────────────────────────────────────────────────

    #[test]
    fn pasted_text_ends_at_dot_line() {
        let mut p = prompter("1\n05/03 MERCADO LIVRE 120,00\n06/03 PADARIA 8,50\n.\nleftover\n");
        assert_eq!(
            p.choose_source().unwrap(),
            Some(TextSource::Pasted("05/03 MERCADO LIVRE 120,00\n06/03 PADARIA 8,50\n".into()))
        );
    }

    #[test]
    fn pasted_text_ends_at_eof() {
        let mut p = prompter("1\r\n01/03/2024 UBER TRIP 45,90 9,18 5,000\r\n");
        assert_eq!(
            p.choose_source().unwrap(),
            Some(TextSource::Pasted("01/03/2024 UBER TRIP 45,90 9,18 5,000\n".into()))
        );
    }

    #[test]
    fn page_paths_until_blank_line() {
        let mut p = prompter("2\n/tmp/fatura p1.png\n/tmp/fatura p2.png\n\n");
        assert_eq!(
            p.choose_source().unwrap(),
            Some(TextSource::Pages(vec![
                PathBuf::from("/tmp/fatura p1.png"),
                PathBuf::from("/tmp/fatura p2.png"),
            ]))
        );
    }

    #[test]
    fn page_prompt_explains_pdf_rendering() {
        let mut p = prompter("2\n\n");
        assert_eq!(p.choose_source().unwrap(), Some(TextSource::Pages(vec![])));
        let out = output(p);
        assert!(out.contains("PDF statements must be rendered to page images first"));
        assert!(out.contains("one PNG per page"));
    }

    // ── report ───────────────────────────────────────────────────────────────

    #[test]
    fn report_lists_warnings_and_path() {
        let mut p = prompter("");
        p.report(&RunOutcome::Written {
            path: PathBuf::from("/out/fatura_processada_20240305_140709.xlsx"),
            parsed: 2,
            retained: 1,
            warnings: vec![DroppedRow { index: 0, column: "Data".into(), value: "30/02/2024".into() }],
        })
        .unwrap();
        let out = output(p);
        assert!(out.contains("30/02/2024"));
        assert!(out.contains("1 of 2 transactions written to /out/fatura_processada_20240305_140709.xlsx"));
    }

    #[test]
    fn report_no_transactions_names_bank() {
        let mut p = prompter("");
        p.report(&RunOutcome::NoTransactions { bank: BankFormat::Sicoob, lines_read: 3 }).unwrap();
        assert!(output(p).contains("No Sicoob purchase transactions"));
    }
}
