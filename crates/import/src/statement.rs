use fatura_core::{BankFormat, StatementYear, Transaction};
use serde::Serialize;
use thiserror::Error;

use crate::grammar::{LineGrammar, LineOutcome, SantanderGrammar, SicoobGrammar};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("{bank} statements need the statement year before parsing")]
    MissingYear { bank: BankFormat },
}

/// Everything a parse run needs, gathered up front.
#[derive(Debug, Clone)]
pub struct ParseRequest<'a> {
    pub bank: BankFormat,
    pub year: Option<StatementYear>,
    pub text: &'a str,
}

impl<'a> ParseRequest<'a> {
    pub fn new(bank: BankFormat, year: Option<StatementYear>, text: &'a str) -> Self {
        Self { bank, year, text }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedStatement {
    pub transactions: Vec<Transaction>,
    /// Non-blank lines examined.
    pub lines_read: usize,
    pub reversals_skipped: usize,
    pub boilerplate_skipped: usize,
    pub non_positive_skipped: usize,
}

impl ParsedStatement {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }
}

/// Runs one bank's grammar over a whole statement.
pub struct StatementParser {
    grammar: Box<dyn LineGrammar + Send + Sync>,
}

impl StatementParser {
    pub fn new(bank: BankFormat, year: Option<StatementYear>) -> Result<Self, ImportError> {
        let grammar: Box<dyn LineGrammar + Send + Sync> = match (bank, year) {
            (BankFormat::Santander, _) => Box::new(SantanderGrammar),
            (BankFormat::Sicoob, Some(year)) => Box::new(SicoobGrammar::new(year)),
            (BankFormat::Sicoob, None) => return Err(ImportError::MissingYear { bank }),
        };
        Ok(Self { grammar })
    }

    pub fn bank(&self) -> BankFormat {
        self.grammar.bank()
    }

    /// Transactions come back in line order. No transactions is a valid result.
    pub fn parse(&self, text: &str) -> ParsedStatement {
        let mut out = ParsedStatement::default();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            out.lines_read += 1;

            match self.grammar.classify(line) {
                LineOutcome::Purchase(tx) => out.transactions.push(tx),
                LineOutcome::Reversal => {
                    tracing::debug!(line = line_no + 1, "skipping reversal: {line}");
                    out.reversals_skipped += 1;
                }
                LineOutcome::NonPositive => {
                    tracing::debug!(line = line_no + 1, "skipping non-positive amount: {line}");
                    out.non_positive_skipped += 1;
                }
                LineOutcome::Boilerplate => out.boilerplate_skipped += 1,
                LineOutcome::Unrecognized => {}
            }
        }

        tracing::info!(
            bank = %self.bank(),
            lines = out.lines_read,
            transactions = out.transactions.len(),
            reversals = out.reversals_skipped,
            "statement parsed"
        );
        out
    }
}

/// Build the parser for `request.bank` and run it over `request.text`.
pub fn parse_statement(request: &ParseRequest<'_>) -> Result<ParsedStatement, ImportError> {
    let parser = StatementParser::new(request.bank, request.year)?;
    Ok(parser.parse(request.text))
}
