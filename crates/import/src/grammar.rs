use fatura_core::{date, BankFormat, Money, StatementYear, Transaction};

use crate::util::re;

// ── Line patterns ─────────────────────────────────────────────────────────────

// Date, description, BRL amount, then the USD amount and the exchange rate.
re!(santander_purchase,
    r"^(\d{2}/\d{2}/\d{4})\s+(.+?)\s+(\d{1,3}(?:\.\d{3})*,\d{2})\s+\d{1,3}(?:\.\d{3})*,\d{2}\s+\d{1,3}(?:[.,]\d{3})*");
re!(santander_reversal,
    r"^(\d{2}/\d{2}/\d{4})\s+(.+?)\s+(-\d{1,3}(?:\.\d{3})*,\d{2})");

re!(sicoob_purchase,
    r"^(\d{2}/\d{2})\s+(.+?)\s+(-?\d{1,3}(?:\.\d{3})*,\d{2})$");

const SICOOB_BOILERPLATE: [&str; 3] = ["SALDO ANTERIOR", "TOTAL", "GASTOS DE"];

// ── Grammar abstraction ───────────────────────────────────────────────────────

/// What a grammar made of a single statement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Purchase(Transaction),
    /// A recognized credit line (estorno). Never emitted.
    Reversal,
    /// Matched the purchase shape but the amount was zero or negative.
    NonPositive,
    /// Statement furniture skipped before pattern matching.
    Boilerplate,
    Unrecognized,
}

impl LineOutcome {
    pub fn into_transaction(self) -> Option<Transaction> {
        match self {
            LineOutcome::Purchase(tx) => Some(tx),
            _ => None,
        }
    }
}

/// Bank-specific recognizer for one trimmed statement line.
pub trait LineGrammar {
    fn bank(&self) -> BankFormat;
    fn classify(&self, line: &str) -> LineOutcome;
}

fn purchase(date: String, description: &str, amount: &str) -> LineOutcome {
    match Money::parse_br(amount) {
        Some(amount) if amount.is_positive() => {
            LineOutcome::Purchase(Transaction::new(date, description.trim(), amount))
        }
        Some(_) => LineOutcome::NonPositive,
        None => LineOutcome::Unrecognized,
    }
}

// ── Santander ─────────────────────────────────────────────────────────────────

/// Santander card statements: full `DD/MM/YYYY` dates, three trailing
/// numeric columns (BRL, USD, rate).
#[derive(Debug, Clone, Copy, Default)]
pub struct SantanderGrammar;

impl LineGrammar for SantanderGrammar {
    fn bank(&self) -> BankFormat {
        BankFormat::Santander
    }

    fn classify(&self, line: &str) -> LineOutcome {
        if let Some(c) = santander_purchase().captures(line) {
            return purchase(c[1].to_string(), &c[2], &c[3]);
        }
        if santander_reversal().is_match(line) {
            return LineOutcome::Reversal;
        }
        LineOutcome::Unrecognized
    }
}

// ── Sicoob ────────────────────────────────────────────────────────────────────

/// Sicoob card statements: `DD/MM` dates completed with the statement year,
/// amount as the last token on the line.
#[derive(Debug, Clone, Copy)]
pub struct SicoobGrammar {
    year: StatementYear,
}

impl SicoobGrammar {
    pub fn new(year: StatementYear) -> Self {
        Self { year }
    }

    pub fn year(&self) -> StatementYear {
        self.year
    }
}

impl LineGrammar for SicoobGrammar {
    fn bank(&self) -> BankFormat {
        BankFormat::Sicoob
    }

    fn classify(&self, line: &str) -> LineOutcome {
        if SICOOB_BOILERPLATE.iter().any(|marker| line.contains(marker)) {
            return LineOutcome::Boilerplate;
        }
        match sicoob_purchase().captures(line) {
            Some(c) => purchase(date::complete_partial(&c[1], self.year), &c[2], &c[3]),
            None => LineOutcome::Unrecognized,
        }
    }
}
