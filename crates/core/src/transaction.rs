use serde::{Deserialize, Serialize};

use super::money::Money;

/// A purchase read off a statement line.
///
/// `date` stays textual (`DD/MM/YYYY`) until table assembly, where rows with
/// impossible dates are dropped instead of failing the whole statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    /// Magnitude of the debit; always positive.
    pub amount: Money,
    pub note: String,
}

impl Transaction {
    /// The note column repeats the description.
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: Money) -> Self {
        let description = description.into();
        Transaction {
            date: date.into(),
            note: description.clone(),
            description,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_defaults_to_description() {
        let tx = Transaction::new("05/03/2024", "MERCADO LIVRE", Money::from_cents(12000));
        assert_eq!(tx.note, "MERCADO LIVRE");
        assert_eq!(tx.description, tx.note);
        assert_eq!(tx.amount.to_string(), "R$ 120,00");
    }
}
