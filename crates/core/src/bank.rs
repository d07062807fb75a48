use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Card issuers whose statement layout we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankFormat {
    Santander,
    Sicoob,
}

impl BankFormat {
    pub const ALL: [BankFormat; 2] = [BankFormat::Santander, BankFormat::Sicoob];

    /// Sicoob lines carry only day and month.
    pub fn requires_year(self) -> bool {
        matches!(self, BankFormat::Sicoob)
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFormat::Santander => write!(f, "Santander"),
            BankFormat::Sicoob => write!(f, "Sicoob"),
        }
    }
}

impl std::str::FromStr for BankFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "santander" => Ok(BankFormat::Santander),
            "sicoob" => Ok(BankFormat::Sicoob),
            other => Err(CoreError::UnknownBank(other.to_string())),
        }
    }
}

/// Year printed on a statement, used to complete `DD/MM` dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementYear(i32);

impl StatementYear {
    pub const MIN: i32 = 2000;

    /// Accepts `2000..=today.year() + 1`.
    pub fn new(year: i32, today: NaiveDate) -> Result<Self, CoreError> {
        let max = today.year() + 1;
        if (Self::MIN..=max).contains(&year) {
            Ok(StatementYear(year))
        } else {
            Err(CoreError::YearOutOfRange { year, min: Self::MIN, max })
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StatementYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn bank_from_str_is_case_insensitive() {
        assert_eq!(BankFormat::from_str("Santander").unwrap(), BankFormat::Santander);
        assert_eq!(BankFormat::from_str(" SICOOB ").unwrap(), BankFormat::Sicoob);
        assert!(matches!(
            BankFormat::from_str("itau"),
            Err(CoreError::UnknownBank(_))
        ));
    }

    #[test]
    fn bank_display_roundtrip() {
        for bank in BankFormat::ALL {
            assert_eq!(BankFormat::from_str(&bank.to_string()).unwrap(), bank);
        }
    }

    #[test]
    fn only_sicoob_requires_year() {
        assert!(BankFormat::Sicoob.requires_year());
        assert!(!BankFormat::Santander.requires_year());
    }

    #[test]
    fn year_bounds_inclusive() {
        assert_eq!(StatementYear::new(2000, today()).unwrap().get(), 2000);
        assert_eq!(StatementYear::new(2025, today()).unwrap().get(), 2025);
    }

    #[test]
    fn year_out_of_range() {
        assert_eq!(
            StatementYear::new(1999, today()),
            Err(CoreError::YearOutOfRange { year: 1999, min: 2000, max: 2025 })
        );
        assert!(StatementYear::new(2026, today()).is_err());
    }
}
