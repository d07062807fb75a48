use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Statement year {year} is outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("Unknown bank format: '{0}'")]
    UnknownBank(String),
    #[error("Template has no columns")]
    EmptyColumnSet,
}
