pub mod bank;
pub mod date;
pub mod error;
pub mod money;
pub mod table;
pub mod transaction;

pub use bank::{BankFormat, StatementYear};
pub use error::CoreError;
pub use money::Money;
pub use table::{CellValue, ColumnSet, OutputRow, OutputTable};
pub use transaction::Transaction;
