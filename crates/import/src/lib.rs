pub mod grammar;
pub mod projector;
pub mod statement;
pub mod table;
pub(crate) mod util;

pub use grammar::{LineGrammar, LineOutcome, SantanderGrammar, SicoobGrammar};
pub use projector::{ColumnRoles, Role, RoleMatch, RoleRule, TransactionProjector, ROLE_RULES};
pub use statement::{parse_statement, ImportError, ParseRequest, ParsedStatement, StatementParser};
pub use table::{assemble_table, AssembledTable, DroppedRow, TableAssembler};

pub mod import {
    use crate::*;
    use fatura_core::{BankFormat, ColumnSet, StatementYear};

    pub fn parse_text(
        bank: BankFormat,
        year: Option<StatementYear>,
        text: &str,
    ) -> Result<ParsedStatement, ImportError> {
        parse_statement(&ParseRequest::new(bank, year, text))
    }

    pub fn create_assembler(columns: ColumnSet) -> TableAssembler {
        TableAssembler::new(columns)
    }
}
