use fatura_core::{CellValue, ColumnSet, OutputRow, Transaction};

/// Semantic purpose of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Date,
    Description,
    Value,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleMatch {
    /// Case-sensitive equality, tried in candidate order.
    Exact(&'static [&'static str]),
    /// Lowercased column name contains any keyword; first column wins.
    Contains(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: Role,
    pub rule: RoleMatch,
}

/// Rules in the order their values are written into a row. Later roles
/// overwrite earlier ones when two resolve to the same column.
pub const ROLE_RULES: [RoleRule; 4] = [
    RoleRule {
        role: Role::Date,
        rule: RoleMatch::Exact(&["Data", "Data Vencimento", "Data_Vencimento", "Dt_Vencimento", "Date"]),
    },
    RoleRule {
        role: Role::Description,
        rule: RoleMatch::Contains(&["descricao", "description", "desc"]),
    },
    RoleRule {
        role: Role::Value,
        rule: RoleMatch::Contains(&["valor", "value", "amount"]),
    },
    RoleRule {
        role: Role::Note,
        rule: RoleMatch::Contains(&["observacao", "obs", "observation"]),
    },
];

impl RoleMatch {
    pub fn find<'c>(&self, columns: &'c ColumnSet) -> Option<&'c str> {
        match self {
            RoleMatch::Exact(candidates) => candidates
                .iter()
                .find_map(|name| columns.iter().find(|c| c == name)),
            RoleMatch::Contains(keywords) => columns.iter().find(|col| {
                let lower = col.to_lowercase();
                keywords.iter().any(|kw| lower.contains(kw))
            }),
        }
    }
}

/// Column index resolved for each role. `None` means the template has no
/// column for that role and the value is left out of the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    pub date: usize,
    /// Set when no date candidate matched and the first column was used.
    pub date_fallback: bool,
    pub description: Option<usize>,
    pub value: Option<usize>,
    pub note: Option<usize>,
}

impl ColumnRoles {
    pub fn resolve(columns: &ColumnSet) -> Self {
        let index_of = |role: Role| {
            ROLE_RULES
                .iter()
                .find(|r| r.role == role)
                .and_then(|r| r.rule.find(columns))
                .and_then(|name| columns.position(name))
        };

        let (date, date_fallback) = match index_of(Role::Date) {
            Some(idx) => (idx, false),
            None => {
                tracing::warn!(
                    column = columns.first(),
                    "no recognized date column in template, using the first column"
                );
                (0, true)
            }
        };

        ColumnRoles {
            date,
            date_fallback,
            description: index_of(Role::Description),
            value: index_of(Role::Value),
            note: index_of(Role::Note),
        }
    }

    pub fn column(&self, role: Role) -> Option<usize> {
        match role {
            Role::Date => Some(self.date),
            Role::Description => self.description,
            Role::Value => self.value,
            Role::Note => self.note,
        }
    }
}

/// Maps transactions onto template columns.
pub struct TransactionProjector {
    columns: ColumnSet,
    roles: ColumnRoles,
}

impl TransactionProjector {
    pub fn new(columns: ColumnSet) -> Self {
        let roles = ColumnRoles::resolve(&columns);
        Self { columns, roles }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    /// A row with every column present; unmatched columns stay empty.
    pub fn project(&self, tx: &Transaction) -> OutputRow {
        let mut row = OutputRow::empty(self.columns.len());
        for rule in &ROLE_RULES {
            let Some(idx) = self.roles.column(rule.role) else {
                continue;
            };
            let value = match rule.role {
                Role::Date => CellValue::Text(tx.date.clone()),
                Role::Description => CellValue::Text(tx.description.clone()),
                Role::Value => CellValue::Amount(tx.amount),
                Role::Note => CellValue::Text(tx.note.clone()),
            };
            row.set(idx, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatura_core::Money;

    fn cols(names: &[&str]) -> ColumnSet {
        ColumnSet::new(names.iter().copied()).unwrap()
    }

    fn mercado() -> Transaction {
        Transaction::new("05/03/2024", "MERCADO LIVRE", Money::from_cents(12000))
    }

    #[test]
    fn resolves_reference_template() {
        let roles = ColumnRoles::resolve(&cols(&[
            "Data Vencimento",
            "Descricao Completa",
            "Valor Total",
            "Obs",
        ]));
        assert_eq!(roles.date, 0);
        assert!(!roles.date_fallback);
        assert_eq!(roles.description, Some(1));
        assert_eq!(roles.value, Some(2));
        assert_eq!(roles.note, Some(3));
    }

    #[test]
    fn projects_reference_row() {
        let projector = TransactionProjector::new(cols(&[
            "Data Vencimento",
            "Descricao Completa",
            "Valor Total",
            "Obs",
        ]));
        let row = projector.project(&mercado());
        assert_eq!(
            row.cells(),
            &[
                CellValue::Text("05/03/2024".into()),
                CellValue::Text("MERCADO LIVRE".into()),
                CellValue::Amount(Money::from_cents(12000)),
                CellValue::Text("MERCADO LIVRE".into()),
            ]
        );
    }

    #[test]
    fn date_candidates_follow_priority_not_column_order() {
        let roles = ColumnRoles::resolve(&cols(&["Date", "Data Vencimento", "Data"]));
        assert_eq!(roles.date, 2);
    }

    #[test]
    fn date_match_is_case_sensitive() {
        let roles = ColumnRoles::resolve(&cols(&["Historico", "data"]));
        assert_eq!(roles.date, 0);
        assert!(roles.date_fallback);
    }

    #[test]
    fn keyword_roles_are_case_insensitive_substrings() {
        let roles = ColumnRoles::resolve(&cols(&["Data", "DESCRIPTION", "Amount (BRL)", "OBSERVATION"]));
        assert_eq!(roles.description, Some(1));
        assert_eq!(roles.value, Some(2));
        assert_eq!(roles.note, Some(3));
    }

    #[test]
    fn first_matching_column_wins() {
        let roles = ColumnRoles::resolve(&cols(&["Data", "Valor Bruto", "Valor Liquido"]));
        assert_eq!(roles.value, Some(1));
    }

    #[test]
    fn unmatched_roles_are_omitted() {
        let projector = TransactionProjector::new(cols(&["Data", "Conta", "Centro de Custo"]));
        assert_eq!(projector.roles().description, None);
        assert_eq!(projector.roles().value, None);
        assert_eq!(projector.roles().note, None);

        let row = projector.project(&mercado());
        assert_eq!(row.cell(0), Some(&CellValue::Text("05/03/2024".into())));
        assert_eq!(row.cell(1), Some(&CellValue::Empty));
        assert_eq!(row.cell(2), Some(&CellValue::Empty));
    }

    #[test]
    fn later_role_overwrites_shared_column() {
        // "Descricao Obs" matches both description and note; note is written last.
        let projector = TransactionProjector::new(cols(&["Data", "Descricao Obs"]));
        let mut tx = mercado();
        tx.note = "NOTA".into();
        let row = projector.project(&tx);
        assert_eq!(row.cell(1), Some(&CellValue::Text("NOTA".into())));
    }

    #[test]
    fn fallback_date_column_can_be_overwritten() {
        // The first column doubles as description; the description wins.
        let projector = TransactionProjector::new(cols(&["Descricao", "Valor"]));
        assert!(projector.roles().date_fallback);
        let row = projector.project(&mercado());
        assert_eq!(row.cell(0), Some(&CellValue::Text("MERCADO LIVRE".into())));
    }

    #[test]
    fn role_rule_table_order() {
        let order: Vec<_> = ROLE_RULES.iter().map(|r| r.role).collect();
        assert_eq!(order, vec![Role::Date, Role::Description, Role::Value, Role::Note]);
    }
}
