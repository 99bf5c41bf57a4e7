//! Column allow-list mapping public filter/sort keys to storage columns.
//!
//! Caller-supplied keys are resolved through a static registry; anything
//! not in the registry falls back to default behavior instead of reaching
//! SQL text. The derived `category` key is registered filter-only because
//! it has no storage column.

use sea_query::Iden;

/// Payroll table identifier set for SeaQuery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum Payroll {
    Table,
    Id,
    Rfc,
    EmployeeName,
    Curp,
    PositionTitle,
    Branch,
    Period,
    Salary,
    Commissions,
    TotalPerceptions,
    TotalDeductions,
    Status,
}

/// How a public key may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    FilterOnly,
    SortOnly,
    Both,
}

impl Usage {
    fn filterable(self) -> bool {
        matches!(self, Usage::FilterOnly | Usage::Both)
    }

    fn sortable(self) -> bool {
        matches!(self, Usage::SortOnly | Usage::Both)
    }
}

/// One registry entry: public key, backing column (None for derived keys),
/// and allowed usage.
struct Entry {
    key: &'static str,
    column: Option<Payroll>,
    usage: Usage,
}

const REGISTRY: &[Entry] = &[
    Entry {
        key: "name",
        column: Some(Payroll::EmployeeName),
        usage: Usage::Both,
    },
    Entry {
        key: "rfc",
        column: Some(Payroll::Rfc),
        usage: Usage::Both,
    },
    Entry {
        key: "curp",
        column: Some(Payroll::Curp),
        usage: Usage::Both,
    },
    Entry {
        key: "position",
        column: Some(Payroll::PositionTitle),
        usage: Usage::Both,
    },
    Entry {
        key: "branch",
        column: Some(Payroll::Branch),
        usage: Usage::Both,
    },
    Entry {
        key: "period",
        column: Some(Payroll::Period),
        usage: Usage::Both,
    },
    Entry {
        key: "status",
        column: Some(Payroll::Status),
        usage: Usage::Both,
    },
    Entry {
        key: "salary",
        column: Some(Payroll::Salary),
        usage: Usage::SortOnly,
    },
    Entry {
        key: "commissions",
        column: Some(Payroll::Commissions),
        usage: Usage::SortOnly,
    },
    Entry {
        key: "totalPerceptions",
        column: Some(Payroll::TotalPerceptions),
        usage: Usage::SortOnly,
    },
    Entry {
        key: "totalDeductions",
        column: Some(Payroll::TotalDeductions),
        usage: Usage::SortOnly,
    },
    // Derived at read time from position_title; no storage column, so it
    // can never appear in an ORDER BY.
    Entry {
        key: "category",
        column: None,
        usage: Usage::FilterOnly,
    },
];

/// Resolve a public key to a column usable in a WHERE clause.
pub fn resolve_filter(key: &str) -> Option<Payroll> {
    REGISTRY
        .iter()
        .find(|e| e.key == key && e.usage.filterable())
        .and_then(|e| e.column)
}

/// Resolve a public key to a column usable in an ORDER BY clause.
pub fn resolve_sort(key: &str) -> Option<Payroll> {
    REGISTRY
        .iter()
        .find(|e| e.key == key && e.usage.sortable())
        .and_then(|e| e.column)
}

/// All columns selected by the list and candidate queries, in row order.
pub fn select_columns() -> [Payroll; 12] {
    [
        Payroll::Id,
        Payroll::Rfc,
        Payroll::EmployeeName,
        Payroll::Curp,
        Payroll::PositionTitle,
        Payroll::Branch,
        Payroll::Period,
        Payroll::Salary,
        Payroll::Commissions,
        Payroll::TotalPerceptions,
        Payroll::TotalDeductions,
        Payroll::Status,
    ]
}
