//! Filter criteria and predicate construction.
//!
//! Raw request parameters arrive as a flat string map. They are captured
//! once per request into [`FilterCriteria`], then compiled into a
//! [`FilterSpec`]: a list of pushable predicates (rendered through SeaQuery
//! with bound values) plus the one non-pushable dimension, the derived
//! category, which can only be applied after rows are materialized.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_query::{Cond, Expr, ExprTrait, SelectStatement, SimpleExpr};

use super::columns::{self, Payroll};
use super::period::{self, PeriodFilter};

/// Raw filter values extracted from the request, blank values dropped.
/// Immutable for the rest of the request.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub branch: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub period: Option<String>,
    pub category: Option<String>,
}

impl FilterCriteria {
    /// Capture filter parameters from the flat request map. Absent or blank
    /// values are omitted; unrecognized keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            search: non_blank(params.get("q")),
            branch: non_blank(params.get("branch")),
            position: non_blank(params.get("position")),
            status: non_blank(params.get("status")),
            period: non_blank(params.get("period")),
            category: non_blank(params.get("category")),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One pushable predicate. Values stay out of SQL text; they are bound as
/// query parameters when the statement is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive contains-match over name and RFC, one shared term.
    Search { term: String },
    /// Exact match on an allow-listed column.
    Equals { column: Payroll, value: String },
    /// Half-open month range over the period column.
    PeriodRange { start: NaiveDate, end: NaiveDate },
}

impl Predicate {
    /// Render this predicate as a SeaQuery expression with bound values.
    pub fn to_expr(&self) -> SimpleExpr {
        match self {
            Predicate::Search { term } => {
                // One $1 serves both columns so a single bound term covers
                // the whole OR group.
                let escaped = escape_like_wildcards(term);
                Expr::cust_with_values(
                    "(employee_name ILIKE '%' || $1 || '%' OR rfc ILIKE '%' || $1 || '%')",
                    [escaped],
                )
            }
            Predicate::Equals { column, value } => Expr::col(*column).eq(value.clone()),
            Predicate::PeriodRange { start, end } => Cond::all()
                .add(Expr::col(Payroll::Period).gte(period::iso(*start)))
                .add(Expr::col(Payroll::Period).lt(period::iso(*end)))
                .into(),
        }
    }
}

/// Compiled filter: pushable predicates plus the optional derived category.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
    category: Option<String>,
}

impl FilterSpec {
    /// Compile criteria into predicates.
    pub fn build(criteria: &FilterCriteria) -> Self {
        let mut predicates = Vec::new();

        if let Some(term) = &criteria.search {
            predicates.push(Predicate::Search { term: term.clone() });
        }

        let exact = [
            ("branch", &criteria.branch),
            ("position", &criteria.position),
            ("status", &criteria.status),
        ];
        for (key, value) in exact {
            if let Some(value) = value
                && let Some(column) = columns::resolve_filter(key)
            {
                predicates.push(Predicate::Equals {
                    column,
                    value: value.clone(),
                });
            }
        }

        if let Some(raw) = &criteria.period
            && let Some(column) = columns::resolve_filter("period")
        {
            match period::normalize(raw) {
                PeriodFilter::MonthRange { start, end } => {
                    predicates.push(Predicate::PeriodRange { start, end });
                }
                PeriodFilter::ExactDate(date) => predicates.push(Predicate::Equals {
                    column,
                    value: period::iso(date),
                }),
                PeriodFilter::Label(label) => predicates.push(Predicate::Equals {
                    column,
                    value: label,
                }),
                PeriodFilter::Empty => {}
            }
        }

        Self {
            predicates,
            category: criteria.category.clone(),
        }
    }

    /// The pushable predicates, in build order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The derived category filter, if requested. Not translatable to a
    /// column predicate; the executor applies it after materialization.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Add every pushable predicate to a statement's WHERE clause.
    pub fn apply(&self, stmt: &mut SelectStatement) {
        for predicate in &self.predicates {
            stmt.and_where(predicate.to_expr());
        }
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sea_query::{PostgresQueryBuilder, Query};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(predicate: &Predicate) -> String {
        let mut stmt = Query::select();
        stmt.expr(Expr::val(1)).and_where(predicate.to_expr());
        stmt.to_string(PostgresQueryBuilder)
    }

    #[test]
    fn blank_and_missing_params_are_omitted() {
        let criteria = FilterCriteria::from_params(&params(&[
            ("branch", "  "),
            ("status", ""),
            ("position", "TECNICO"),
        ]));

        assert!(criteria.branch.is_none());
        assert!(criteria.status.is_none());
        assert_eq!(criteria.position.as_deref(), Some("TECNICO"));

        let spec = FilterSpec::build(&criteria);
        assert_eq!(spec.predicates().len(), 1);
    }

    #[test]
    fn unknown_params_are_ignored() {
        let criteria =
            FilterCriteria::from_params(&params(&[("debug", "1"), ("branch", "Matriz")]));
        let spec = FilterSpec::build(&criteria);

        assert_eq!(spec.predicates().len(), 1);
        assert!(matches!(
            &spec.predicates()[0],
            Predicate::Equals {
                column: Payroll::Branch,
                ..
            }
        ));
    }

    #[test]
    fn search_expands_to_shared_term_over_name_and_rfc() {
        let criteria = FilterCriteria::from_params(&params(&[("q", "ruiz")]));
        let spec = FilterSpec::build(&criteria);

        let sql = render(&spec.predicates()[0]);
        assert!(sql.contains("employee_name ILIKE"), "{sql}");
        assert!(sql.contains("rfc ILIKE"), "{sql}");
        assert!(sql.contains("ruiz"), "{sql}");
    }

    #[test]
    fn search_escapes_like_wildcards() {
        let criteria = FilterCriteria::from_params(&params(&[("q", "100%_x")]));
        let spec = FilterSpec::build(&criteria);

        let sql = render(&spec.predicates()[0]);
        assert!(!sql.contains("'100%_x'"), "{sql}");
    }

    #[test]
    fn month_period_becomes_range_predicate() {
        let criteria = FilterCriteria::from_params(&params(&[("period", "2024-10")]));
        let spec = FilterSpec::build(&criteria);

        let sql = render(&spec.predicates()[0]);
        assert!(sql.contains(">="), "{sql}");
        assert!(sql.contains("2024-10-01"), "{sql}");
        assert!(sql.contains("2024-11-01"), "{sql}");
    }

    #[test]
    fn exact_and_label_periods_become_equality() {
        let spec = FilterSpec::build(&FilterCriteria::from_params(&params(&[(
            "period",
            "2024-10-15",
        )])));
        assert!(matches!(
            &spec.predicates()[0],
            Predicate::Equals { column: Payroll::Period, value } if value == "2024-10-15"
        ));

        let spec = FilterSpec::build(&FilterCriteria::from_params(&params(&[(
            "period",
            "QUINCENA 19",
        )])));
        assert!(matches!(
            &spec.predicates()[0],
            Predicate::Equals { column: Payroll::Period, value } if value == "QUINCENA 19"
        ));
    }

    #[test]
    fn category_is_split_out_of_the_predicate_list() {
        let criteria =
            FilterCriteria::from_params(&params(&[("category", "Gerencia"), ("branch", "Sur")]));
        let spec = FilterSpec::build(&criteria);

        assert_eq!(spec.category(), Some("Gerencia"));
        assert_eq!(spec.predicates().len(), 1);
    }

    #[test]
    fn escape_like_wildcards_function() {
        assert_eq!(escape_like_wildcards("hello"), "hello");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
    }
}
