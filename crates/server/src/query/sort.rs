//! Sort key resolution.
//!
//! Caller-supplied sort parameters are validated against the column
//! allow-list; anything unrecognized falls back to the default order
//! instead of erroring. Every resolved order carries an `id` tie-break so
//! pagination is stable for equal keys.

use sea_query::{Order, SelectStatement};

use super::columns::{self, Payroll};

/// Default sort: employee name, ascending.
pub const DEFAULT_SORT_KEY: &str = "name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A validated ORDER BY specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Payroll,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Resolve raw sort parameters.
    ///
    /// Direction is ascending unless the raw value case-insensitively reads
    /// `desc`/`descending`; unknown or unsortable keys fall back to
    /// [`DEFAULT_SORT_KEY`].
    pub fn resolve(sort_by: Option<&str>, sort_dir: Option<&str>) -> Self {
        let direction = match sort_dir.map(str::trim) {
            Some(dir) if dir.eq_ignore_ascii_case("desc") || dir.eq_ignore_ascii_case("descending") => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };

        let column = sort_by
            .map(str::trim)
            .and_then(columns::resolve_sort)
            .unwrap_or(Payroll::EmployeeName);

        Self { column, direction }
    }

    /// Add this order, plus the stable tie-break, to a statement.
    pub fn apply(&self, stmt: &mut SelectStatement) {
        let order = match self.direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };
        stmt.order_by(self.column, order);
        if self.column != Payroll::Id {
            stmt.order_by(Payroll::Id, Order::Asc);
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{PostgresQueryBuilder, Query};

    fn render(spec: &SortSpec) -> String {
        let mut stmt = Query::select();
        stmt.column(Payroll::Id).from(Payroll::Table);
        spec.apply(&mut stmt);
        stmt.to_string(PostgresQueryBuilder)
    }

    #[test]
    fn unknown_key_falls_back_to_default() {
        let unknown = SortSpec::resolve(Some("nope"), None);
        let default = SortSpec::resolve(Some(DEFAULT_SORT_KEY), None);

        assert_eq!(unknown, default);
        assert_eq!(unknown.column, Payroll::EmployeeName);
        assert_eq!(render(&unknown), render(&default));
    }

    #[test]
    fn direction_parsing_is_lenient() {
        assert_eq!(
            SortSpec::resolve(None, Some("DESC")).direction,
            SortDirection::Descending
        );
        assert_eq!(
            SortSpec::resolve(None, Some("descending")).direction,
            SortDirection::Descending
        );
        assert_eq!(
            SortSpec::resolve(None, Some("banana")).direction,
            SortDirection::Ascending
        );
        assert_eq!(
            SortSpec::resolve(None, None).direction,
            SortDirection::Ascending
        );
    }

    #[test]
    fn filter_only_keys_are_not_sortable() {
        let spec = SortSpec::resolve(Some("category"), None);
        assert_eq!(spec.column, Payroll::EmployeeName);
    }

    #[test]
    fn order_carries_id_tie_break() {
        let sql = render(&SortSpec::resolve(Some("branch"), Some("desc")));
        assert!(sql.contains(r#""branch" DESC"#), "{sql}");
        assert!(sql.contains(r#""id" ASC"#), "{sql}");
    }
}
