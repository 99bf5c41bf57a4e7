//! Query execution: pagination over pushable predicates, with a second
//! path for the derived category filter.
//!
//! Path A (no category filter): a COUNT query and a page query run over the
//! same predicate set inside one transaction, so total and page agree at a
//! single instant. Path B (category filter set): the category is not a
//! stored column, so the engine fetches the ordered candidate set (bounded
//! by a hard cap), classifies each row, and paginates the filtered sequence
//! in memory. That path is O(candidate set) per request. Ordering is applied
//! in SQL, before classification, so in-category order matches the requested
//! sort.
//!
//! There is no snapshot isolation across requests, and no automatic retry:
//! a failed statement surfaces as an error.

use std::collections::BTreeMap;
use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_query::{
    Asterisk, Expr, ExprTrait, PostgresQueryBuilder, Query, SelectStatement, Value, Values,
};
use sqlx::postgres::PgArguments;
use sqlx::{PgPool, Postgres, Row};

use super::category;
use super::columns::{self, Payroll};
use super::filter::FilterSpec;
use super::sort::SortSpec;
use crate::models::PayrollRow;

/// Hard ceiling on the page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page size when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard cap on the Path B candidate set. When exceeded, results carry a
/// `truncated` flag instead of silently under-counting.
pub const CANDIDATE_CAP: u64 = 10_000;

/// Applied per transaction so no statement can hold a pool connection
/// indefinitely.
const STATEMENT_TIMEOUT: &str = "SET LOCAL statement_timeout = '10s'";

/// Clamped pagination request. Invalid numbers degrade to the documented
/// bounds; nothing here rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Read `page`/`pageSize` from the flat request map:
    /// `page = max(1, page)`, `pageSize` clamped to `[1, MAX_PAGE_SIZE]`.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let page = params
            .get("page")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(1);
        let page_size = params
            .get("pageSize")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE as i64);

        Self {
            page: page.max(1) as u64,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE as i64) as u64,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the filter-wide total.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub items: Vec<PayrollRow>,
    /// Count of every record matching the filter, category included.
    pub total: u64,
    /// True when the Path B candidate cap was exceeded and `total` reflects
    /// a truncated candidate set.
    pub truncated: bool,
}

/// Grouped counts over the pushable-filtered set.
#[derive(Debug, Clone)]
pub struct Summary {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
    pub truncated: bool,
}

/// Executes compiled filter/sort specifications against the payroll table.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    pool: PgPool,
}

impl QueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a list query, choosing the execution path by whether the derived
    /// category filter is present.
    pub async fn execute(
        &self,
        filter: &FilterSpec,
        sort: &SortSpec,
        page: &PageRequest,
    ) -> Result<PageResult> {
        match filter.category() {
            Some(category) => self.execute_post_filtered(filter, sort, page, category).await,
            None => self.execute_direct(filter, sort, page).await,
        }
    }

    /// Path A: COUNT plus LIMIT/OFFSET page over identical predicates.
    async fn execute_direct(
        &self,
        filter: &FilterSpec,
        sort: &SortSpec,
        page: &PageRequest,
    ) -> Result<PageResult> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;
        sqlx::query(STATEMENT_TIMEOUT)
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        let (sql, values) = count_statement(filter).build(PostgresQueryBuilder);
        let row = bind_query(sqlx::query(&sql), &values)
            .fetch_one(&mut *tx)
            .await
            .context("failed to execute count query")?;
        let total: i64 = row.try_get(0).context("count query returned no value")?;

        let (sql, values) = page_statement(filter, sort, page).build(PostgresQueryBuilder);
        let items = bind_query_as(sqlx::query_as::<_, PayrollRow>(&sql), &values)
            .fetch_all(&mut *tx)
            .await
            .context("failed to execute page query")?;

        tx.commit()
            .await
            .context("failed to commit query transaction")?;

        Ok(PageResult {
            items,
            total: u64::try_from(total).unwrap_or(0),
            truncated: false,
        })
    }

    /// Path B: fetch the ordered candidate set, classify, then paginate the
    /// filtered sequence.
    async fn execute_post_filtered(
        &self,
        filter: &FilterSpec,
        sort: &SortSpec,
        page: &PageRequest,
        category: &str,
    ) -> Result<PageResult> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;
        sqlx::query(STATEMENT_TIMEOUT)
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        let (sql, values) = candidate_statement(filter, sort).build(PostgresQueryBuilder);
        let candidates = bind_query_as(sqlx::query_as::<_, PayrollRow>(&sql), &values)
            .fetch_all(&mut *tx)
            .await
            .context("failed to execute candidate query")?;

        tx.commit()
            .await
            .context("failed to commit query transaction")?;

        Ok(paginate_candidates(candidates, category, page))
    }

    /// Grouped counts: per status via SQL GROUP BY, per derived category by
    /// classifying the (bounded) candidate positions.
    pub async fn summarize(&self, filter: &FilterSpec) -> Result<Summary> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;
        sqlx::query(STATEMENT_TIMEOUT)
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        let (sql, values) = status_count_statement(filter).build(PostgresQueryBuilder);
        let rows = bind_query(sqlx::query(&sql), &values)
            .fetch_all(&mut *tx)
            .await
            .context("failed to execute status count query")?;

        let mut by_status = BTreeMap::new();
        let mut total: u64 = 0;
        for row in rows {
            let status: String = row.try_get(0).context("status count row missing status")?;
            let count: i64 = row.try_get(1).context("status count row missing count")?;
            let count = u64::try_from(count).unwrap_or(0);
            total += count;
            by_status.insert(status, count);
        }

        let (sql, values) = position_statement(filter).build(PostgresQueryBuilder);
        let rows = bind_query(sqlx::query(&sql), &values)
            .fetch_all(&mut *tx)
            .await
            .context("failed to execute position query")?;

        tx.commit()
            .await
            .context("failed to commit summary transaction")?;

        let truncated = rows.len() as u64 > CANDIDATE_CAP;
        let mut by_category = BTreeMap::new();
        for row in rows.iter().take(CANDIDATE_CAP as usize) {
            let position: String = row.try_get(0).context("position row missing title")?;
            let label = category::classify(&position);
            *by_category.entry(label.to_string()).or_insert(0) += 1;
        }

        Ok(Summary {
            total,
            by_status,
            by_category,
            truncated,
        })
    }
}

// -------------------------------------------------------------------------
// Statement builders
// -------------------------------------------------------------------------

fn select_statement(filter: &FilterSpec) -> SelectStatement {
    let mut stmt = Query::select();
    stmt.columns(columns::select_columns())
        .from(Payroll::Table);
    filter.apply(&mut stmt);
    stmt
}

fn count_statement(filter: &FilterSpec) -> SelectStatement {
    let mut stmt = Query::select();
    stmt.expr(Expr::col(Asterisk).count()).from(Payroll::Table);
    filter.apply(&mut stmt);
    stmt
}

fn page_statement(filter: &FilterSpec, sort: &SortSpec, page: &PageRequest) -> SelectStatement {
    let mut stmt = select_statement(filter);
    sort.apply(&mut stmt);
    stmt.limit(page.page_size).offset(page.offset());
    stmt
}

/// Candidate query for Path B: ordered, capped one past the limit so an
/// overflow is detectable.
fn candidate_statement(filter: &FilterSpec, sort: &SortSpec) -> SelectStatement {
    let mut stmt = select_statement(filter);
    sort.apply(&mut stmt);
    stmt.limit(CANDIDATE_CAP + 1);
    stmt
}

fn status_count_statement(filter: &FilterSpec) -> SelectStatement {
    let mut stmt = Query::select();
    stmt.column(Payroll::Status)
        .expr(Expr::col(Asterisk).count())
        .from(Payroll::Table);
    filter.apply(&mut stmt);
    stmt.group_by_col(Payroll::Status);
    stmt
}

fn position_statement(filter: &FilterSpec) -> SelectStatement {
    let mut stmt = Query::select();
    stmt.column(Payroll::PositionTitle).from(Payroll::Table);
    filter.apply(&mut stmt);
    stmt.limit(CANDIDATE_CAP + 1);
    stmt
}

// -------------------------------------------------------------------------
// Post-filtering (Path B)
// -------------------------------------------------------------------------

/// Classify an ordered candidate set, keep the requested category, and
/// slice the requested page out of the filtered sequence.
///
/// The candidates must already carry the requested sort order; the filtered
/// sequence preserves it, so page N+1 continues exactly where page N ended
/// for static underlying data. `total` counts the whole filtered sequence,
/// independent of the page bounds.
pub fn paginate_candidates(
    mut candidates: Vec<PayrollRow>,
    category: &str,
    page: &PageRequest,
) -> PageResult {
    let truncated = candidates.len() as u64 > CANDIDATE_CAP;
    if truncated {
        tracing::warn!(
            cap = CANDIDATE_CAP,
            "candidate set exceeds cap; reporting truncated totals"
        );
        candidates.truncate(CANDIDATE_CAP as usize);
    }

    let matched = filter_by_category(candidates, category);
    let total = matched.len() as u64;
    let items = slice_page(matched, page);

    PageResult {
        items,
        total,
        truncated,
    }
}

/// Keep candidates whose derived category matches the requested label.
/// Unknown labels match nothing, which yields an empty result rather than
/// an error.
fn filter_by_category(candidates: Vec<PayrollRow>, requested: &str) -> Vec<PayrollRow> {
    candidates
        .into_iter()
        .filter(|row| category::classify(&row.position_title).eq_ignore_ascii_case(requested))
        .collect()
}

/// Slice one page out of the filtered sequence.
fn slice_page(rows: Vec<PayrollRow>, page: &PageRequest) -> Vec<PayrollRow> {
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.page_size as usize)
        .collect()
}

// -------------------------------------------------------------------------
// Parameter binding
// -------------------------------------------------------------------------
//
// Statements are built with `build()` so values travel as query parameters
// instead of being rendered into SQL text. SeaQuery hands back the value
// list; these helpers replay it onto the sqlx query in order.

fn bind_query<'q>(
    mut query: sqlx::query::Query<'q, Postgres, PgArguments>,
    values: &Values,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for value in &values.0 {
        query = match value {
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::BigInt(v) => query.bind(*v),
            Value::Double(v) => query.bind(*v),
            Value::String(v) => query.bind(v.as_deref().cloned()),
            other => {
                tracing::warn!(?other, "unsupported bind value; binding NULL");
                query.bind(Option::<String>::None)
            }
        };
    }
    query
}

fn bind_query_as<'q, O>(
    mut query: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    values: &Values,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    for value in &values.0 {
        query = match value {
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::BigInt(v) => query.bind(*v),
            Value::Double(v) => query.bind(*v),
            Value::String(v) => query.bind(v.as_deref().cloned()),
            other => {
                tracing::warn!(?other, "unsupported bind value; binding NULL");
                query.bind(Option::<String>::None)
            }
        };
    }
    query
}
