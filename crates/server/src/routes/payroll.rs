//! Payroll dashboard API routes.
//!
//! List, detail, grouped-count summary, and filter-catalog endpoints.
//! List parameters arrive as a flat string map so malformed values degrade
//! (clamp or fallback) instead of rejecting the request.

use std::collections::BTreeMap;
use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{PayrollItem, PayrollRow};
use crate::query::{FilterCriteria, FilterSpec, PageRequest, SortSpec, category};
use crate::response::{PageEnvelope, is_false};
use crate::state::AppState;

/// Create the payroll router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/payroll", get(list_payroll))
        .route("/api/payroll/summary", get(payroll_summary))
        .route("/api/payroll/filters", get(payroll_filters))
        .route("/api/payroll/{id}", get(get_payroll))
}

// -------------------------------------------------------------------------
// Response types
// -------------------------------------------------------------------------

/// Envelope for non-paginated payloads.
#[derive(Serialize)]
struct DataEnvelope<T> {
    success: bool,
    data: T,
}

impl<T> DataEnvelope<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryData {
    total: u64,
    by_status: BTreeMap<String, u64>,
    by_category: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "is_false")]
    truncated: bool,
}

#[derive(Serialize)]
struct FiltersData {
    branches: Vec<String>,
    positions: Vec<String>,
    statuses: Vec<String>,
    categories: Vec<&'static str>,
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

/// List payroll records with filtering, sorting, and pagination.
async fn list_payroll(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PageEnvelope<PayrollItem>>> {
    let criteria = FilterCriteria::from_params(&params);
    let filter = FilterSpec::build(&criteria);
    let sort = SortSpec::resolve(
        params.get("sortBy").map(String::as_str),
        params.get("sortDir").map(String::as_str),
    );
    let page = PageRequest::from_params(&params);

    let result = state
        .executor()
        .execute(&filter, &sort, &page)
        .await
        .map_err(AppError::from_engine)?;

    let items = result
        .items
        .iter()
        .map(|row| PayrollItem::from_row(row, state.opaque()))
        .collect();

    Ok(Json(PageEnvelope::assemble(
        items,
        result.total,
        page.page,
        page.page_size,
        result.truncated,
    )))
}

/// Fetch a single record by its opaque public id.
async fn get_payroll(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataEnvelope<PayrollItem>>> {
    let id = state.opaque().decode(&token).ok_or(AppError::NotFound)?;

    let row = PayrollRow::find_by_id(state.db(), id)
        .await
        .map_err(AppError::from_engine)?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DataEnvelope::new(PayrollItem::from_row(
        &row,
        state.opaque(),
    ))))
}

/// Grouped counts over the filtered set. Honors the pushable filters of
/// the list endpoint; the category dimension is reported as its own
/// grouping rather than accepted as an input here.
async fn payroll_summary(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<DataEnvelope<SummaryData>>> {
    let criteria = FilterCriteria::from_params(&params);
    let filter = FilterSpec::build(&criteria);

    let summary = state
        .executor()
        .summarize(&filter)
        .await
        .map_err(AppError::from_engine)?;

    Ok(Json(DataEnvelope::new(SummaryData {
        total: summary.total,
        by_status: summary.by_status,
        by_category: summary.by_category,
        truncated: summary.truncated,
    })))
}

/// Values for the dashboard's filter dropdowns.
async fn payroll_filters(
    State(state): State<AppState>,
) -> AppResult<Json<DataEnvelope<FiltersData>>> {
    let (branches, positions, statuses) = tokio::try_join!(
        PayrollRow::distinct_branches(state.db()),
        PayrollRow::distinct_positions(state.db()),
        PayrollRow::distinct_statuses(state.db()),
    )
    .map_err(AppError::from_engine)?;

    Ok(Json(DataEnvelope::new(FiltersData {
        branches,
        positions,
        statuses,
        categories: category::labels(),
    })))
}
