//! Payroll record model and read-side lookups.
//!
//! The engine only ever reads this table; there is no write path here.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

use crate::opaque::OpaqueIdCodec;
use crate::query::category;

/// One row of the payroll history table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PayrollRow {
    pub id: i64,
    /// Tax/legal person identifier.
    pub rfc: String,
    pub employee_name: String,
    /// National person identifier.
    pub curp: String,
    pub position_title: String,
    pub branch: String,
    /// Pay cycle code: ISO date for current data, free-form label for
    /// legacy imports.
    pub period: String,
    pub salary: f64,
    pub commissions: f64,
    pub total_perceptions: f64,
    pub total_deductions: f64,
    pub status: String,
}

/// Response projection of a payroll row: opaque id, derived category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollItem {
    pub id: String,
    pub rfc: String,
    pub name: String,
    pub curp: String,
    pub position: String,
    pub branch: String,
    pub period: String,
    pub salary: f64,
    pub commissions: f64,
    pub total_perceptions: f64,
    pub total_deductions: f64,
    pub status: String,
    pub category: &'static str,
}

impl PayrollItem {
    /// Shape a stored row for the response body.
    pub fn from_row(row: &PayrollRow, codec: &OpaqueIdCodec) -> Self {
        Self {
            id: codec.encode(row.id),
            rfc: row.rfc.clone(),
            name: row.employee_name.clone(),
            curp: row.curp.clone(),
            position: row.position_title.clone(),
            branch: row.branch.clone(),
            period: row.period.clone(),
            salary: row.salary,
            commissions: row.commissions,
            total_perceptions: row.total_perceptions,
            total_deductions: row.total_deductions,
            status: row.status.clone(),
            category: category::classify(&row.position_title),
        }
    }
}

impl PayrollRow {
    /// Find a record by its internal id.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        sqlx::query_as::<_, PayrollRow>("SELECT * FROM payroll WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch payroll record by id")
    }

    /// Distinct branch names, blanks excluded.
    pub async fn distinct_branches(pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT branch FROM payroll WHERE branch <> '' ORDER BY branch",
        )
        .fetch_all(pool)
        .await
        .context("failed to list branches")
    }

    /// Distinct position titles, blanks excluded.
    pub async fn distinct_positions(pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT position_title FROM payroll WHERE position_title <> '' ORDER BY position_title",
        )
        .fetch_all(pool)
        .await
        .context("failed to list positions")
    }

    /// Distinct status codes.
    pub async fn distinct_statuses(pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT status FROM payroll WHERE status <> '' ORDER BY status",
        )
        .fetch_all(pool)
        .await
        .context("failed to list statuses")
    }
}
