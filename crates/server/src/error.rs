//! Application error types and the public failure envelope.
//!
//! This is the single place where propagated failures become the
//! `{ success: false, error }` response shape. Messages stay in a small
//! stable set; full detail is logged server-side only.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Classify an engine failure, preserving the data-access category when
    /// a database error is anywhere in the chain.
    pub fn from_engine(err: anyhow::Error) -> Self {
        match err.downcast::<sqlx::Error>() {
            Ok(db) => AppError::Database(db),
            Err(err) => AppError::Internal(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        // Log the detail, return the stable category.
        match &self {
            AppError::Internal(e) => tracing::error!(error = %e, "internal error"),
            AppError::Database(e) => tracing::error!(error = %e, "database error"),
            AppError::NotFound => {}
        }

        let body = json!({ "success": false, "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_keep_the_database_category() {
        let db_err = anyhow::Error::from(sqlx::Error::PoolClosed).context("failed to count");
        assert!(matches!(
            AppError::from_engine(db_err),
            AppError::Database(_)
        ));

        let other = anyhow::anyhow!("something else");
        assert!(matches!(AppError::from_engine(other), AppError::Internal(_)));
    }

    #[test]
    fn messages_are_stable_categories() {
        assert_eq!(AppError::NotFound.to_string(), "not found");
        assert_eq!(
            AppError::Database(sqlx::Error::PoolClosed).to_string(),
            "database error"
        );
    }
}
