//! Uniform response envelope for list endpoints.
//!
//! Every successful list response carries `{ success, data, pagination }`;
//! failures are shaped in one place (`error.rs`) as `{ success, error }`.

use serde::Serialize;

/// Pagination metadata attached to every page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub page_size: u64,
    /// Count of all records matching the filter, independent of paging.
    pub total: u64,
    pub total_pages: u64,
    /// Set only when the derived-filter candidate cap was exceeded and the
    /// totals reflect a truncated candidate set.
    #[serde(skip_serializing_if = "is_false")]
    pub truncated: bool,
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Successful page envelope.
#[derive(Debug, Clone, Serialize)]
pub struct PageEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> PageEnvelope<T> {
    /// Assemble a page plus its pagination metadata.
    pub fn assemble(data: Vec<T>, total: u64, page: u64, page_size: u64, truncated: bool) -> Self {
        let total_pages = total.div_ceil(page_size.max(1));
        Self {
            success: true,
            data,
            pagination: PageMeta {
                page,
                page_size,
                total,
                total_pages,
                truncated,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let envelope = PageEnvelope::assemble(vec![1, 2, 3], 25, 1, 10, false);
        assert_eq!(envelope.pagination.total_pages, 3);

        let exact = PageEnvelope::assemble(vec![1], 30, 1, 10, false);
        assert_eq!(exact.pagination.total_pages, 3);

        let empty: PageEnvelope<i32> = PageEnvelope::assemble(vec![], 0, 1, 10, false);
        assert_eq!(empty.pagination.total_pages, 0);
    }

    #[test]
    fn envelope_shape() {
        let envelope = PageEnvelope::assemble(vec!["a"], 1, 1, 10, false);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["pagination"]["pageSize"], 10);
        assert_eq!(json["pagination"]["totalPages"], 1);
        // Not truncated: the flag stays out of the body entirely.
        assert!(json["pagination"].get("truncated").is_none());
    }

    #[test]
    fn truncated_flag_appears_when_set() {
        let envelope = PageEnvelope::assemble(vec!["a"], 1, 1, 10, true);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["pagination"]["truncated"], true);
    }
}
