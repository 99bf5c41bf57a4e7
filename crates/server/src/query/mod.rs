//! Payroll listing query engine.
//!
//! This module provides:
//! - columns: the public-key → storage-column allow-list
//! - period: normalization of the period filter's textual shapes
//! - category: derived job-category classification
//! - FilterSpec / SortSpec: compiled, parameterized query specifications
//! - QueryExecutor: direct and derived-filter pagination paths

pub mod category;
pub mod columns;
pub mod period;

mod executor;
mod filter;
mod sort;

pub use executor::{
    CANDIDATE_CAP, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PageResult, QueryExecutor,
    Summary, paginate_candidates,
};
pub use filter::{FilterCriteria, FilterSpec, Predicate};
pub use sort::{DEFAULT_SORT_KEY, SortDirection, SortSpec};
