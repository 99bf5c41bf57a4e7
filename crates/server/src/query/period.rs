//! Period filter normalization.
//!
//! The `period` request parameter arrives in three textual shapes that all
//! mean "pay cycle": a year-month bucket (`2024-10`), an exact date
//! (`2024-10-15`), or a legacy free-form label. All format sniffing lives
//! here; callers only ever see the normalized [`PeriodFilter`].

use chrono::{Months, NaiveDate};

/// Normalized form of a period filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodFilter {
    /// Half-open range covering one calendar month: `start <= period < end`.
    MonthRange { start: NaiveDate, end: NaiveDate },
    /// Equality against a canonical ISO date.
    ExactDate(NaiveDate),
    /// Equality against the raw stored period string (legacy labels).
    Label(String),
    /// Blank input; no predicate at all.
    Empty,
}

/// Normalize a raw period value, trying the supported shapes in priority
/// order: year-month bucket, exact date, opaque label.
pub fn normalize(raw: &str) -> PeriodFilter {
    let value = raw.trim();
    if value.is_empty() {
        return PeriodFilter::Empty;
    }

    if let Some(start) = parse_year_month(value) {
        // Upper bound by calendar month increment. Appending "-01" to an
        // incremented string would mishandle December and invalid months.
        if let Some(end) = start.checked_add_months(Months::new(1)) {
            return PeriodFilter::MonthRange { start, end };
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return PeriodFilter::ExactDate(date);
    }

    PeriodFilter::Label(value.to_string())
}

/// Parse a strict `YYYY-MM` bucket into the first day of that month.
fn parse_year_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

impl PeriodFilter {
    /// Whether a stored period code satisfies this filter.
    ///
    /// The SQL predicates in the executor implement the same comparison;
    /// this form exists for in-memory evaluation and tests. Range matching
    /// relies on ISO dates comparing lexicographically, so legacy labels
    /// never fall inside a month range.
    pub fn matches(&self, stored: &str) -> bool {
        match self {
            PeriodFilter::MonthRange { start, end } => {
                let start = iso(*start);
                let end = iso(*end);
                stored >= start.as_str() && stored < end.as_str()
            }
            PeriodFilter::ExactDate(date) => stored == iso(*date),
            PeriodFilter::Label(label) => stored == label,
            PeriodFilter::Empty => true,
        }
    }
}

/// Canonical ISO rendering used for all period comparisons.
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn year_month_produces_calendar_range() {
        let filter = normalize("2024-10");
        assert_eq!(
            filter,
            PeriodFilter::MonthRange {
                start: date(2024, 10, 1),
                end: date(2024, 11, 1),
            }
        );
    }

    #[test]
    fn december_rolls_over_to_january() {
        let filter = normalize("2024-12");
        assert_eq!(
            filter,
            PeriodFilter::MonthRange {
                start: date(2024, 12, 1),
                end: date(2025, 1, 1),
            }
        );
    }

    #[test]
    fn month_range_includes_month_end() {
        let filter = normalize("2024-10");
        assert!(filter.matches("2024-10-01"));
        assert!(filter.matches("2024-10-31"));
        assert!(!filter.matches("2024-09-30"));
        assert!(!filter.matches("2024-11-01"));
    }

    #[test]
    fn exact_date_is_equality() {
        let filter = normalize("2024-10-15");
        assert_eq!(filter, PeriodFilter::ExactDate(date(2024, 10, 15)));
        assert!(filter.matches("2024-10-15"));
        assert!(!filter.matches("2024-10-16"));
    }

    #[test]
    fn canonical_date_normalizes_to_itself() {
        match normalize("2024-10-15") {
            PeriodFilter::ExactDate(d) => assert_eq!(iso(d), "2024-10-15"),
            other => panic!("expected ExactDate, got {other:?}"),
        }
    }

    #[test]
    fn non_date_values_become_labels() {
        assert_eq!(
            normalize("QUINCENA 19"),
            PeriodFilter::Label("QUINCENA 19".to_string())
        );
        // An out-of-range month is not a bucket and not a date.
        assert_eq!(
            normalize("2024-13"),
            PeriodFilter::Label("2024-13".to_string())
        );
    }

    #[test]
    fn labels_never_match_month_ranges() {
        let filter = normalize("2024-10");
        assert!(!filter.matches("QUINCENA 19"));
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(normalize(""), PeriodFilter::Empty);
        assert_eq!(normalize("   "), PeriodFilter::Empty);
        assert!(normalize("").matches("anything"));
    }

    #[test]
    fn strict_bucket_shape() {
        // Wrong widths fall through to label, not to a bucket guess.
        assert_eq!(
            normalize("2024-1"),
            PeriodFilter::Label("2024-1".to_string())
        );
        assert_eq!(normalize("24-10"), PeriodFilter::Label("24-10".to_string()));
    }
}
