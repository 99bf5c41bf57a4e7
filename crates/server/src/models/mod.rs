//! Data models.

mod payroll;

pub use payroll::{PayrollItem, PayrollRow};
