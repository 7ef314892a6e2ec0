//! Filtering and grouped aggregation over a loaded dataset.

pub mod aggregate;
pub mod filter;

pub use aggregate::{GroupAverage, GroupBy, GroupKey, average_by};
pub use filter::{FilterCriteria, Selection};
