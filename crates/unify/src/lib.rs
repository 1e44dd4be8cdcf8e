//! Compiles [`braille_profile::ProfileRecord`] input into the four unified
//! lookup tables the matching core runs against: the single-cell table,
//! the numeric table, the indicator list, and the multi-cell list.
//!
//! This is computed once at startup and is immutable thereafter — the
//! profile corpus is authored data, not runtime state. See `spec.md` §4.2.

mod compiler;
mod entries;
mod role;

pub use compiler::{unify, DiscardReason, UnifyReport};
pub use entries::{Indicator, MultiCellEntry, SingleCellMapping, UnifiedSingleCellEntry, UnifiedTables};
pub use role::RoleClass;
