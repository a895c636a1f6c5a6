//! The ledger keeps every week of logged work.
//!  The basic idea is:
//!   - Weeks are identified by the Monday they start on.
//!   - Only the last week is current. New weeks are appended by [rollover::ensure_current_week].
//!   - Tasks are only ever appended; their hours can be edited while their week is current.

pub mod entities;
pub mod hours;
pub mod rollover;
pub mod summary;
pub mod tasks;
