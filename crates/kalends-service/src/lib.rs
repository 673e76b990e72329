//! Recurrence expansion and cancellation engine for kalends.
//!
//! The engine answers two questions for an owner, in the owner's local
//! timezone: how many occurrences land on each day of a month, and which
//! occurrences (in start-time order) land on one day. Storage is reached
//! through the [`store::EventStore`] port.

pub mod calendar;
pub mod error;
pub mod store;
