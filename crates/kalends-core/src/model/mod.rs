//! Calendar domain model.
//!
//! Definitions are stored as absolute instants; occurrences are computed on
//! demand in the owner's local calendar and never persisted.

mod candidate;
mod event;
mod occurrence;
mod profile;
mod recurrence;

pub use candidate::CandidateQuery;
pub use event::{CancellationRecord, EventDefinition, EventId, NewEventDefinition};
pub use occurrence::{DueOccurrence, Occurrence};
pub use profile::{OwnerId, OwnerProfile};
pub use recurrence::{DayOfMonth, MonthOfYear, RecurrenceKind, RecurrenceLabel, WeekdayIndex};
