//! The remote calendar as seen by the reconciler.
//!
//! `RemoteCalendar` is the capability the core consumes; concrete providers
//! (e.g. Google Calendar) live in their own crates. `MemoryCalendar` is an
//! in-process implementation used by tests.

mod calendar;
mod event;
mod memory;
mod query;

pub use calendar::RemoteCalendar;
pub use event::{EventDraft, RemoteEvent, Transparency, Visibility};
pub use memory::{Call, MemoryCalendar};
pub use query::{ListQuery, OrderBy};
