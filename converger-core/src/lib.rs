//! Reconciliation core for gcal-converger.
//!
//! This crate decides which remote events to delete and which desired
//! events to insert so that a remote calendar matches a declared list:
//! - `event` parses and validates the desired events
//! - `filter` and `matcher` define which events take part and when two are equal
//! - `reconcile` plans and applies the writes through a `RemoteCalendar`

pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod matcher;
pub mod reconcile;
pub mod remote;

pub use config::ConvergeConfig;
pub use error::{ConvergeError, ConvergeResult};
pub use event::DesiredEvent;
pub use reconcile::{Action, Plan, Reconciler};
pub use remote::{EventDraft, RemoteCalendar, RemoteEvent};
