//! Converging a remote calendar onto the desired events.

mod action;
mod plan;
mod reconciler;

pub use action::Action;
pub use plan::{Plan, diff};
pub use reconciler::Reconciler;
