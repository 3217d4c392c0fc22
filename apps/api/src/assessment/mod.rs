//! Assessment engines: aptitude (section-weighted percentages) and IQ
//! (timed, auto-advancing, percentile-style scale mapping).
//!
//! Sessions are pure in-memory state machines; handlers own persistence and
//! the countdown driver. Before a session exists the user is implicitly in
//! the idle/generating phases; a session row is only created once the
//! generation call has succeeded, so a failed generation leaves any prior
//! session untouched.

use serde::Serialize;

pub mod answers;
pub mod aptitude;
pub mod handlers;
pub mod iq;
pub mod store;
pub mod timer;

/// Lifecycle phase of a live session. Results and review are both served
/// from `Submitted`; they are mutually navigable without state loss until a
/// fresh start discards the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InProgress,
    Submitted,
}
