//! Google Calendar provider for gcal-converger.
//!
//! Implements `converger_core::RemoteCalendar` over the Calendar REST API
//! and handles the OAuth credentials it needs:
//!   credentials.json  OAuth client downloaded from the Google Cloud console
//!   token.json        access/refresh token written by `authenticate`

mod authenticate;
mod client;
mod convert;
mod credentials;
mod session;
mod types;

pub use authenticate::{SCOPES, authenticate, consent_url};
pub use client::GoogleCalendar;
pub use credentials::Credentials;
pub use session::{Session, Token};
