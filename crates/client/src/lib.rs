//! Caducados client.
//!
//! Talks to the inventory backend over REST and drives the store workflows:
//! expiry edits, shelf placement, daily reconciliation, withdrawals and the
//! end-of-day summary. All business rules live in `caducados-inventory`;
//! this crate sequences the calls and keeps the per-screen state.

pub mod admin;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod organizer;
pub mod prompt;
pub mod resource;
pub mod review;
pub mod session;
pub mod withdrawal;

pub use backend::{Backend, HttpBackend};
pub use config::ClientConfig;
pub use error::ClientError;
pub use organizer::{OrganizeOutcome, Organizer};
pub use prompt::{AutoAnswer, Prompter};
pub use resource::{Endpoint, Resource};
pub use review::Reviewer;
pub use session::Session;
pub use withdrawal::{ExpiryEditor, WithdrawalRound};
