//! `caducados-core`: shared building blocks (ids, dates, errors).
//!
//! This crate contains **pure domain** primitives (no IO): identifiers, the
//! domain error type, and calendar-day handling for expiry dates.

pub mod calendar;
pub mod entity;
pub mod error;
pub mod id;

pub use calendar::{ExpiryStatus, StatusColor};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ChangeId, ItemId, ProductCode, SessionId, StoreId};
