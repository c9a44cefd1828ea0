//! Entity trait: identity that survives state changes.
//!
//! Items and change records are owned by the backend; the client only holds
//! snapshots. Two snapshots with the same id describe the same entity even when
//! their fields differ (e.g. before and after a relocation).

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Whether two snapshots describe the same entity.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
