//! Inventory domain module.
//!
//! Business rules for tracked product slots, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage): wire shapes,
//! withdrawal derivation, the module grid and the review walks.

pub mod change;
pub mod grid;
pub mod item;
pub mod review;
pub mod summary;
pub mod withdrawal;
pub mod worklist;

pub use change::{ChangeRecord, ChangeState, ReconcileRequest};
pub use grid::{GridRow, ModuleGrid, PositionChange, Relocation, Selection, TapOutcome};
pub use item::{
    Cell, ExpiryUpdate, InventoryItem, ItemPatch, ItemPatchForm, NewItem, Position,
    PRODUCT_IMAGE_PREFIX,
};
pub use review::{ReconciliationSession, ReviewProgress};
pub use summary::{FamilyGroup, StatusCounts, UNASSIGNED_FAMILY, group_by_family};
pub use withdrawal::{ExpiryDraft, WithdrawalView, effective_shelf_life, preview, withdrawal_date};
pub use worklist::WithdrawalWorklist;
