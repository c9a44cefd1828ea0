//! Withdrawal worklist: every item of a family whose withdrawal date has passed.
//!
//! Items are walked in shelf order (module, then row, snaking across columns)
//! so staff can sweep a module without doubling back.

use core::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use caducados_core::ExpiryStatus;

use crate::item::InventoryItem;

/// Shelf order: module position, row ascending, odd rows left to right and
/// even rows right to left. Modules missing from `rank` sort last.
fn shelf_order(rank: &HashMap<&str, usize>, a: &InventoryItem, b: &InventoryItem) -> Ordering {
    let ma = rank.get(a.module_name.as_str()).copied().unwrap_or(usize::MAX);
    let mb = rank.get(b.module_name.as_str()).copied().unwrap_or(usize::MAX);
    ma.cmp(&mb).then(a.row.cmp(&b.row)).then_with(|| {
        if a.row % 2 == 1 {
            a.column.cmp(&b.column)
        } else {
            b.column.cmp(&a.column)
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalWorklist {
    items: Vec<InventoryItem>,
    index: usize,
}

impl WithdrawalWorklist {
    /// Keep overdue items (withdrawal strictly before `today`) in shelf order.
    pub fn new(modules: &[String], items: Vec<InventoryItem>, today: NaiveDate) -> Self {
        let rank: HashMap<&str, usize> = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.as_str(), i))
            .collect();
        let mut items: Vec<InventoryItem> = items
            .into_iter()
            .filter(|item| item.withdrawal_status(today) == ExpiryStatus::Overdue)
            .collect();
        items.sort_by(|a, b| shelf_order(&rank, a, b));
        Self { items, index: 0 }
    }

    pub fn current(&self) -> Option<&InventoryItem> {
        self.items.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Nothing left to handle.
    pub fn is_complete(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based position of the current item and the total, `(0, 0)` when done.
    pub fn position(&self) -> (usize, usize) {
        if self.items.is_empty() {
            (0, 0)
        } else {
            (self.index + 1, self.items.len())
        }
    }

    /// Drop the current item (handled or skipped). The next one slides into place.
    pub fn remove_current(&mut self) -> Option<InventoryItem> {
        if self.index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(self.index);
        self.index = self.index.min(self.items.len().saturating_sub(1));
        Some(removed)
    }
}
