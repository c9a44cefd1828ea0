//! Counters and the end-of-day change summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caducados_core::ExpiryStatus;

use crate::change::ChangeRecord;
use crate::item::InventoryItem;

/// Group label for change records that carry no family.
pub const UNASSIGNED_FAMILY: &str = "Sin familia";

/// How many items must come off the shelf.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Withdrawal date already passed.
    pub overdue: usize,
    /// Withdrawal date is today.
    pub due_today: usize,
}

impl StatusCounts {
    /// Items without a readable withdrawal date are not counted.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a InventoryItem>, today: NaiveDate) -> Self {
        items
            .into_iter()
            .fold(StatusCounts::default(), |mut acc, item| {
                match item.withdrawal_status(today) {
                    ExpiryStatus::Overdue => acc.overdue += 1,
                    ExpiryStatus::DueToday => acc.due_today += 1,
                    ExpiryStatus::Future | ExpiryStatus::Unknown => {}
                }
                acc
            })
    }
}

/// Today's changes of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyGroup {
    pub family: String,
    pub records: Vec<ChangeRecord>,
}

impl FamilyGroup {
    pub fn reconciled(&self) -> usize {
        self.records.iter().filter(|r| r.is_reconciled()).count()
    }
}

/// Group records by family, families sorted by name, records in arrival order.
pub fn group_by_family(records: impl IntoIterator<Item = ChangeRecord>) -> Vec<FamilyGroup> {
    let mut groups: Vec<FamilyGroup> = Vec::new();
    for record in records {
        let family = match record.family.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => UNASSIGNED_FAMILY.to_string(),
        };
        match groups.iter_mut().find(|g| g.family == family) {
            Some(group) => group.records.push(record),
            None => groups.push(FamilyGroup {
                family,
                records: vec![record],
            }),
        }
    }
    groups.sort_by(|a, b| a.family.cmp(&b.family));
    groups
}
