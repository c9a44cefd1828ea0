//! Daily reconciliation: a linear walk over today's change records of a family.
//!
//! The walk is split in two halves so it stays free of IO. The caller asks
//! [`ReconciliationSession::pending_reconcile`] whether the current record needs
//! the backend call, performs it, then reports back with
//! [`ReconciliationSession::mark_reconciled`] and moves on with
//! [`ReconciliationSession::step`].

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use caducados_core::ChangeId;

use crate::change::ChangeRecord;

/// Where the walk stands after a step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ReviewProgress {
    /// Showing record `index` (0-based) of `total`.
    Browsing { index: usize, total: usize },
    /// Walked past the last record.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationSession {
    records: Vec<ChangeRecord>,
    index: usize,
}

impl ReconciliationSession {
    /// Order records most recent first. The order is fixed for the session.
    ///
    /// Records without a readable timestamp go last, in the order received.
    pub fn new(mut records: Vec<ChangeRecord>) -> Self {
        records.sort_by(|a, b| match (a.changed_instant(), b.changed_instant()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Self { records, index: 0 }
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn current(&self) -> Option<&ChangeRecord> {
        self.records.get(self.index)
    }

    pub fn progress(&self) -> ReviewProgress {
        if self.index < self.records.len() {
            ReviewProgress::Browsing {
                index: self.index,
                total: self.records.len(),
            }
        } else {
            ReviewProgress::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress() == ReviewProgress::Complete
    }

    /// The record that must be reconciled before advancing, if any.
    pub fn pending_reconcile(&self) -> Option<ChangeId> {
        self.current().filter(|r| !r.is_reconciled()).map(|r| r.id)
    }

    /// Record a successful reconcile call. Returns false for unknown ids.
    pub fn mark_reconciled(&mut self, id: ChangeId) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.mark_reconciled();
                true
            }
            None => false,
        }
    }

    /// Move to the next record without touching the current one.
    pub fn step(&mut self) -> ReviewProgress {
        if self.index < self.records.len() {
            self.index += 1;
        }
        self.progress()
    }

    /// Number of records still pending.
    pub fn remaining(&self) -> usize {
        self.records.iter().filter(|r| !r.is_reconciled()).count()
    }
}
