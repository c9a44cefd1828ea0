//! Daily reconciliation walk over one family's changes.

use tracing::info;

use caducados_inventory::{ChangeRecord, ReconciliationSession, ReviewProgress};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::resource::{FamilyChangesToday, Resource};
use crate::session::Session;

pub struct Reviewer<'a> {
    backend: &'a dyn Backend,
    family: String,
    walk: ReconciliationSession,
}

impl<'a> Reviewer<'a> {
    pub async fn open(backend: &'a dyn Backend, session: &Session, family: &str) -> Result<Self, ClientError> {
        let mut changes = Resource::new(FamilyChangesToday {
            family: family.to_string(),
        });
        changes.load(backend, session).await?;
        let records = changes.into_data().unwrap_or_default();
        info!(family, records = records.len(), "review opened");
        Ok(Self {
            backend,
            family: family.to_string(),
            walk: ReconciliationSession::new(records),
        })
    }

    pub fn current(&self) -> Option<&ChangeRecord> {
        self.walk.current()
    }

    pub fn progress(&self) -> ReviewProgress {
        self.walk.progress()
    }

    pub fn records(&self) -> &[ChangeRecord] {
        self.walk.records()
    }

    /// Reconcile the current record if needed, then move on.
    ///
    /// If the reconcile call fails the walk stays on the same record.
    pub async fn advance(&mut self) -> Result<ReviewProgress, ClientError> {
        if let Some(id) = self.walk.pending_reconcile() {
            self.backend.reconcile(id).await?;
            self.walk.mark_reconciled(id);
            info!(family = %self.family, change_id = %id, "change reconciled");
        }
        Ok(self.walk.step())
    }

    /// Move on without reconciling.
    pub fn skip(&mut self) -> ReviewProgress {
        self.walk.step()
    }
}
