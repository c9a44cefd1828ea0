//! Expiry editing: the single-product editor and the overdue worklist.

use chrono::NaiveDate;
use tracing::{info, warn};

use caducados_core::{ProductCode, calendar};
use caducados_inventory::{ExpiryDraft, InventoryItem, WithdrawalView, WithdrawalWorklist};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::resource::{Endpoint, ItemByProduct, ModuleItemList, ModuleNames, Resource};
use crate::session::Session;

/// Edit one product's expiry with a live withdrawal preview.
pub struct ExpiryEditor<'a> {
    backend: &'a dyn Backend,
    item: InventoryItem,
    draft: ExpiryDraft,
}

impl<'a> ExpiryEditor<'a> {
    pub async fn open(backend: &'a dyn Backend, session: &Session, code: ProductCode) -> Result<Self, ClientError> {
        let mut product = Resource::new(ItemByProduct { code });
        product.load(backend, session).await?;
        let item = product
            .into_data()
            .ok_or_else(|| ClientError::NotFound(format!("Product {code}")))?;
        let draft = ExpiryDraft::for_item(&item, calendar::today());
        Ok(Self { backend, item, draft })
    }

    pub fn item(&self) -> &InventoryItem {
        &self.item
    }

    pub fn draft(&self) -> &ExpiryDraft {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft.set(text);
    }

    pub fn shift_days(&mut self, days: i64) {
        self.draft.shift_days(days, calendar::today());
    }

    pub fn preview(&self, today: NaiveDate) -> WithdrawalView {
        self.draft.preview(&self.item, today)
    }

    /// Send the draft. Nothing is sent unless it is a valid date.
    pub async fn save(&mut self) -> Result<(), ClientError> {
        let update = self.draft.to_update()?;
        self.backend.update_expiry(self.item.id, &update).await?;
        info!(item_id = %self.item.id, expiry = %update.expiry_date, "expiry updated");
        self.item.expiry_date = Some(update.expiry_date);
        Ok(())
    }
}

/// Walk every overdue item of a family and set a new expiry for each.
pub struct WithdrawalRound<'a> {
    backend: &'a dyn Backend,
    family: String,
    list: WithdrawalWorklist,
    draft: Option<ExpiryDraft>,
}

impl<'a> WithdrawalRound<'a> {
    /// Load all modules of `family`. Modules that fail to load are left out.
    pub async fn open(backend: &'a dyn Backend, session: &Session, family: &str) -> Result<Self, ClientError> {
        let modules = ModuleNames {
            family: family.to_string(),
        }
        .fetch(backend, session)
        .await?;

        let mut items = Vec::new();
        for module in &modules {
            let mut listing = Resource::new(ModuleItemList {
                family: family.to_string(),
                module: module.clone(),
            });
            match listing.load(backend, session).await {
                Ok(loaded) => items.extend(loaded.iter().cloned()),
                Err(e) => warn!(family, module = %module, error = %e, "module skipped"),
            }
        }

        let today = calendar::today();
        let list = WithdrawalWorklist::new(&modules, items, today);
        info!(family, overdue = list.len(), "withdrawal round opened");
        let mut round = Self {
            backend,
            family: family.to_string(),
            list,
            draft: None,
        };
        round.reset_draft(today);
        Ok(round)
    }

    fn reset_draft(&mut self, today: NaiveDate) {
        self.draft = self.list.current().map(|item| ExpiryDraft::for_item(item, today));
    }

    pub fn current(&self) -> Option<&InventoryItem> {
        self.list.current()
    }

    pub fn draft(&self) -> Option<&ExpiryDraft> {
        self.draft.as_ref()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(draft) = &mut self.draft {
            draft.set(text);
        }
    }

    pub fn preview(&self, today: NaiveDate) -> Option<WithdrawalView> {
        match (self.list.current(), &self.draft) {
            (Some(item), Some(draft)) => Some(draft.preview(item, today)),
            _ => None,
        }
    }

    /// 1-based position and total, `(0, 0)` once done.
    pub fn position(&self) -> (usize, usize) {
        self.list.position()
    }

    pub fn is_complete(&self) -> bool {
        self.list.is_complete()
    }

    /// Save the draft for the current item and drop it from the list.
    pub async fn confirm_current(&mut self) -> Result<(), ClientError> {
        let (Some(item), Some(draft)) = (self.list.current(), &self.draft) else {
            return Ok(());
        };
        let update = draft.to_update()?;
        let id = item.id;
        self.backend.update_expiry(id, &update).await?;
        info!(family = %self.family, item_id = %id, expiry = %update.expiry_date, "withdrawn item restocked");
        self.list.remove_current();
        self.reset_draft(calendar::today());
        Ok(())
    }

    /// Drop the current item without any call.
    pub fn skip_current(&mut self) {
        if let Some(item) = self.list.remove_current() {
            info!(family = %self.family, item_id = %item.id, "withdrawal skipped");
        }
        self.reset_draft(calendar::today());
    }
}
