//! Fetch-then-render state for one backend read.
//!
//! A [`Resource`] wraps an [`Endpoint`] and remembers the last good value and
//! the last failure. A failed load keeps the previous value so the view does
//! not go blank; switching endpoints starts over.

use async_trait::async_trait;
use tracing::{debug, warn};

use caducados_core::ProductCode;
use caducados_inventory::{ChangeRecord, InventoryItem, ModuleGrid};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::session::Session;

/// One backend read, scoped to the session's store.
#[async_trait]
pub trait Endpoint: Send + Sync {
    type Output: Send;

    /// Short label for logs.
    fn describe(&self) -> String;

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<Self::Output, ClientError>;
}

#[derive(Debug)]
pub struct Resource<E: Endpoint> {
    endpoint: E,
    data: Option<E::Output>,
    error: Option<String>,
}

impl<E: Endpoint> Resource<E> {
    pub fn new(endpoint: E) -> Self {
        Self {
            endpoint,
            data: None,
            error: None,
        }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Point at another endpoint. Drops whatever was loaded.
    pub fn set_endpoint(&mut self, endpoint: E) {
        self.endpoint = endpoint;
        self.data = None;
        self.error = None;
    }

    pub fn data(&self) -> Option<&E::Output> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<E::Output> {
        self.data
    }

    /// User-facing text of the last failed load, cleared by a good one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub async fn load(&mut self, backend: &dyn Backend, session: &Session) -> Result<&E::Output, ClientError> {
        debug!(endpoint = %self.endpoint.describe(), "loading");
        match self.endpoint.fetch(backend, session).await {
            Ok(value) => {
                self.error = None;
                Ok(self.data.insert(value))
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint.describe(), error = %e, "load failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn retry(&mut self, backend: &dyn Backend, session: &Session) -> Result<&E::Output, ClientError> {
        self.load(backend, session).await
    }
}

/// Items of one module, laid out as a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleItems {
    pub family: String,
    pub module: String,
}

#[async_trait]
impl Endpoint for ModuleItems {
    type Output = ModuleGrid;

    fn describe(&self) -> String {
        format!("module {}/{}", self.family, self.module)
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<ModuleGrid, ClientError> {
        let items = backend
            .module_items(session.store_id(), &self.family, &self.module)
            .await?;
        let grid = ModuleGrid::new(self.module.clone(), items);
        for hidden in grid.shadowed() {
            warn!(
                family = %self.family,
                module = %self.module,
                item_id = %hidden.id,
                cell = %hidden.cell(),
                "item hidden behind another on the same cell"
            );
        }
        Ok(grid)
    }
}

/// Items of one module as listed, including several on one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleItemList {
    pub family: String,
    pub module: String,
}

#[async_trait]
impl Endpoint for ModuleItemList {
    type Output = Vec<InventoryItem>;

    fn describe(&self) -> String {
        format!("items of module {}/{}", self.family, self.module)
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<Vec<InventoryItem>, ClientError> {
        backend
            .module_items(session.store_id(), &self.family, &self.module)
            .await
    }
}

/// Ordered module names of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames {
    pub family: String,
}

#[async_trait]
impl Endpoint for ModuleNames {
    type Output = Vec<String>;

    fn describe(&self) -> String {
        format!("modules of {}", self.family)
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<Vec<String>, ClientError> {
        backend.module_names(session.store_id(), &self.family).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemByProduct {
    pub code: ProductCode,
}

#[async_trait]
impl Endpoint for ItemByProduct {
    type Output = InventoryItem;

    fn describe(&self) -> String {
        format!("product {}", self.code)
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<InventoryItem, ClientError> {
        backend.item_by_product(session.store_id(), self.code).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyChangesToday {
    pub family: String,
}

#[async_trait]
impl Endpoint for FamilyChangesToday {
    type Output = Vec<ChangeRecord>;

    fn describe(&self) -> String {
        format!("today's changes of {}", self.family)
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<Vec<ChangeRecord>, ClientError> {
        backend.family_changes_today(session.store_id(), &self.family).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChangesToday;

#[async_trait]
impl Endpoint for StoreChangesToday {
    type Output = Vec<ChangeRecord>;

    fn describe(&self) -> String {
        "today's changes of the store".into()
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<Vec<ChangeRecord>, ClientError> {
        backend.store_changes_today(session.store_id()).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreItems;

#[async_trait]
impl Endpoint for StoreItems {
    type Output = Vec<InventoryItem>;

    fn describe(&self) -> String {
        "items of the store".into()
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<Vec<InventoryItem>, ClientError> {
        backend.store_items(session.store_id()).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyItems {
    pub family: String,
}

#[async_trait]
impl Endpoint for FamilyItems {
    type Output = Vec<InventoryItem>;

    fn describe(&self) -> String {
        format!("items of {}", self.family)
    }

    async fn fetch(&self, backend: &dyn Backend, session: &Session) -> Result<Vec<InventoryItem>, ClientError> {
        backend.family_items(session.store_id(), &self.family).await
    }
}
