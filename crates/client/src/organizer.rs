//! Placement editor: browse a family's modules and move or swap items.

use tracing::{info, warn};

use caducados_core::{DomainError, ItemId};
use caducados_inventory::{Cell, InventoryItem, ModuleGrid, PositionChange, Selection, TapOutcome};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::prompt::Prompter;
use crate::resource::{Endpoint, ModuleItems, ModuleNames, Resource};
use crate::session::Session;

/// Shown when the backend reports no modules for a family.
pub const DEFAULT_MODULE: &str = "Puerta 1";

/// Result of [`Organizer::tap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeOutcome {
    Ignored,
    Selected(ItemId),
    Cleared,
    /// The user said no. Selection kept, nothing sent.
    Declined,
    Moved,
    Swapped,
}

pub struct Organizer<'a> {
    backend: &'a dyn Backend,
    session: &'a Session,
    family: String,
    modules: Vec<String>,
    module_index: usize,
    grid: Resource<ModuleItems>,
    selection: Selection,
}

impl<'a> Organizer<'a> {
    /// Load the module list and the first module.
    pub async fn open(backend: &'a dyn Backend, session: &'a Session, family: &str) -> Result<Self, ClientError> {
        let names = ModuleNames {
            family: family.to_string(),
        }
        .fetch(backend, session)
        .await?;
        let modules = if names.is_empty() {
            vec![DEFAULT_MODULE.to_string()]
        } else {
            names
        };

        let mut organizer = Self {
            backend,
            session,
            family: family.to_string(),
            grid: Resource::new(ModuleItems {
                family: family.to_string(),
                module: modules[0].clone(),
            }),
            modules,
            module_index: 0,
            selection: Selection::default(),
        };
        organizer.refresh().await?;
        Ok(organizer)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn module(&self) -> &str {
        &self.modules[self.module_index]
    }

    pub fn grid(&self) -> Option<&ModuleGrid> {
        self.grid.data()
    }

    /// Alert text of the last failed load of the current module.
    pub fn load_error(&self) -> Option<&str> {
        self.grid.error()
    }

    pub fn selected(&self) -> Option<&InventoryItem> {
        self.selection.selected()
    }

    /// Refetch the current module. Any pending selection is dropped.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.selection.clear();
        self.grid.load(self.backend, self.session).await.map(|_| ())
    }

    /// Returns false when already on the last module.
    pub async fn next_module(&mut self) -> Result<bool, ClientError> {
        if self.module_index + 1 >= self.modules.len() {
            return Ok(false);
        }
        self.switch_to(self.module_index + 1).await.map(|_| true)
    }

    /// Returns false when already on the first module.
    pub async fn previous_module(&mut self) -> Result<bool, ClientError> {
        if self.module_index == 0 {
            return Ok(false);
        }
        self.switch_to(self.module_index - 1).await.map(|_| true)
    }

    pub async fn select_module(&mut self, name: &str) -> Result<(), ClientError> {
        let index = self
            .modules
            .iter()
            .position(|m| m == name)
            .ok_or_else(|| DomainError::validation(format!("unknown module {name:?} in {}", self.family)))?;
        if index == self.module_index && self.grid.is_loaded() {
            return Ok(());
        }
        self.switch_to(index).await
    }

    async fn switch_to(&mut self, index: usize) -> Result<(), ClientError> {
        self.module_index = index;
        self.grid.set_endpoint(ModuleItems {
            family: self.family.clone(),
            module: self.modules[index].clone(),
        });
        self.refresh().await
    }

    /// Tap a cell of the current module.
    ///
    /// A second tap on another cell proposes a move or swap; it is sent only
    /// after `prompter` confirms.
    pub async fn tap(&mut self, cell: Cell, prompter: &dyn Prompter) -> Result<OrganizeOutcome, ClientError> {
        let Some(grid) = self.grid.data() else {
            return Ok(OrganizeOutcome::Ignored);
        };
        match self.selection.tap(grid, cell) {
            TapOutcome::Ignored => Ok(OrganizeOutcome::Ignored),
            TapOutcome::Selected(id) => Ok(OrganizeOutcome::Selected(id)),
            TapOutcome::Cleared => Ok(OrganizeOutcome::Cleared),
            TapOutcome::Proposed(change) => {
                if !prompter.confirm(&change.confirmation_prompt()) {
                    info!(family = %self.family, module = %self.module(), "relocation declined");
                    return Ok(OrganizeOutcome::Declined);
                }
                self.execute(change).await
            }
        }
    }

    async fn execute(&mut self, change: PositionChange) -> Result<OrganizeOutcome, ClientError> {
        for relocation in change.relocations() {
            info!(
                item_id = %relocation.item_id,
                module = %relocation.to.module_name,
                row = relocation.to.row,
                column = relocation.to.column,
                "relocating"
            );
            if let Err(e) = self.backend.relocate(relocation.item_id, &relocation.to).await {
                warn!(item_id = %relocation.item_id, error = %e, "relocation failed");
                if let Err(refresh_err) = self.refresh().await {
                    warn!(error = %refresh_err, "refetch after failed relocation failed");
                }
                return Err(ClientError::RelocationFailed(Box::new(e)));
            }
        }

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "refetch after relocation failed");
        }
        info!(family = %self.family, module = %self.module(), "{}", change.success_message());
        Ok(if change.is_swap() {
            OrganizeOutcome::Swapped
        } else {
            OrganizeOutcome::Moved
        })
    }
}
