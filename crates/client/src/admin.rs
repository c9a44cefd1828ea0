//! Item administration: add, edit and remove tracked products.

use tracing::info;

use caducados_core::{DomainError, ItemId, ProductCode};
use caducados_inventory::{ItemPatch, ItemPatchForm, NewItem};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::prompt::Prompter;
use crate::resource::{ItemByProduct, Resource};
use crate::session::Session;

/// Create an item in the session's store.
pub async fn add_item(backend: &dyn Backend, session: &Session, item: &NewItem) -> Result<(), ClientError> {
    if item.store_id != session.store_id() {
        return Err(DomainError::validation(format!(
            "item belongs to store {}, logged in as {}",
            item.store_id,
            session.store_id()
        ))
        .into());
    }
    item.validate()?;
    backend.create_item(item).await?;
    info!(store_id = %item.store_id, product = %item.product_code, module = %item.module_name, "item added");
    Ok(())
}

/// Partially update an item. Blank form fields are left as they are.
pub async fn edit_item(backend: &dyn Backend, id: ItemId, form: &ItemPatchForm) -> Result<ItemPatch, ClientError> {
    let patch = ItemPatch::from_form(form)?;
    backend.edit_item(id, &patch).await?;
    info!(item_id = %id, "item edited");
    Ok(patch)
}

/// Remove the item tracking `code`, after confirmation.
pub async fn remove_item(
    backend: &dyn Backend,
    session: &Session,
    code: ProductCode,
    prompter: &dyn Prompter,
) -> Result<ItemId, ClientError> {
    if !prompter.confirm(&format!("Delete product {code}?")) {
        return Err(ClientError::Cancelled);
    }
    let mut product = Resource::new(ItemByProduct { code });
    let id = product.load(backend, session).await?.id;
    backend.delete_item(id).await?;
    info!(item_id = %id, product = %code, "item removed");
    Ok(id)
}
