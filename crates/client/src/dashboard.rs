//! Home-screen counters.

use tracing::warn;

use caducados_core::calendar;
use caducados_inventory::StatusCounts;

use crate::backend::Backend;
use crate::error::ClientError;
use crate::resource::{FamilyChangesToday, FamilyItems, Resource, StoreItems};
use crate::session::Session;

/// Families shown on the home screen when none are given.
pub const DEFAULT_FAMILIES: [&str; 5] = [
    "Lácteos Mural",
    "Leche Muralita",
    "Platos Preparados Refrigerados Mural",
    "Zumo Muralita",
    "Charcutería",
];

pub async fn store_counts(backend: &dyn Backend, session: &Session) -> Result<StatusCounts, ClientError> {
    let mut items = Resource::new(StoreItems);
    let loaded = items.load(backend, session).await?;
    Ok(StatusCounts::from_items(loaded, calendar::today()))
}

/// Counts per family. A family that fails to load counts as zero.
pub async fn family_counts(backend: &dyn Backend, session: &Session, families: &[String]) -> Vec<(String, StatusCounts)> {
    let today = calendar::today();
    let mut out = Vec::with_capacity(families.len());
    for family in families {
        let mut items = Resource::new(FamilyItems {
            family: family.clone(),
        });
        let counts = match items.load(backend, session).await {
            Ok(loaded) => StatusCounts::from_items(loaded, today),
            Err(e) => {
                warn!(family = %family, error = %e, "family counts unavailable");
                StatusCounts::default()
            }
        };
        out.push((family.clone(), counts));
    }
    out
}

/// Number of today's changes per family. A failed family counts as zero.
pub async fn family_change_counts(backend: &dyn Backend, session: &Session, families: &[String]) -> Vec<(String, usize)> {
    let mut out = Vec::with_capacity(families.len());
    for family in families {
        let mut changes = Resource::new(FamilyChangesToday {
            family: family.clone(),
        });
        let count = match changes.load(backend, session).await {
            Ok(records) => records.len(),
            Err(e) => {
                warn!(family = %family, error = %e, "change count unavailable");
                0
            }
        };
        out.push((family.clone(), count));
    }
    out
}
