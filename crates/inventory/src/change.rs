use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use caducados_core::calendar;
use caducados_core::{ChangeId, Entity, ItemId, ProductCode, StoreId};

use crate::item::image_path;
use crate::withdrawal::{WithdrawalView, withdrawal_date};

/// Reconciliation state of a change record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeState {
    Pending,
    /// Terminal.
    Reconciled,
}

/// Log entry written by the backend whenever an expiry date is edited.
///
/// The client only ever reads these and flips `reconciled` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: ChangeId,
    #[serde(rename = "tornilloId", default)]
    pub item_id: Option<ItemId>,
    #[serde(rename = "productoCodigo")]
    pub product_code: ProductCode,
    #[serde(rename = "tiendaId")]
    pub store_id: StoreId,
    #[serde(rename = "familia", default)]
    pub family: Option<String>,
    #[serde(rename = "nombreModulo", default)]
    pub module_name: Option<String>,
    #[serde(rename = "fila", default)]
    pub row: Option<u32>,
    #[serde(rename = "columna", default)]
    pub column: Option<u32>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "imagenUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "fechaAnterior", default)]
    pub previous_date: Option<String>,
    #[serde(rename = "fechaNueva", default)]
    pub new_date: Option<String>,
    #[serde(rename = "fechaCambio", default)]
    pub changed_at: Option<String>,
    #[serde(rename = "caducidadDias", default)]
    pub shelf_life_days: Option<u32>,
    #[serde(rename = "contrastado", default)]
    pub reconciled: Option<bool>,
}

impl ChangeRecord {
    pub fn state(&self) -> ChangeState {
        if self.reconciled.unwrap_or(false) {
            ChangeState::Reconciled
        } else {
            ChangeState::Pending
        }
    }

    pub fn is_reconciled(&self) -> bool {
        self.state() == ChangeState::Reconciled
    }

    /// Flip to reconciled. Never goes back.
    pub fn mark_reconciled(&mut self) {
        self.reconciled = Some(true);
    }

    /// Moment of the change, when the backend sent a readable timestamp.
    ///
    /// Timestamps with an offset are normalised to UTC; bare ones are taken as is.
    pub fn changed_instant(&self) -> Option<NaiveDateTime> {
        let raw = self.changed_at.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    pub fn previous_expiry(&self) -> Option<NaiveDate> {
        self.previous_date.as_deref().and_then(calendar::parse_wire_date)
    }

    pub fn new_expiry(&self) -> Option<NaiveDate> {
        self.new_date.as_deref().and_then(calendar::parse_wire_date)
    }

    /// Withdrawal day implied by the expiry date before the change.
    pub fn withdrawal_before(&self, today: NaiveDate) -> WithdrawalView {
        self.derived_withdrawal(self.previous_expiry(), today)
    }

    /// Withdrawal day implied by the expiry date after the change.
    pub fn withdrawal_after(&self, today: NaiveDate) -> WithdrawalView {
        self.derived_withdrawal(self.new_expiry(), today)
    }

    fn derived_withdrawal(&self, expiry: Option<NaiveDate>, today: NaiveDate) -> WithdrawalView {
        let date = match (expiry, self.shelf_life_days) {
            (Some(expiry), Some(days)) => withdrawal_date(expiry, days),
            _ => None,
        };
        WithdrawalView::new(date, today)
    }

    pub fn label(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.product_code.to_string(),
        }
    }

    pub fn image_path(&self) -> String {
        image_path(self.image_url.as_deref(), self.product_code)
    }
}

impl Entity for ChangeRecord {
    type Id = ChangeId;

    fn id(&self) -> ChangeId {
        self.id
    }
}

/// Body of the reconcile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileRequest {
    #[serde(rename = "contrastado")]
    pub reconciled: bool,
}

impl Default for ReconcileRequest {
    fn default() -> Self {
        Self { reconciled: true }
    }
}
