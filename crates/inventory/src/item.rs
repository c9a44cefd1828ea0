use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caducados_core::calendar::{self, ExpiryStatus};
use caducados_core::{DomainError, DomainResult, Entity, ItemId, ProductCode, StoreId};

/// Path under which product images are served when an item has no explicit url.
pub const PRODUCT_IMAGE_PREFIX: &str = "/images/productos";

/// A tracked product slot ("tornillo") as served by the backend.
///
/// Dates are kept as received: the backend may send `YYYY-MM-DD`, a full
/// timestamp, or garbage. Accessors parse leniently and never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    #[serde(rename = "tiendaId")]
    pub store_id: StoreId,
    #[serde(rename = "productoCodigo")]
    pub product_code: ProductCode,
    #[serde(rename = "familia", default)]
    pub family: Option<String>,
    #[serde(rename = "nombreModulo")]
    pub module_name: String,
    #[serde(rename = "fila")]
    pub row: u32,
    #[serde(rename = "columna")]
    pub column: u32,
    #[serde(rename = "fechaCaducidad", default)]
    pub expiry_date: Option<String>,
    #[serde(rename = "fechaRetirada", default)]
    pub withdrawal_date: Option<String>,
    #[serde(rename = "caducidadDias", default)]
    pub shelf_life_days: Option<u32>,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "imagenUrl", default)]
    pub image_url: Option<String>,
}

impl InventoryItem {
    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry_date.as_deref().and_then(calendar::parse_wire_date)
    }

    /// Withdrawal date as supplied by the backend.
    pub fn withdrawal(&self) -> Option<NaiveDate> {
        self.withdrawal_date.as_deref().and_then(calendar::parse_wire_date)
    }

    pub fn withdrawal_status(&self, today: NaiveDate) -> ExpiryStatus {
        calendar::classify(self.withdrawal(), today)
    }

    pub fn position(&self) -> Position {
        Position {
            module_name: self.module_name.clone(),
            row: self.row,
            column: self.column,
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.row, self.column)
    }

    /// Human label used in confirmations: the name, or the product code.
    pub fn label(&self) -> String {
        if self.name.trim().is_empty() {
            self.product_code.to_string()
        } else {
            self.name.clone()
        }
    }

    /// Image path relative to the backend base url.
    pub fn image_path(&self) -> String {
        image_path(self.image_url.as_deref(), self.product_code)
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

pub(crate) fn image_path(explicit: Option<&str>, code: ProductCode) -> String {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(url) => url.to_string(),
        None => format!("{PRODUCT_IMAGE_PREFIX}/{code}.png"),
    }
}

/// Grid coordinates inside a module (1-based).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: u32,
    pub column: u32,
}

impl Cell {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

/// Full placement of an item. Also the body of the relocation call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "nombreModulo")]
    pub module_name: String,
    #[serde(rename = "fila")]
    pub row: u32,
    #[serde(rename = "columna")]
    pub column: u32,
}

impl Position {
    pub fn new(module_name: impl Into<String>, row: u32, column: u32) -> DomainResult<Self> {
        let module_name = module_name.into();
        if module_name.trim().is_empty() {
            return Err(DomainError::validation("module name cannot be empty"));
        }
        ensure_positive("row", row)?;
        ensure_positive("column", column)?;
        Ok(Self {
            module_name,
            row,
            column,
        })
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.row, self.column)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.module_name, self.cell())
    }
}

fn ensure_positive(field: &str, value: u32) -> DomainResult<()> {
    if value == 0 {
        return Err(DomainError::invalid_position(format!("{field} must be >= 1")));
    }
    Ok(())
}

/// Body of the expiry update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryUpdate {
    #[serde(rename = "fechaCaducidad")]
    pub expiry_date: String,
}

impl ExpiryUpdate {
    /// Accepts only a strict `YYYY-MM-DD` day; the backend recomputes withdrawal.
    pub fn new(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        let date = calendar::parse_ymd(raw).ok_or_else(|| DomainError::invalid_date(raw))?;
        Ok(Self {
            expiry_date: calendar::format_ymd(date),
        })
    }
}

/// Body of the create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "tiendaId")]
    pub store_id: StoreId,
    #[serde(rename = "productoCodigo")]
    pub product_code: ProductCode,
    #[serde(rename = "familia")]
    pub family: String,
    #[serde(rename = "nombreModulo")]
    pub module_name: String,
    #[serde(rename = "fila")]
    pub row: u32,
    #[serde(rename = "columna")]
    pub column: u32,
    #[serde(rename = "fechaCaducidad")]
    pub expiry_date: Option<String>,
    #[serde(rename = "caducidadDias")]
    pub shelf_life_days: Option<u32>,
}

impl NewItem {
    /// Check required fields and ranges before anything is sent.
    pub fn validate(&self) -> DomainResult<()> {
        if self.family.trim().is_empty() {
            return Err(DomainError::validation("family is required"));
        }
        Position::new(self.module_name.as_str(), self.row, self.column)?;
        if let Some(raw) = &self.expiry_date {
            if calendar::parse_ymd(raw.trim()).is_none() {
                return Err(DomainError::invalid_date(raw.as_str()));
            }
        }
        Ok(())
    }
}

/// Raw text of the edit form. Blank fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatchForm {
    pub module_name: String,
    pub row: String,
    pub column: String,
    pub expiry_date: String,
    pub shelf_life_days: String,
}

/// Partial update body; absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(rename = "nombreModulo", skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(rename = "fila", skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(rename = "columna", skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(rename = "fechaCaducidad", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(rename = "caducidadDias", skip_serializing_if = "Option::is_none")]
    pub shelf_life_days: Option<u32>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self == &ItemPatch::default()
    }

    /// Build a patch from form text, rejecting it when nothing would change.
    pub fn from_form(form: &ItemPatchForm) -> DomainResult<Self> {
        let non_blank = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());

        let mut patch = ItemPatch {
            module_name: non_blank(&form.module_name),
            ..ItemPatch::default()
        };
        if let Some(raw) = non_blank(&form.row) {
            patch.row = Some(parse_positive("row", &raw)?);
        }
        if let Some(raw) = non_blank(&form.column) {
            patch.column = Some(parse_positive("column", &raw)?);
        }
        if let Some(raw) = non_blank(&form.expiry_date) {
            patch.expiry_date = Some(ExpiryUpdate::new(&raw)?.expiry_date);
        }
        if let Some(raw) = non_blank(&form.shelf_life_days) {
            let days = raw.parse::<u32>().map_err(|_| {
                DomainError::validation(format!("shelf life must be a non-negative integer: {raw:?}"))
            })?;
            patch.shelf_life_days = Some(days);
        }

        if patch.is_empty() {
            return Err(DomainError::validation("nothing to update"));
        }
        Ok(patch)
    }
}

fn parse_positive(field: &str, raw: &str) -> DomainResult<u32> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DomainError::invalid_position(format!(
            "{field} must be a positive integer: {raw:?}"
        ))),
    }
}
