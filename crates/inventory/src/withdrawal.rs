//! Withdrawal date derivation and the live preview shown while editing.
//!
//! The withdrawal date is the day staff must pull a product from the shelf:
//! the expiry date minus the product's shelf-life offset. While an expiry date
//! is being edited the preview follows the draft, not the stale backend value.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use caducados_core::calendar::{self, ExpiryStatus, StatusColor};
use caducados_core::DomainResult;

use crate::item::{ExpiryUpdate, InventoryItem};

/// `expiry - shelf_life_days`. `None` only outside the representable range.
pub fn withdrawal_date(expiry: NaiveDate, shelf_life_days: u32) -> Option<NaiveDate> {
    expiry.checked_sub_days(Days::new(u64::from(shelf_life_days)))
}

/// Shelf-life offset to derive with.
///
/// The explicit offset wins; otherwise it is inferred from the backend's own
/// expiry/withdrawal pair when both are readable and consistent.
pub fn effective_shelf_life(item: &InventoryItem) -> Option<u32> {
    if let Some(days) = item.shelf_life_days {
        return Some(days);
    }
    let (expiry, withdrawal) = (item.expiry()?, item.withdrawal()?);
    u32::try_from(calendar::days_between(expiry, withdrawal)).ok()
}

/// A withdrawal date ready for display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalView {
    pub date: Option<NaiveDate>,
    pub status: ExpiryStatus,
}

impl WithdrawalView {
    pub fn new(date: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            date,
            status: calendar::classify(date, today),
        }
    }

    pub fn color(&self) -> StatusColor {
        self.status.color()
    }

    /// Day of month as shown next to `R:`, or `-` when undefined.
    pub fn day_label(&self) -> String {
        match self.date {
            Some(d) => chrono::Datelike::day(&d).to_string(),
            None => "-".to_string(),
        }
    }
}

/// Withdrawal preview for `item` given the in-progress expiry text.
pub fn preview(item: &InventoryItem, draft: &str, today: NaiveDate) -> WithdrawalView {
    let live = calendar::parse_ymd(draft.trim())
        .zip(effective_shelf_life(item))
        .and_then(|(expiry, days)| withdrawal_date(expiry, days));

    WithdrawalView::new(live.or_else(|| item.withdrawal()), today)
}

/// Editable expiry text for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryDraft {
    text: String,
}

impl ExpiryDraft {
    /// Start from the item's expiry (its leading day) or from today.
    pub fn for_item(item: &InventoryItem, today: NaiveDate) -> Self {
        let text = match item.expiry_date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.chars().take(10).collect(),
            _ => calendar::format_ymd(today),
        };
        Self { text }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn parsed(&self) -> Option<NaiveDate> {
        calendar::parse_ymd(self.text.trim())
    }

    pub fn is_valid(&self) -> bool {
        self.parsed().is_some()
    }

    /// Quick +/- adjustment. An unreadable draft restarts from today.
    pub fn shift_days(&mut self, days: i64, today: NaiveDate) {
        let base = self.parsed().unwrap_or(today);
        let shifted = if days >= 0 {
            base.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            base.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        self.text = calendar::format_ymd(shifted.unwrap_or(base));
    }

    pub fn preview(&self, item: &InventoryItem, today: NaiveDate) -> WithdrawalView {
        preview(item, &self.text, today)
    }

    pub fn to_update(&self) -> DomainResult<ExpiryUpdate> {
        ExpiryUpdate::new(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caducados_core::{DomainError, ItemId, ProductCode, StoreId};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(expiry: Option<&str>, withdrawal: Option<&str>, days: Option<u32>) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(1),
            store_id: StoreId::new(3718),
            product_code: ProductCode::new(20345),
            family: Some("Lácteos Mural".into()),
            module_name: "Puerta 1".into(),
            row: 1,
            column: 1,
            expiry_date: expiry.map(Into::into),
            withdrawal_date: withdrawal.map(Into::into),
            shelf_life_days: days,
            name: "Yogur".into(),
            image_url: None,
        }
    }

    #[test]
    fn withdrawal_is_overdue_the_day_after() {
        let w = withdrawal_date(ymd(2024, 6, 10), 5).unwrap();
        assert_eq!(calendar::format_ymd(w), "2024-06-05");
        let view = WithdrawalView::new(Some(w), ymd(2024, 6, 6));
        assert_eq!(view.status, ExpiryStatus::Overdue);
        assert_eq!(view.color(), StatusColor::Danger);
    }

    #[test]
    fn preview_follows_the_draft_when_shelf_life_is_known() {
        let it = item(Some("2024-06-10"), Some("2024-06-05"), Some(5));
        let view = preview(&it, "2024-06-20", ymd(2024, 6, 6));
        assert_eq!(view.date, Some(ymd(2024, 6, 15)));
        assert_eq!(view.status, ExpiryStatus::Future);
    }

    #[test]
    fn preview_falls_back_to_backend_value_for_invalid_draft() {
        let it = item(Some("2024-06-10"), Some("2024-06-05"), Some(5));
        let view = preview(&it, "2024-06-2", ymd(2024, 6, 6));
        assert_eq!(view.date, Some(ymd(2024, 6, 5)));
    }

    #[test]
    fn preview_infers_shelf_life_from_backend_pair() {
        let it = item(Some("2024-06-10"), Some("2024-06-07"), None);
        assert_eq!(effective_shelf_life(&it), Some(3));
        let view = preview(&it, "2024-06-12", ymd(2024, 6, 6));
        assert_eq!(view.date, Some(ymd(2024, 6, 9)));
    }

    #[test]
    fn preview_is_undefined_without_any_source() {
        let it = item(Some("2024-06-10"), None, None);
        let view = preview(&it, "2024-06-12", ymd(2024, 6, 6));
        assert_eq!(view.date, None);
        assert_eq!(view.status, ExpiryStatus::Unknown);
        assert_eq!(view.day_label(), "-");
    }

    #[test]
    fn inconsistent_backend_pair_is_not_used_as_shelf_life() {
        let it = item(Some("2024-06-01"), Some("2024-06-07"), None);
        assert_eq!(effective_shelf_life(&it), None);
    }

    #[test]
    fn draft_starts_from_item_or_today() {
        let today = ymd(2024, 6, 6);
        let with_ts = item(Some("2024-06-10T00:00:00"), None, None);
        assert_eq!(ExpiryDraft::for_item(&with_ts, today).text(), "2024-06-10");
        let without = item(None, None, None);
        assert_eq!(ExpiryDraft::for_item(&without, today).text(), "2024-06-06");
    }

    #[test]
    fn shift_days_moves_draft_or_restarts_from_today() {
        let today = ymd(2024, 6, 6);
        let mut draft = ExpiryDraft::from_text("2024-06-30");
        draft.shift_days(1, today);
        assert_eq!(draft.text(), "2024-07-01");
        draft.shift_days(-2, today);
        assert_eq!(draft.text(), "2024-06-29");

        draft.set("garbage");
        draft.shift_days(3, today);
        assert_eq!(draft.text(), "2024-06-09");
    }

    #[test]
    fn draft_update_rejects_invalid_text() {
        let draft = ExpiryDraft::from_text("2024-02-30");
        assert!(!draft.is_valid());
        assert!(matches!(draft.to_update(), Err(DomainError::InvalidDate(_))));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: zero offset is the identity, positive offsets go strictly back.
            #[test]
            fn withdrawal_never_after_expiry(
                days_from_epoch in 0i64..2_000_000,
                offset in 0u32..10_000,
            ) {
                let expiry = ymd(1000, 1, 1) + chrono::Duration::days(days_from_epoch);
                let w = withdrawal_date(expiry, offset).unwrap();
                if offset == 0 {
                    prop_assert_eq!(w, expiry);
                } else {
                    prop_assert!(w < expiry);
                    prop_assert_eq!(calendar::days_between(expiry, w), i64::from(offset));
                }
            }
        }
    }
}
