use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::pending_items;

/// Accepted `condition` values for a problem line item.
pub const CONDITIONS: [&str; 4] = ["mint", "good", "fair", "poor"];

/// Accepted `piece_type` values.
pub const PIECE_TYPES: [&str; 3] = ["basic", "premium", "rlc"];

/// Lifecycle of a pending item. `Refunded` and `Cancelled` are terminal:
/// items in those states no longer count against their original purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingItemStatus {
    PendingReshipment,
    RequestingRefund,
    Refunded,
    Cancelled,
}

impl PendingItemStatus {
    pub const ALL: [PendingItemStatus; 4] = [
        PendingItemStatus::PendingReshipment,
        PendingItemStatus::RequestingRefund,
        PendingItemStatus::Refunded,
        PendingItemStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PendingItemStatus::PendingReshipment => "pending-reshipment",
            PendingItemStatus::RequestingRefund => "requesting-refund",
            PendingItemStatus::Refunded => "refunded",
            PendingItemStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PendingItemStatus::Refunded | PendingItemStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = pending_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PendingItem {
    pub id: Uuid,
    pub original_purchase_id: Uuid,
    pub linked_to_purchase_id: Option<Uuid>,
    pub car_id: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub condition: String,
    pub brand: Option<String>,
    pub piece_type: Option<String>,
    pub is_treasure_hunt: bool,
    pub is_super_treasure_hunt: bool,
    pub is_chase: bool,
    pub photos: Option<Vec<String>>,
    pub status: String,
    pub reported_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub refund_amount: Option<BigDecimal>,
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PendingItem {
    /// Value of the problem units, `quantity × unit_price`.
    pub fn line_value(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.unit_price
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pending_items)]
pub struct NewPendingItem {
    pub id: Uuid,
    pub original_purchase_id: Uuid,
    pub car_id: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub condition: String,
    pub brand: Option<String>,
    pub piece_type: Option<String>,
    pub is_treasure_hunt: bool,
    pub is_super_treasure_hunt: bool,
    pub is_chase: bool,
    pub photos: Option<Vec<String>>,
    pub status: String,
    pub reported_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Partial update; `None` fields are left untouched. The original purchase
/// reference and the reported date are immutable and deliberately absent.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = pending_items)]
pub struct PendingItemChanges {
    pub car_id: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<BigDecimal>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub piece_type: Option<String>,
    pub is_treasure_hunt: Option<bool>,
    pub is_super_treasure_hunt: Option<bool>,
    pub is_chase: Option<bool>,
    pub photos: Option<Vec<String>>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub refund_amount: Option<BigDecimal>,
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_known_values() {
        assert_eq!(
            PendingItemStatus::parse("pending-reshipment"),
            Some(PendingItemStatus::PendingReshipment)
        );
        assert_eq!(
            PendingItemStatus::parse("requesting-refund"),
            Some(PendingItemStatus::RequestingRefund)
        );
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert_eq!(PendingItemStatus::parse("shipped"), None);
        assert_eq!(PendingItemStatus::parse(""), None);
    }

    #[test]
    fn refunded_and_cancelled_are_terminal() {
        assert!(PendingItemStatus::Refunded.is_terminal());
        assert!(PendingItemStatus::Cancelled.is_terminal());
        assert!(!PendingItemStatus::PendingReshipment.is_terminal());
        assert!(!PendingItemStatus::RequestingRefund.is_terminal());
    }
}
