use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::purchases;

/// Supplier purchase lifecycle. Monotonic except for the `cancelled` escape;
/// `received` and `cancelled` are terminal as far as reconciliation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Pending,
    Paid,
    Shipped,
    Received,
    Cancelled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Paid => "paid",
            PurchaseStatus::Shipped => "shipped",
            PurchaseStatus::Received => "received",
            PurchaseStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = purchases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Purchase {
    pub id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub total_cost: BigDecimal,
    pub shipping_cost: BigDecimal,
    pub notes: Option<String>,
    pub has_pending_items: bool,
    pub pending_items_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    pub fn is_received(&self) -> bool {
        self.status == PurchaseStatus::Received.as_str()
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = purchases)]
pub struct NewPurchase {
    pub id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub total_cost: BigDecimal,
    pub shipping_cost: BigDecimal,
}
