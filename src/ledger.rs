//! Purchase Ledger access used by the reconciliation engine.
//!
//! The ledger owns the authoritative purchase record. From this side of the
//! boundary only two things are allowed: reading a purchase, and writing the
//! two derived fields (`has_pending_items`, `pending_items_count`). Status
//! advancement belongs to the purchasing/receiving flow and happens elsewhere,
//! possibly concurrently with the operations here.

use diesel::prelude::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::purchase::Purchase;
use crate::schema::purchases;

pub fn find_purchase(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Purchase>, AppError> {
    let purchase = purchases::table
        .filter(purchases::id.eq(id))
        .select(Purchase::as_select())
        .first(conn)
        .optional()?;
    Ok(purchase)
}

/// Write the derived aggregate fields. Returns `false` when the purchase row
/// no longer exists, which callers treat as a tolerated concurrent deletion.
pub fn update_aggregates(
    conn: &mut PgConnection,
    id: Uuid,
    has_pending_items: bool,
    pending_items_count: i32,
) -> Result<bool, AppError> {
    let updated = diesel::update(purchases::table.filter(purchases::id.eq(id)))
        .set((
            purchases::has_pending_items.eq(has_pending_items),
            purchases::pending_items_count.eq(pending_items_count),
            purchases::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)?;
    Ok(updated > 0)
}
