pub mod pending_items;
pub mod purchases;
