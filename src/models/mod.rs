pub mod pending_item;
pub mod purchase;
