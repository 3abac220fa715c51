//! Catalog domain module.
//!
//! Menu items and their validation rules, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod menu;

pub use item::{Category, Item, ItemPatch, NewItem};
pub use menu::default_menu;
