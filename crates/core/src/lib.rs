//! `pizzapos-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{InvoiceId, ItemId};
pub use money::{Money, TaxRate};
pub use value_object::ValueObject;
