//! Invoicing domain module.
//!
//! This crate contains the invoice computation rules (line pricing, tax,
//! totals), the invoice number format and the order draft used while a sale is
//! being put together. Everything here is deterministic domain logic (no IO,
//! no HTTP, no storage); numbering state and persistence live in
//! `pizzapos-infra`.

pub mod draft;
pub mod filter;
pub mod invoice;
pub mod number;
pub mod pricing;

pub use draft::{DraftLine, OrderDraft};
pub use filter::{InvoiceFilter, sort_by_date_desc};
pub use invoice::{Customer, Invoice, InvoiceLine, InvoiceTotals, LineInput};
pub use number::InvoiceNumber;
pub use pricing::price_lines;
