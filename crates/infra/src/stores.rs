//! Store interfaces consumed by the application service.

use std::sync::Arc;

use pizzapos_catalog::Item;
use pizzapos_core::{InvoiceId, ItemId};
use pizzapos_invoicing::{Invoice, InvoiceFilter};

use crate::error::StoreError;

/// Menu item persistence. Every mutation is durable when the call returns.
pub trait CatalogStore: Send + Sync {
    fn list_items(&self) -> Result<Vec<Item>, StoreError>;

    fn find_item(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    fn get_item(&self, id: ItemId) -> Result<Item, StoreError> {
        self.find_item(id)?.ok_or(StoreError::NotFound)
    }

    /// Fails with `Conflict` if the id is already present.
    fn insert_item(&self, item: Item) -> Result<(), StoreError>;

    /// Fails with `NotFound` if the id is absent.
    fn replace_item(&self, item: Item) -> Result<(), StoreError>;

    /// Fails with `NotFound` if the id is absent (including a repeat delete).
    fn delete_item(&self, id: ItemId) -> Result<(), StoreError>;
}

/// Invoice persistence keyed by `InvoiceId`.
pub trait InvoiceStore: Send + Sync {
    /// Fails with `Conflict` if the id (or invoice number) already exists.
    fn create(&self, invoice: Invoice) -> Result<Invoice, StoreError>;

    /// Full replacement. Fails with `NotFound` if `id` is absent. The stored
    /// record always carries `id`.
    fn update(&self, id: InvoiceId, invoice: Invoice) -> Result<Invoice, StoreError>;

    /// Fails with `NotFound` if `id` is absent (including a repeat delete).
    fn delete(&self, id: InvoiceId) -> Result<(), StoreError>;

    fn get(&self, id: InvoiceId) -> Result<Invoice, StoreError>;

    /// Matching invoices in insertion order.
    fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, StoreError>;
}

/// Persistent invoice counter.
pub trait InvoiceCounter: Send + Sync {
    /// Atomically add one and return the new value. The counter only advances
    /// if the new value was persisted.
    fn increment(&self) -> Result<u64, StoreError>;

    /// Current value (0 if never incremented).
    fn current(&self) -> Result<u64, StoreError>;
}

macro_rules! forward_arc {
    ($trait:ident { $( fn $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty; )* }) => {
        impl<S> $trait for Arc<S>
        where
            S: $trait + ?Sized,
        {
            $(
                fn $name(&self $(, $arg: $ty)*) -> $ret {
                    (**self).$name($($arg),*)
                }
            )*
        }
    };
}

forward_arc!(CatalogStore {
    fn list_items(&self) -> Result<Vec<Item>, StoreError>;
    fn find_item(&self, id: ItemId) -> Result<Option<Item>, StoreError>;
    fn insert_item(&self, item: Item) -> Result<(), StoreError>;
    fn replace_item(&self, item: Item) -> Result<(), StoreError>;
    fn delete_item(&self, id: ItemId) -> Result<(), StoreError>;
});

forward_arc!(InvoiceStore {
    fn create(&self, invoice: Invoice) -> Result<Invoice, StoreError>;
    fn update(&self, id: InvoiceId, invoice: Invoice) -> Result<Invoice, StoreError>;
    fn delete(&self, id: InvoiceId) -> Result<(), StoreError>;
    fn get(&self, id: InvoiceId) -> Result<Invoice, StoreError>;
    fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, StoreError>;
});

forward_arc!(InvoiceCounter {
    fn increment(&self) -> Result<u64, StoreError>;
    fn current(&self) -> Result<u64, StoreError>;
});
