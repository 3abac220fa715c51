//! Stores backed by a [`KeyValueBackend`].
//!
//! Layout: `items` holds the item list, `invoices` the invoice list and
//! `counter` the last issued invoice sequence. Each mutation rewrites its
//! whole document through `KeyValueBackend::update`, so it is applied
//! atomically or not at all.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use pizzapos_catalog::Item;
use pizzapos_core::{InvoiceId, ItemId};
use pizzapos_invoicing::{Invoice, InvoiceFilter};

use crate::backend::KeyValueBackend;
use crate::error::StoreError;
use crate::stores::{CatalogStore, InvoiceCounter, InvoiceStore};

const ITEMS_KEY: &str = "items";
const INVOICES_KEY: &str = "invoices";
const COUNTER_KEY: &str = "counter";

#[derive(Clone)]
pub struct Repository {
    backend: Arc<dyn KeyValueBackend>,
}

impl core::fmt::Debug for Repository {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

impl Repository {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Write `items` as the catalog if no catalog document exists yet.
    /// An existing (even empty) catalog is left alone. Returns whether the
    /// seed was written.
    pub fn seed_items_if_absent(&self, items: Vec<Item>) -> Result<bool, StoreError> {
        let mut seeded = false;
        self.backend.update(ITEMS_KEY, &mut |current| match current {
            Some(existing) => Ok(existing),
            None => {
                seeded = true;
                encode(ITEMS_KEY, &items)
            }
        })?;
        if seeded {
            tracing::info!(count = items.len(), "seeded default menu");
        }
        Ok(seeded)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        decode(key, self.backend.get(key)?)
    }

    fn load_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        let invoices: Vec<Invoice> = self.load(INVOICES_KEY)?;
        for inv in &invoices {
            inv.verify_totals().map_err(|e| {
                StoreError::corrupt(INVOICES_KEY, format!("{}: {e}", inv.invoice_number()))
            })?;
        }
        Ok(invoices)
    }

    /// Apply `f` to the decoded list under `key` and persist the result.
    /// Nothing is written if `f` fails.
    fn modify<T, R, F>(&self, key: &str, f: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, StoreError>,
    {
        let mut f = Some(f);
        let mut out = None;
        self.backend.update(key, &mut |current| {
            let mut records: Vec<T> = decode(key, current)?;
            let f = f
                .take()
                .ok_or_else(|| StoreError::unavailable("backend retried a non-repeatable update"))?;
            out = Some(f(&mut records)?);
            encode(key, &records)
        })?;
        out.ok_or_else(|| StoreError::unavailable("backend skipped update callback"))
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Option<JsonValue>) -> Result<Vec<T>, StoreError> {
    match value {
        None => Ok(Vec::new()),
        Some(v) => serde_json::from_value(v).map_err(|e| StoreError::corrupt(key, e.to_string())),
    }
}

fn encode<T: Serialize>(key: &str, records: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(records).map_err(|e| StoreError::corrupt(key, e.to_string()))
}

fn counter_corrupt() -> StoreError {
    StoreError::corrupt(COUNTER_KEY, "counter is not a non-negative integer")
}

impl CatalogStore for Repository {
    fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        self.load(ITEMS_KEY)
    }

    fn find_item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self
            .list_items()?
            .into_iter()
            .find(|i| i.id_typed() == id))
    }

    fn insert_item(&self, item: Item) -> Result<(), StoreError> {
        self.modify(ITEMS_KEY, |items: &mut Vec<Item>| {
            if items.iter().any(|i| i.id_typed() == item.id_typed()) {
                return Err(StoreError::conflict(format!(
                    "item {} already exists",
                    item.id_typed()
                )));
            }
            items.push(item);
            Ok(())
        })
    }

    fn replace_item(&self, item: Item) -> Result<(), StoreError> {
        self.modify(ITEMS_KEY, |items: &mut Vec<Item>| {
            let slot = items
                .iter_mut()
                .find(|i| i.id_typed() == item.id_typed())
                .ok_or(StoreError::NotFound)?;
            *slot = item;
            Ok(())
        })
    }

    fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        self.modify(ITEMS_KEY, |items: &mut Vec<Item>| {
            let before = items.len();
            items.retain(|i| i.id_typed() != id);
            if items.len() == before {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }
}

impl InvoiceStore for Repository {
    fn create(&self, invoice: Invoice) -> Result<Invoice, StoreError> {
        self.modify(INVOICES_KEY, |invoices: &mut Vec<Invoice>| {
            if invoices.iter().any(|i| i.id_typed() == invoice.id_typed()) {
                return Err(StoreError::conflict(format!(
                    "invoice {} already exists",
                    invoice.id_typed()
                )));
            }
            if invoices
                .iter()
                .any(|i| i.invoice_number() == invoice.invoice_number())
            {
                return Err(StoreError::conflict(format!(
                    "invoice number {} already used",
                    invoice.invoice_number()
                )));
            }
            invoices.push(invoice.clone());
            Ok(invoice)
        })
    }

    fn update(&self, id: InvoiceId, invoice: Invoice) -> Result<Invoice, StoreError> {
        let invoice = invoice.with_id(id);
        self.modify(INVOICES_KEY, |invoices: &mut Vec<Invoice>| {
            let slot = invoices
                .iter_mut()
                .find(|i| i.id_typed() == id)
                .ok_or(StoreError::NotFound)?;
            *slot = invoice.clone();
            Ok(invoice)
        })
    }

    fn delete(&self, id: InvoiceId) -> Result<(), StoreError> {
        self.modify(INVOICES_KEY, |invoices: &mut Vec<Invoice>| {
            let before = invoices.len();
            invoices.retain(|i| i.id_typed() != id);
            if invoices.len() == before {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    fn get(&self, id: InvoiceId) -> Result<Invoice, StoreError> {
        self.load_invoices()?
            .into_iter()
            .find(|i| i.id_typed() == id)
            .ok_or(StoreError::NotFound)
    }

    fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, StoreError> {
        let invoices = self.load_invoices()?;
        if filter.is_empty() {
            return Ok(invoices);
        }
        Ok(invoices.into_iter().filter(|i| filter.matches(i)).collect())
    }
}

impl InvoiceCounter for Repository {
    fn increment(&self) -> Result<u64, StoreError> {
        let mut next = 0u64;
        self.backend.update(COUNTER_KEY, &mut |current| {
            let value = match current {
                None => 0,
                Some(v) => v.as_u64().ok_or_else(counter_corrupt)?,
            };
            next = value
                .checked_add(1)
                .ok_or_else(|| StoreError::corrupt(COUNTER_KEY, "counter overflow"))?;
            Ok(JsonValue::from(next))
        })?;
        Ok(next)
    }

    fn current(&self) -> Result<u64, StoreError> {
        match self.backend.get(COUNTER_KEY)? {
            None => Ok(0),
            Some(v) => v.as_u64().ok_or_else(counter_corrupt),
        }
    }
}
