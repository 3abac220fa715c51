//! Infrastructure layer: persistence backends, stores, invoice numbering and
//! the application service that ties them to the domain crates.

pub mod backend;
pub mod error;
pub mod numbering;
pub mod repository;
pub mod service;
pub mod stores;

pub use backend::{JsonFileBackend, KeyValueBackend, MemoryBackend};
pub use error::StoreError;
pub use numbering::InvoiceNumbering;
pub use repository::Repository;
pub use service::{InvoiceRequest, PosService, ServiceError};
pub use stores::{CatalogStore, InvoiceCounter, InvoiceStore};
