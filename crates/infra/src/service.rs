//! Application service: the operations exposed to the HTTP layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use pizzapos_catalog::{Item, ItemPatch, NewItem};
use pizzapos_core::{DomainError, InvoiceId, ItemId, TaxRate};
use pizzapos_dashboard::{DashboardMetrics, RecentOrder, TopSellingItem};
use pizzapos_invoicing::{
    Customer, Invoice, InvoiceFilter, InvoiceLine, InvoiceNumber, InvoiceTotals, LineInput,
    price_lines, sort_by_date_desc,
};

use crate::error::StoreError;
use crate::numbering::InvoiceNumbering;
use crate::repository::Repository;
use crate::stores::{CatalogStore, InvoiceCounter, InvoiceStore};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything needed to price a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRequest {
    pub customer: Customer,
    pub lines: Vec<LineInput>,
    pub tax_rate: TaxRate,
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct PosService {
    catalog: Arc<dyn CatalogStore>,
    invoices: Arc<dyn InvoiceStore>,
    numbering: InvoiceNumbering<Arc<dyn InvoiceCounter>>,
    clock: Clock,
}

impl core::fmt::Debug for PosService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PosService").finish_non_exhaustive()
    }
}

impl PosService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        invoices: Arc<dyn InvoiceStore>,
        counter: Arc<dyn InvoiceCounter>,
    ) -> Self {
        Self {
            catalog,
            invoices,
            numbering: InvoiceNumbering::new(counter),
            clock: Arc::new(Utc::now),
        }
    }

    /// All three stores backed by one repository.
    pub fn from_repository(repo: Repository) -> Self {
        let repo = Arc::new(repo);
        Self::new(repo.clone(), repo.clone(), repo)
    }

    /// Replace the wall clock used to date new invoices and the recent window.
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    // ---- catalog ----

    pub fn list_items(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.catalog.list_items()?)
    }

    pub fn get_item(&self, id: ItemId) -> Result<Item, ServiceError> {
        Ok(self.catalog.get_item(id)?)
    }

    pub fn create_item(&self, input: NewItem) -> Result<Item, ServiceError> {
        let item = Item::create(ItemId::new(), input)?;
        self.catalog.insert_item(item.clone())?;
        tracing::info!(
            item_id = %item.id_typed(),
            name = item.name(),
            category = %item.category(),
            "item created"
        );
        Ok(item)
    }

    pub fn update_item(&self, id: ItemId, patch: ItemPatch) -> Result<Item, ServiceError> {
        let updated = self.catalog.get_item(id)?.patched(patch)?;
        self.catalog.replace_item(updated.clone())?;
        tracing::info!(item_id = %id, "item updated");
        Ok(updated)
    }

    /// Invoices that reference the item keep their line snapshots.
    pub fn delete_item(&self, id: ItemId) -> Result<(), ServiceError> {
        self.catalog.delete_item(id)?;
        tracing::info!(item_id = %id, "item deleted");
        Ok(())
    }

    // ---- invoices ----

    pub fn next_invoice_number(&self) -> Result<InvoiceNumber, ServiceError> {
        Ok(self.numbering.next_invoice_number()?)
    }

    fn price(&self, lines: &[LineInput]) -> Result<Vec<InvoiceLine>, ServiceError> {
        price_lines(lines, |id| self.catalog.find_item(id).map_err(ServiceError::from))
    }

    /// Price the request and stamp it with a fresh number and the current
    /// time. Nothing is persisted; a number is only consumed once every line
    /// has been resolved and the totals are within range.
    pub fn compute_invoice(&self, request: InvoiceRequest) -> Result<Invoice, ServiceError> {
        let InvoiceRequest {
            customer,
            lines,
            tax_rate,
        } = request;
        let priced = self
            .price(&lines)
            .and_then(|priced| {
                InvoiceTotals::compute(&priced, tax_rate)?;
                Ok(priced)
            })
            .inspect_err(|e| {
                tracing::warn!(error = %e, "invoice rejected");
            })?;
        let number = self.numbering.next_invoice_number()?;
        Ok(Invoice::assemble(
            InvoiceId::new(),
            number,
            (self.clock)(),
            customer,
            priced,
            tax_rate,
        )?)
    }

    pub fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, ServiceError> {
        let invoice = self.compute_invoice(request)?;
        let stored = self.invoices.create(invoice)?;
        tracing::info!(
            invoice_id = %stored.id_typed(),
            invoice_number = %stored.invoice_number(),
            total = %stored.total(),
            "invoice created"
        );
        Ok(stored)
    }

    /// Full replacement priced against the current catalog. Number and date
    /// stay as originally issued.
    pub fn replace_invoice(
        &self,
        id: InvoiceId,
        request: InvoiceRequest,
    ) -> Result<Invoice, ServiceError> {
        let existing = self.invoices.get(id)?;
        let priced = self.price(&request.lines)?;
        let replacement = existing.replaced(request.customer, priced, request.tax_rate)?;
        let stored = self.invoices.update(id, replacement)?;
        tracing::info!(
            invoice_id = %id,
            invoice_number = %stored.invoice_number(),
            "invoice replaced"
        );
        Ok(stored)
    }

    pub fn delete_invoice(&self, id: InvoiceId) -> Result<(), ServiceError> {
        self.invoices.delete(id)?;
        tracing::info!(invoice_id = %id, "invoice deleted");
        Ok(())
    }

    pub fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, ServiceError> {
        Ok(self.invoices.get(id)?)
    }

    /// Matching invoices, newest first.
    pub fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, ServiceError> {
        let mut invoices = self.invoices.list(filter)?;
        sort_by_date_desc(&mut invoices);
        tracing::debug!(count = invoices.len(), "listed invoices");
        Ok(invoices)
    }

    // ---- dashboard ----

    pub fn dashboard_metrics(&self, growth_rate: f64) -> Result<DashboardMetrics, ServiceError> {
        let invoices = self.invoices.list(&InvoiceFilter::default())?;
        let total_items = self.catalog.list_items()?.len();
        let today = (self.clock)().date_naive();
        Ok(pizzapos_dashboard::summarize(&invoices, total_items, today, growth_rate))
    }

    pub fn top_items(&self, limit: usize) -> Result<Vec<TopSellingItem>, ServiceError> {
        let invoices = self.invoices.list(&InvoiceFilter::default())?;
        Ok(pizzapos_dashboard::top_selling_items(&invoices, limit))
    }

    pub fn recent_orders(&self, limit: usize) -> Result<Vec<RecentOrder>, ServiceError> {
        let invoices = self.invoices.list(&InvoiceFilter::default())?;
        Ok(pizzapos_dashboard::recent_orders(&invoices, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use pizzapos_catalog::{Category, default_menu};
    use pizzapos_core::Money;

    use crate::backend::MemoryBackend;

    fn service() -> (Arc<MemoryBackend>, PosService) {
        let backend = Arc::new(MemoryBackend::new());
        let repo = Repository::new(backend.clone());
        repo.seed_items_if_absent(default_menu().unwrap()).unwrap();
        (backend, PosService::from_repository(repo))
    }

    fn item_named(svc: &PosService, name: &str) -> Item {
        svc.list_items()
            .unwrap()
            .into_iter()
            .find(|i| i.name() == name)
            .unwrap()
    }

    fn request(lines: Vec<LineInput>) -> InvoiceRequest {
        InvoiceRequest {
            customer: Customer::new("Jane Doe", Some("555-0100".into()), None).unwrap(),
            lines,
            tax_rate: TaxRate::from_percent(8.25).unwrap(),
        }
    }

    #[test]
    fn margherita_invoice_totals() {
        let (_b, svc) = service();
        let margherita = item_named(&svc, "Margherita Pizza");

        let inv = svc
            .create_invoice(request(vec![LineInput {
                item_id: margherita.id_typed(),
                quantity: 2,
            }]))
            .unwrap();

        assert_eq!(inv.invoice_number().to_string(), "INV-0001");
        assert_eq!(inv.subtotal(), Money::from_cents(2598));
        assert_eq!(inv.tax_amount(), Money::from_cents(214));
        assert_eq!(inv.total(), Money::from_cents(2812));
        assert_eq!(svc.get_invoice(inv.id_typed()).unwrap(), inv);
    }

    #[test]
    fn unknown_item_fails_before_numbering() {
        let (_b, svc) = service();
        let missing = ItemId::new();
        let err = svc
            .create_invoice(request(vec![LineInput {
                item_id: missing,
                quantity: 1,
            }]))
            .unwrap_err();
        assert_eq!(err, ServiceError::Domain(DomainError::ItemNotFound(missing)));
        assert_eq!(svc.next_invoice_number().unwrap().to_string(), "INV-0001");
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let (_b, svc) = service();
        let water = item_named(&svc, "Bottled Water");
        for quantity in [0, -3] {
            let err = svc
                .compute_invoice(request(vec![LineInput {
                    item_id: water.id_typed(),
                    quantity,
                }]))
                .unwrap_err();
            assert!(matches!(err, ServiceError::Domain(DomainError::InvalidQuantity(_))));
        }
        assert!(svc.list_invoices(&InvoiceFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn empty_request_is_a_validation_error() {
        let (_b, svc) = service();
        let err = svc.create_invoice(request(vec![])).unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn storage_failure_surfaces_as_store_error() {
        let (backend, svc) = service();
        let cola = item_named(&svc, "Coca Cola");
        backend.set_online(false);
        let err = svc
            .create_invoice(request(vec![LineInput {
                item_id: cola.id_typed(),
                quantity: 1,
            }]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unavailable(_))));
    }

    fn pricey_item(svc: &PosService, cents: u64) -> Item {
        svc.create_item(NewItem {
            name: "Catering Platter".into(),
            category: Category::Other,
            price: Money::from_cents(cents),
            description: None,
        })
        .unwrap()
    }

    #[test]
    fn oversized_line_is_rejected_and_store_stays_readable() {
        let (_b, svc) = service();
        let water = item_named(&svc, "Bottled Water");
        svc.create_invoice(request(vec![LineInput {
            item_id: water.id_typed(),
            quantity: 1,
        }]))
        .unwrap();

        let platter = pricey_item(&svc, 1_234_567_891);
        let err = svc
            .create_invoice(request(vec![LineInput {
                item_id: platter.id_typed(),
                quantity: 3_999_999_997,
            }]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidQuantity(_))));

        assert_eq!(svc.list_invoices(&InvoiceFilter::default()).unwrap().len(), 1);
        assert_eq!(svc.dashboard_metrics(0.0).unwrap().total_orders, 1);
        assert_eq!(svc.next_invoice_number().unwrap().to_string(), "INV-0002");
    }

    #[test]
    fn total_over_max_fails_before_numbering() {
        let (_b, svc) = service();
        let platter = pricey_item(&svc, Money::MAX.cents());
        let err = svc
            .create_invoice(request(vec![LineInput {
                item_id: platter.id_typed(),
                quantity: 1,
            }]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert_eq!(svc.next_invoice_number().unwrap().to_string(), "INV-0001");
    }

    #[test]
    fn invoice_at_max_total_persists_and_reloads() {
        let (_b, svc) = service();
        let platter = pricey_item(&svc, 33_333_333_333_333);
        let untaxed = InvoiceRequest {
            tax_rate: TaxRate::ZERO,
            ..request(vec![LineInput {
                item_id: platter.id_typed(),
                quantity: 3,
            }])
        };
        let inv = svc.create_invoice(untaxed).unwrap();
        assert_eq!(inv.total(), Money::MAX);

        let listed = svc.list_invoices(&InvoiceFilter::default()).unwrap();
        assert_eq!(listed, vec![inv.clone()]);
        assert_eq!(svc.get_invoice(inv.id_typed()).unwrap(), inv);
        assert_eq!(svc.dashboard_metrics(0.0).unwrap().total_revenue, Money::MAX);
    }

    #[test]
    fn invoice_survives_catalog_deletion() {
        let (_b, svc) = service();
        let supreme = item_named(&svc, "Supreme Pizza");
        let inv = svc
            .create_invoice(request(vec![LineInput {
                item_id: supreme.id_typed(),
                quantity: 1,
            }]))
            .unwrap();

        svc.delete_item(supreme.id_typed()).unwrap();
        let kept = svc.get_invoice(inv.id_typed()).unwrap();
        assert_eq!(kept.items()[0].item_name(), "Supreme Pizza");
        assert_eq!(kept.items()[0].price(), Money::from_cents(1899));
    }

    #[test]
    fn replace_keeps_number_and_date() {
        let (_b, svc) = service();
        let margherita = item_named(&svc, "Margherita Pizza");
        let cola = item_named(&svc, "Coca Cola");
        let inv = svc
            .create_invoice(request(vec![LineInput {
                item_id: margherita.id_typed(),
                quantity: 1,
            }]))
            .unwrap();

        let replaced = svc
            .replace_invoice(
                inv.id_typed(),
                request(vec![LineInput {
                    item_id: cola.id_typed(),
                    quantity: 3,
                }]),
            )
            .unwrap();

        assert_eq!(replaced.id_typed(), inv.id_typed());
        assert_eq!(replaced.invoice_number(), inv.invoice_number());
        assert_eq!(replaced.date(), inv.date());
        assert_eq!(replaced.subtotal(), Money::from_cents(897));
        assert!(matches!(
            svc.replace_invoice(InvoiceId::new(), request(vec![])),
            Err(ServiceError::Store(StoreError::NotFound))
        ));
    }

    #[test]
    fn item_lifecycle() {
        let (_b, svc) = service();
        let created = svc
            .create_item(NewItem {
                name: "Garlic Knots".into(),
                category: Category::Other,
                price: Money::from_cents(499),
                description: Some("Six knots".into()),
            })
            .unwrap();
        assert_eq!(svc.list_items().unwrap().len(), 9);

        let updated = svc
            .update_item(
                created.id_typed(),
                ItemPatch {
                    price: Some(Money::from_cents(549)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price(), Money::from_cents(549));
        assert_eq!(updated.name(), "Garlic Knots");

        let bad = svc.update_item(
            created.id_typed(),
            ItemPatch {
                name: Some("x".into()),
                ..Default::default()
            },
        );
        assert!(matches!(bad, Err(ServiceError::Domain(DomainError::Validation(_)))));

        svc.delete_item(created.id_typed()).unwrap();
        assert_eq!(
            svc.delete_item(created.id_typed()),
            Err(ServiceError::Store(StoreError::NotFound))
        );
    }

    #[test]
    fn dashboard_uses_clock_for_recent_window() {
        let (_b, svc) = service();
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let old = now - Duration::days(30);
        let margherita = item_named(&svc, "Margherita Pizza");
        let line = vec![LineInput {
            item_id: margherita.id_typed(),
            quantity: 1,
        }];

        svc.clone().with_clock(move || old).create_invoice(request(line.clone())).unwrap();
        let svc = svc.with_clock(move || now);
        svc.create_invoice(request(line)).unwrap();

        let m = svc.dashboard_metrics(12.5).unwrap();
        assert_eq!(m.total_orders, 2);
        assert_eq!(m.recent_orders, 1);
        assert_eq!(m.total_items, 8);
        assert_eq!(m.growth_rate, 12.5);

        let recent = svc.recent_orders(5).unwrap();
        assert_eq!(recent[0].invoice_number.to_string(), "INV-0002");

        let top = svc.top_items(5).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].quantity, 2);
    }
}
