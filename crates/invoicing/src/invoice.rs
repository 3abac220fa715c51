//! Invoice model: customer, priced lines and derived totals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use pizzapos_core::{
    DomainError, DomainResult, Entity, InvoiceId, ItemId, Money, TaxRate, ValueObject,
};

use crate::number::InvoiceNumber;

/// Who the sale is for. Only the name is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customerName")]
    name: String,
    #[serde(rename = "customerPhone", default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(rename = "customerAddress", default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }
        Ok(Self {
            name,
            phone: non_blank(phone),
            address: non_blank(address),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One requested (item, quantity) pair, before pricing.
///
/// Quantity is signed so that zero and negative requests can be rejected as
/// `InvalidQuantity` instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInput {
    pub item_id: ItemId,
    pub quantity: i64,
}

/// Invoice line with the item's name and unit price captured at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    item_id: ItemId,
    item_name: String,
    quantity: u32,
    price: Money,
    total: Money,
}

impl ValueObject for InvoiceLine {}

impl InvoiceLine {
    pub fn new(
        item_id: ItemId,
        item_name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity("quantity must be at least 1"));
        }
        let total = price.checked_mul(quantity).ok_or_else(|| {
            DomainError::invalid_quantity(format!(
                "{quantity} x {price} exceeds the maximum amount of {}",
                Money::MAX
            ))
        })?;
        Ok(Self {
            item_id,
            item_name: item_name.into(),
            quantity,
            price,
            total,
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price at the time of sale.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

/// Subtotal, tax and total for a set of priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

impl InvoiceTotals {
    /// Fails with a validation error when there are no lines or the total
    /// would exceed [`Money::MAX`].
    pub fn compute(items: &[InvoiceLine], tax_rate: TaxRate) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("cannot create invoice without items"));
        }
        let too_large = || {
            DomainError::validation(format!("invoice total exceeds the maximum of {}", Money::MAX))
        };

        let subtotal =
            Money::checked_sum(items.iter().map(InvoiceLine::total)).ok_or_else(too_large)?;
        let tax_amount = tax_rate.tax_on(subtotal);
        let total = subtotal.checked_add(tax_amount).ok_or_else(too_large)?;
        Ok(Self {
            subtotal,
            tax_amount,
            total,
        })
    }
}

/// A finalized sale.
///
/// Totals are derived in `assemble` and never set directly, so
/// `subtotal == Σ line totals` and `total == subtotal + tax_amount` hold for
/// every value built through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: InvoiceId,
    invoice_number: InvoiceNumber,
    date: DateTime<Utc>,
    #[serde(flatten)]
    customer: Customer,
    items: Vec<InvoiceLine>,
    subtotal: Money,
    tax_rate: TaxRate,
    tax_amount: Money,
    total: Money,
}

impl Invoice {
    /// Build an invoice from priced lines, computing subtotal, tax and total.
    pub fn assemble(
        id: InvoiceId,
        invoice_number: InvoiceNumber,
        date: DateTime<Utc>,
        customer: Customer,
        items: Vec<InvoiceLine>,
        tax_rate: TaxRate,
    ) -> DomainResult<Self> {
        let InvoiceTotals {
            subtotal,
            tax_amount,
            total,
        } = InvoiceTotals::compute(&items, tax_rate)?;

        Ok(Self {
            id,
            invoice_number,
            date,
            customer,
            items,
            subtotal,
            tax_rate,
            tax_amount,
            total,
        })
    }

    /// Full replacement of the sale contents, keeping id, number and date.
    pub fn replaced(
        &self,
        customer: Customer,
        items: Vec<InvoiceLine>,
        tax_rate: TaxRate,
    ) -> DomainResult<Self> {
        Self::assemble(self.id, self.invoice_number, self.date, customer, items, tax_rate)
    }

    /// Same invoice under a different identifier.
    pub fn with_id(mut self, id: InvoiceId) -> Self {
        self.id = id;
        self
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn invoice_number(&self) -> InvoiceNumber {
        self.invoice_number
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Calendar date (UTC) of the sale; time of day is ignored for reporting.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[InvoiceLine] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Re-check the totals invariants (useful for data loaded from storage).
    pub fn verify_totals(&self) -> DomainResult<()> {
        for line in &self.items {
            if line.price.checked_mul(line.quantity) != Some(line.total) {
                return Err(DomainError::invariant(format!(
                    "line total mismatch for item {}",
                    line.item_id
                )));
            }
        }
        let subtotal = Money::checked_sum(self.items.iter().map(InvoiceLine::total));
        if subtotal != Some(self.subtotal) {
            return Err(DomainError::invariant("subtotal does not match line totals"));
        }
        if self.tax_rate.tax_on(self.subtotal) != self.tax_amount {
            return Err(DomainError::invariant("tax amount does not match tax rate"));
        }
        if self.subtotal.checked_add(self.tax_amount) != Some(self.total) {
            return Err(DomainError::invariant("total does not equal subtotal plus tax"));
        }
        Ok(())
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_customer() -> Customer {
        Customer::new("Ada", Some("0771234567".to_string()), None).unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn line(cents: u64, qty: u32) -> InvoiceLine {
        InvoiceLine::new(ItemId::new(), "Margherita", Money::from_cents(cents), qty).unwrap()
    }

    #[test]
    fn assemble_computes_subtotal_tax_and_total() {
        let invoice = Invoice::assemble(
            InvoiceId::new(),
            InvoiceNumber::from_sequence(1),
            test_time(),
            test_customer(),
            vec![line(1299, 2)],
            TaxRate::from_percent(8.25).unwrap(),
        )
        .unwrap();

        assert_eq!(invoice.subtotal().to_string(), "25.98");
        assert_eq!(invoice.tax_amount().to_string(), "2.14");
        assert_eq!(invoice.total().to_string(), "28.12");
        invoice.verify_totals().unwrap();
    }

    #[test]
    fn assemble_rejects_empty_invoice() {
        let err = Invoice::assemble(
            InvoiceId::new(),
            InvoiceNumber::from_sequence(1),
            test_time(),
            test_customer(),
            vec![],
            TaxRate::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let err = InvoiceLine::new(ItemId::new(), "Water", Money::from_cents(199), 0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(_)));
    }

    #[test]
    fn line_total_above_max_is_an_invalid_quantity() {
        let price = Money::from_cents(1_234_567_891);
        let err = InvoiceLine::new(ItemId::new(), "Party Tray", price, 3_999_999_997).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(_)));
    }

    #[test]
    fn totals_above_max_are_rejected() {
        let half = Money::from_cents(Money::MAX.cents() / 2 + 1);
        let lines = vec![
            InvoiceLine::new(ItemId::new(), "A", half, 1).unwrap(),
            InvoiceLine::new(ItemId::new(), "B", half, 1).unwrap(),
        ];
        assert!(matches!(
            InvoiceTotals::compute(&lines, TaxRate::ZERO),
            Err(DomainError::Validation(_))
        ));

        // Subtotal fits, but tax pushes the total over.
        let at_max = vec![InvoiceLine::new(ItemId::new(), "A", Money::MAX, 1).unwrap()];
        assert!(InvoiceTotals::compute(&at_max, TaxRate::ZERO).is_ok());
        assert!(matches!(
            InvoiceTotals::compute(&at_max, TaxRate::from_percent(8.25).unwrap()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn invoice_at_max_survives_json_and_verifies() {
        let invoice = Invoice::assemble(
            InvoiceId::new(),
            InvoiceNumber::from_sequence(1),
            test_time(),
            test_customer(),
            vec![line(33_333_333_333_333, 3)],
            TaxRate::ZERO,
        )
        .unwrap();
        assert_eq!(invoice.total(), Money::MAX);

        let json = serde_json::to_string(&invoice).unwrap();
        let back: Invoice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, invoice);
        back.verify_totals().unwrap();
    }

    #[test]
    fn customer_name_is_required() {
        let err = Customer::new("   ", None, None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let c = Customer::new(" Bob ", Some("  ".to_string()), Some("1 Main St".to_string()))
            .unwrap();
        assert_eq!(c.name(), "Bob");
        assert_eq!(c.phone(), None);
        assert_eq!(c.address(), Some("1 Main St"));
    }

    #[test]
    fn replaced_keeps_number_and_date() {
        let original = Invoice::assemble(
            InvoiceId::new(),
            InvoiceNumber::from_sequence(3),
            test_time(),
            test_customer(),
            vec![line(500, 1)],
            TaxRate::ZERO,
        )
        .unwrap();
        let updated = original
            .replaced(test_customer(), vec![line(500, 3)], TaxRate::ZERO)
            .unwrap();
        assert_eq!(updated.id_typed(), original.id_typed());
        assert_eq!(updated.invoice_number(), original.invoice_number());
        assert_eq!(updated.date(), original.date());
        assert_eq!(updated.total().cents(), 1500);
    }

    #[test]
    fn verify_totals_detects_tampered_json() {
        let invoice = Invoice::assemble(
            InvoiceId::new(),
            InvoiceNumber::from_sequence(1),
            test_time(),
            test_customer(),
            vec![line(1000, 1)],
            TaxRate::ZERO,
        )
        .unwrap();
        let mut json = serde_json::to_value(&invoice).unwrap();
        json["total"] = serde_json::json!(99.0);
        let tampered: Invoice = serde_json::from_value(json).unwrap();
        assert!(matches!(
            tampered.verify_totals(),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn json_shape_is_flat_camel_case() {
        let invoice = Invoice::assemble(
            InvoiceId::new(),
            InvoiceNumber::from_sequence(12),
            test_time(),
            test_customer(),
            vec![line(1299, 2)],
            TaxRate::from_percent(8.25).unwrap(),
        )
        .unwrap();
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["invoiceNumber"], "INV-0012");
        assert_eq!(json["customerName"], "Ada");
        assert_eq!(json["customerPhone"], "0771234567");
        assert!(json.get("customerAddress").is_none());
        assert_eq!(json["items"][0]["itemName"], "Margherita");
        assert_eq!(json["items"][0]["total"], 25.98);
        assert_eq!(json["taxRate"], 8.25);
        assert_eq!(json["total"], 28.12);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any set of lines and any tax rate, the totals
        /// invariants hold on the assembled invoice.
        #[test]
        fn totals_invariants_hold(
            lines in prop::collection::vec((0u64..100_000u64, 1u32..50u32), 1..12),
            bp in 0u32..=10_000u32,
            scale in prop::sample::select(vec![1u64, 1_000, 1_000_000, 10_000_000]),
        ) {
            let lines: Vec<(u64, u32)> = lines.into_iter().map(|(c, q)| (c * scale, q)).collect();
            let items: Vec<InvoiceLine> = lines
                .iter()
                .map(|(cents, qty)| line(*cents, *qty))
                .collect();
            let expected_subtotal: u64 = lines.iter().map(|(c, q)| c * u64::from(*q)).sum();

            let invoice = match Invoice::assemble(
                InvoiceId::new(),
                InvoiceNumber::from_sequence(1),
                test_time(),
                test_customer(),
                items,
                TaxRate::from_basis_points(bp).unwrap(),
            ) {
                Ok(invoice) => invoice,
                Err(err) => {
                    prop_assert!(matches!(err, DomainError::Validation(_)));
                    prop_assert!(expected_subtotal > Money::MAX.cents() / 2);
                    return Ok(());
                }
            };

            prop_assert_eq!(invoice.subtotal().cents(), expected_subtotal);
            prop_assert_eq!(
                invoice.total().cents(),
                invoice.subtotal().cents() + invoice.tax_amount().cents()
            );
            prop_assert!(invoice.verify_totals().is_ok());

            let json = serde_json::to_string(&invoice).unwrap();
            let reloaded: Invoice = serde_json::from_str(&json).unwrap();
            prop_assert!(reloaded.verify_totals().is_ok());
            prop_assert_eq!(reloaded, invoice);
        }
    }
}
