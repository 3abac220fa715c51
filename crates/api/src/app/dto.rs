use serde::Deserialize;
use serde_json::Number;

use pizzapos_core::{DomainError, InvoiceId, ItemId, TaxRate};
use pizzapos_infra::InvoiceRequest;
use pizzapos_invoicing::{Customer, LineInput};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /invoices` and `PUT /invoices/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceBody {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    pub items: Vec<LineBody>,
    #[serde(default)]
    pub tax_rate: Option<TaxRate>,
}

/// One requested line. Any JSON number is accepted for `quantity` so that
/// fractional values are reported as invalid quantities rather than as
/// malformed bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBody {
    pub item_id: ItemId,
    pub quantity: Number,
}

impl LineBody {
    pub fn into_input(self) -> Result<LineInput, DomainError> {
        Ok(LineInput {
            item_id: self.item_id,
            quantity: whole_quantity(&self.quantity)?,
        })
    }
}

/// Integral JSON numbers (including `2.0`) become `i64`; sign is checked
/// later with the rest of the line.
fn whole_quantity(raw: &Number) -> Result<i64, DomainError> {
    if let Some(q) = raw.as_i64() {
        return Ok(q);
    }
    let invalid =
        || DomainError::invalid_quantity(format!("quantity must be a whole number (got {raw})"));
    if raw.is_u64() {
        return Err(DomainError::invalid_quantity(format!("quantity {raw} is too large")));
    }
    let value = raw.as_f64().ok_or_else(invalid)?;
    if value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(value as i64)
}

impl InvoiceBody {
    pub fn into_request(self, default_tax_rate: TaxRate) -> Result<InvoiceRequest, DomainError> {
        let customer =
            Customer::new(self.customer_name, self.customer_phone, self.customer_address)?;
        let lines = self
            .items
            .into_iter()
            .map(LineBody::into_input)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InvoiceRequest {
            customer,
            lines,
            tax_rate: self.tax_rate.unwrap_or(default_tax_rate),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

// -------------------------
// Path parsing
// -------------------------

pub fn parse_item_id(raw: &str) -> Result<ItemId, axum::response::Response> {
    raw.parse().map_err(|_| {
        let err = DomainError::invalid_id(format!("invalid item id '{raw}'"));
        errors::domain_error_to_response(err)
    })
}

pub fn parse_invoice_id(raw: &str) -> Result<InvoiceId, axum::response::Response> {
    raw.parse().map_err(|_| {
        let err = DomainError::invalid_id(format!("invalid invoice id '{raw}'"));
        errors::domain_error_to_response(err)
    })
}
