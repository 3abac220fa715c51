//! Invoice list filtering and ordering.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::invoice::Invoice;

/// Optional criteria for listing invoices. Dates are inclusive and compared
/// on the calendar day only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvoiceFilter {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Case-insensitive match on invoice number or customer name; phone
    /// numbers match as a plain substring.
    #[serde(default, rename = "q")]
    pub search: Option<String>,
}

impl InvoiceFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            search: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.search_term().is_none()
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        let day = invoice.day();
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                invoice
                    .invoice_number()
                    .to_string()
                    .to_lowercase()
                    .contains(&needle)
                    || invoice.customer().name().to_lowercase().contains(&needle)
                    || invoice.customer().phone().is_some_and(|p| p.contains(term))
            }
        }
    }

    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Most recent first. Ties keep their relative order.
pub fn sort_by_date_desc(invoices: &mut [Invoice]) {
    invoices.sort_by(|a, b| b.date().cmp(&a.date()));
}
