use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use pizzapos_core::Money;
use pizzapos_invoicing::{Invoice, InvoiceNumber, sort_by_date_desc};

/// Days before `today` that still count as "recent" (inclusive on both ends).
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Number of rows in the top-selling list.
pub const DEFAULT_TOP_ITEMS: usize = 5;

/// Headline dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_revenue: Money,
    pub total_orders: u64,
    pub average_order_value: Money,
    pub total_items: u64,
    pub recent_revenue: Money,
    pub recent_orders: u64,
    /// Supplied by configuration; not derived from history.
    pub growth_rate: f64,
}

/// Count/revenue/average over an arbitrary invoice slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStats {
    pub count: u64,
    pub revenue: Money,
    pub average: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingItem {
    pub item_name: String,
    pub quantity: u64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub invoice_number: InvoiceNumber,
    pub customer_name: String,
    /// Number of lines on the invoice.
    pub item_count: usize,
    pub total: Money,
    pub date: DateTime<Utc>,
}

pub fn invoice_stats<'a, I>(invoices: I) -> InvoiceStats
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let (count, revenue) = invoices
        .into_iter()
        .fold((0u64, Money::ZERO), |(n, sum), inv| (n + 1, sum.saturating_add(inv.total())));
    InvoiceStats {
        count,
        revenue,
        average: revenue.div_round(count),
    }
}

/// Whether `day` falls in the recent window ending at `today`.
fn is_recent(day: NaiveDate, today: NaiveDate) -> bool {
    let start = today - Duration::days(RECENT_WINDOW_DAYS);
    day >= start && day <= today
}

/// Compute the headline figures.
///
/// `total_items` is the catalog size; `growth_rate` is passed through as given.
pub fn summarize(
    invoices: &[Invoice],
    total_items: usize,
    today: NaiveDate,
    growth_rate: f64,
) -> DashboardMetrics {
    let all = invoice_stats(invoices);
    let recent = invoice_stats(invoices.iter().filter(|inv| is_recent(inv.day(), today)));

    DashboardMetrics {
        total_revenue: all.revenue,
        total_orders: all.count,
        average_order_value: all.average,
        total_items: total_items as u64,
        recent_revenue: recent.revenue,
        recent_orders: recent.count,
        growth_rate,
    }
}

/// Best sellers by units sold, grouped by the item name on the invoice line.
///
/// Equal quantities keep the order in which the names were first seen.
pub fn top_selling_items(invoices: &[Invoice], limit: usize) -> Vec<TopSellingItem> {
    let mut rows: Vec<TopSellingItem> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for line in invoices.iter().flat_map(|inv| inv.items()) {
        let slot = *index.entry(line.item_name()).or_insert_with(|| {
            rows.push(TopSellingItem {
                item_name: line.item_name().to_string(),
                quantity: 0,
                revenue: Money::ZERO,
            });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        row.quantity = row.quantity.saturating_add(u64::from(line.quantity()));
        row.revenue = row.revenue.saturating_add(line.total());
    }

    rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    rows.truncate(limit);
    rows
}

/// The `limit` most recent invoices, newest first.
pub fn recent_orders(invoices: &[Invoice], limit: usize) -> Vec<RecentOrder> {
    let mut sorted = invoices.to_vec();
    sort_by_date_desc(&mut sorted);
    sorted
        .into_iter()
        .take(limit)
        .map(|inv| RecentOrder {
            invoice_number: inv.invoice_number(),
            customer_name: inv.customer().name().to_string(),
            item_count: inv.items().len(),
            total: inv.total(),
            date: inv.date(),
        })
        .collect()
}
