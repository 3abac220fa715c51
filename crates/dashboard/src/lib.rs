//! Dashboard figures derived from the invoice collection.
//!
//! Every figure is recomputed from the full invoice list on each read; there
//! is no cached or incrementally maintained state.

pub mod metrics;

pub use metrics::{
    DEFAULT_TOP_ITEMS, DashboardMetrics, InvoiceStats, RECENT_WINDOW_DAYS, RecentOrder,
    TopSellingItem, invoice_stats, recent_orders, summarize, top_selling_items,
};
