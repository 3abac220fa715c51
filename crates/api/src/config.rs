//! Environment-driven configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, anyhow};

use pizzapos_core::TaxRate;
use pizzapos_dashboard::DEFAULT_TOP_ITEMS;
use pizzapos_observability::LogFormat;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Directory for JSON persistence. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Write the default menu when no catalog exists yet.
    pub seed_default_menu: bool,
    /// Applied when an invoice request carries no `taxRate`.
    pub default_tax_rate: TaxRate,
    /// Reported as-is on the dashboard.
    pub growth_rate: f64,
    pub recent_orders_limit: usize,
    pub top_items_limit: usize,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: None,
            seed_default_menu: true,
            default_tax_rate: TaxRate::from_basis_points(825).unwrap_or(TaxRate::ZERO),
            growth_rate: 0.0,
            recent_orders_limit: 5,
            top_items_limit: DEFAULT_TOP_ITEMS,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("POS_BIND_ADDR") {
            config.bind_addr = v
                .trim()
                .parse()
                .with_context(|| format!("POS_BIND_ADDR: invalid socket address '{v}'"))?;
        }
        if let Some(v) = var("POS_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("POS_SEED_DEFAULT_MENU") {
            config.seed_default_menu = parse_bool(&v)
                .ok_or_else(|| anyhow!("POS_SEED_DEFAULT_MENU: expected true/false, got '{v}'"))?;
        }
        if let Some(v) = var("POS_DEFAULT_TAX_RATE") {
            let percent: f64 = v
                .trim()
                .parse()
                .with_context(|| format!("POS_DEFAULT_TAX_RATE: not a number '{v}'"))?;
            config.default_tax_rate =
                TaxRate::from_percent(percent).context("POS_DEFAULT_TAX_RATE")?;
        }
        if let Some(v) = var("POS_GROWTH_RATE") {
            config.growth_rate = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|g| g.is_finite())
                .ok_or_else(|| anyhow!("POS_GROWTH_RATE: not a finite number '{v}'"))?;
        }
        if let Some(v) = var("POS_RECENT_ORDERS_LIMIT") {
            config.recent_orders_limit = v
                .trim()
                .parse()
                .with_context(|| format!("POS_RECENT_ORDERS_LIMIT: not a count '{v}'"))?;
        }
        if let Some(v) = var("POS_LOG_FORMAT") {
            config.log_format = v.parse().context("POS_LOG_FORMAT")?;
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
