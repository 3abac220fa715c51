use std::sync::Arc;

use anyhow::Context;

use pizzapos_catalog::default_menu;
use pizzapos_core::TaxRate;
use pizzapos_infra::{JsonFileBackend, KeyValueBackend, MemoryBackend, PosService, Repository};

use crate::config::AppConfig;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub pos: PosService,
    pub default_tax_rate: TaxRate,
    pub growth_rate: f64,
    pub recent_orders_limit: usize,
    pub top_items_limit: usize,
}

impl AppServices {
    pub fn new(pos: PosService, config: &AppConfig) -> Self {
        Self {
            pos,
            default_tax_rate: config.default_tax_rate,
            growth_rate: config.growth_rate,
            recent_orders_limit: config.recent_orders_limit,
            top_items_limit: config.top_items_limit,
        }
    }
}

/// Open the configured backend, seed the menu if asked to, and wire the
/// service.
pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let backend: Arc<dyn KeyValueBackend> = match &config.data_dir {
        Some(dir) => Arc::new(
            JsonFileBackend::open(dir)
                .with_context(|| format!("opening data directory {}", dir.display()))?,
        ),
        None => Arc::new(MemoryBackend::new()),
    };

    let repo = Repository::new(backend);
    if config.seed_default_menu {
        let menu = default_menu().context("building default menu")?;
        repo.seed_items_if_absent(menu).context("seeding default menu")?;
    }

    Ok(AppServices::new(PosService::from_repository(repo), config))
}
