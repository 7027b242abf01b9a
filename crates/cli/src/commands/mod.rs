pub mod analytics;
pub mod apps;
pub mod map;
pub mod report;
pub mod seed;

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use folio_core::catalog::{open_catalog, CatalogSource};
use folio_core::config::{PathOverrides, ResolverConfig, Settings};

/// Settings plus command-line overrides, shared by every command.
pub struct Context {
    pub settings: Settings,
    pub overrides: PathOverrides,
}

impl Context {
    pub fn resolver_config(&self) -> ResolverConfig {
        self.settings.resolver_config(&self.overrides)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.settings.catalog_path(&self.overrides)
    }

    pub fn catalog(&self) -> Result<Box<dyn CatalogSource>> {
        Ok(open_catalog(&self.catalog_path())?)
    }
}

pub(crate) fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}
