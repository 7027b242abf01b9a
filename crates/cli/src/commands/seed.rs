use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use folio_core::catalog::parser::parse_apps_text;
use folio_core::catalog::Catalog;
use tracing::info;

pub fn run(input: &Path, db: &Path) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let apps = parse_apps_text(&text);
    if apps.is_empty() {
        println!("No app sections found in {}.", input.display());
        return Ok(());
    }

    if let Some(parent) = db.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut catalog = Catalog::open(db)?;
    catalog.upsert_apps_batch(&apps)?;
    catalog.set_config("seeded_from", &input.to_string_lossy())?;
    info!(apps = apps.len(), db = %db.display(), "seeded catalog");

    println!(
        "Seeded {} apps into {} ({} total).",
        apps.len(),
        db.display(),
        catalog.count_apps()?
    );
    Ok(())
}
