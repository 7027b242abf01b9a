use anyhow::Result;
use comfy_table::{Cell, Color};
use folio_core::catalog::load_apps_or_empty;
use folio_core::domain::{AppStatus, AssetMap};
use folio_core::merge::merge_app_assets;
use folio_core::output;
use folio_core::search::{categories, AppFilter};

use super::{new_table, Context};

pub fn run(
    ctx: &Context,
    query: Option<String>,
    status: Option<AppStatus>,
    category: Option<String>,
) -> Result<()> {
    let source = ctx.catalog()?;
    let apps = load_apps_or_empty(source.as_ref());
    if apps.is_empty() {
        println!("No apps in {}.", source.describe());
        return Ok(());
    }

    let mapping_path = ctx.resolver_config().mapping_path;
    let assets = if mapping_path.exists() {
        output::read_asset_map(&mapping_path)?
    } else {
        println!("No mapping at {}. Run `folio map` to attach assets.", mapping_path.display());
        AssetMap::new()
    };
    let apps = merge_app_assets(apps, &assets, &ctx.settings.aliases);

    let filter = AppFilter {
        query: query.unwrap_or_default(),
        status,
        category,
    };
    let shown = filter.apply(&apps);

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Name"),
        Cell::new("Category"),
        Cell::new("Status"),
        Cell::new("Logo"),
        Cell::new("Cover"),
        Cell::new("Shots"),
        Cell::new("Tags"),
    ]);
    for app in &shown {
        table.add_row(vec![
            Cell::new(&app.name),
            Cell::new(&app.category),
            Cell::new(app.status).fg(status_color(app.status)),
            asset_cell(app.logo.is_some()),
            asset_cell(app.cover.is_some()),
            Cell::new(app.screenshots.len()),
            Cell::new(app.tags.join(", ")),
        ]);
    }

    println!("{table}");
    println!(
        "{} of {} apps. Categories: {}",
        shown.len(),
        apps.len(),
        categories(&apps).join(", ")
    );
    Ok(())
}

fn status_color(status: AppStatus) -> Color {
    match status {
        AppStatus::Live => Color::Green,
        AppStatus::Finalizing => Color::Yellow,
        AppStatus::InDevelopment => Color::Blue,
    }
}

pub(crate) fn asset_cell(present: bool) -> Cell {
    if present {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("-").fg(Color::Red)
    }
}
