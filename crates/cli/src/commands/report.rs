use anyhow::Result;
use comfy_table::{Cell, Color};
use folio_core::domain::{MissingEntry, REASON_INCOMPLETE, REASON_NO_ASSETS, REASON_PLACEHOLDER};
use folio_core::output;

use super::{new_table, Context};

pub fn run(ctx: &Context) -> Result<()> {
    let path = ctx.resolver_config().report_path;
    if !path.exists() {
        println!("No report at {}. Run `folio map` first.", path.display());
        return Ok(());
    }

    let report = output::read_report(&path)?;
    if report.is_empty() {
        println!("Every app has a complete asset set.");
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec![Cell::new("App"), Cell::new("Reason"), Cell::new("Used")]);
    for (entity, entry) in &report {
        let reason = entry.reason.as_deref().unwrap_or("");
        table.add_row(vec![
            Cell::new(entity),
            Cell::new(reason).fg(reason_color(entry)),
            Cell::new(format_used(entry)),
        ]);
    }

    println!("{table}");
    println!("{} apps need attention.", report.len());
    Ok(())
}

pub(crate) fn reason_color(entry: &MissingEntry) -> Color {
    match entry.reason.as_deref() {
        Some(REASON_NO_ASSETS) => Color::Red,
        Some(REASON_INCOMPLETE) => Color::Yellow,
        Some(REASON_PLACEHOLDER) => Color::Cyan,
        _ => Color::Reset,
    }
}

/// One substituted path per line.
pub(crate) fn format_used(entry: &MissingEntry) -> String {
    entry
        .used
        .as_deref()
        .map(|u| u.split(", ").collect::<Vec<_>>().join("\n"))
        .unwrap_or_default()
}
