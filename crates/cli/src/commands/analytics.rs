use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Color};
use folio_core::analytics::{
    generate_analytics, portfolio_summary, simulate_update, traffic_series, AnalyticsData,
    BreakdownRow, Intensity,
};
use folio_core::catalog::load_apps_or_empty;

use super::{new_table, Context};

/// Analytics for a single app, keyed by its name.
pub fn app(
    name: &str,
    multiplier: f64,
    days: u32,
    intensity: Option<Intensity>,
    timestamp: u64,
) -> Result<()> {
    let mut data = generate_analytics(multiplier, name);
    if let Some(intensity) = intensity {
        data = simulate_update(&data, intensity, timestamp);
        println!("Applied one {intensity} update tick.");
    }

    print_overview(name, &data);
    for (title, rows) in [
        ("Page", &data.top_pages),
        ("Referrer", &data.referrers),
        ("Device", &data.devices),
        ("Location", &data.locations),
    ] {
        print_breakdown(title, rows);
    }

    let mut table = new_table();
    table.set_header(vec![Cell::new("Date"), Cell::new("Visitors"), Cell::new("Page views")]);
    for point in traffic_series(days) {
        table.add_row(vec![
            Cell::new(point.date.format("%Y-%m-%d")),
            Cell::new(point.visitors).set_alignment(CellAlignment::Right),
            Cell::new(point.page_views).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Summary across every app in the configured catalog.
pub fn portfolio(ctx: &Context) -> Result<()> {
    let source = ctx.catalog()?;
    let apps = load_apps_or_empty(source.as_ref());
    let Some(summary) = portfolio_summary(&apps) else {
        println!("No apps in {}.", source.describe());
        return Ok(());
    };

    println!(
        "{} apps: {} users, {} views",
        apps.len(),
        summary.total_users,
        summary.total_views
    );

    let mut top = new_table();
    top.set_header(vec![Cell::new("App"), Cell::new("Category"), Cell::new("Views")]);
    for app in &summary.top_apps {
        top.add_row(vec![
            Cell::new(&app.name),
            Cell::new(&app.category),
            Cell::new(app.views).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{top}");

    let mut categories = new_table();
    categories.set_header(vec![Cell::new("Category"), Cell::new("Apps"), Cell::new("Views")]);
    for stat in &summary.categories {
        categories.add_row(vec![
            Cell::new(&stat.category),
            Cell::new(stat.apps).set_alignment(CellAlignment::Right),
            Cell::new(stat.views).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{categories}");
    Ok(())
}

fn print_overview(name: &str, data: &AnalyticsData) {
    let mut table = new_table();
    table.set_header(vec![Cell::new(name), Cell::new("")]);
    table.add_row(vec![Cell::new("Page views"), Cell::new(data.page_views)]);
    table.add_row(vec![Cell::new("Unique visitors"), Cell::new(data.unique_visitors)]);
    table.add_row(vec![
        Cell::new("Bounce rate"),
        Cell::new(format!("{:.1}%", data.bounce_rate)).fg(bounce_color(data.bounce_rate)),
    ]);
    table.add_row(vec![
        Cell::new("Avg session"),
        Cell::new(format_duration(data.avg_session_duration)),
    ]);
    println!("{table}");
}

fn print_breakdown(title: &str, rows: &[BreakdownRow]) {
    let mut table = new_table();
    table.set_header(vec![Cell::new(title), Cell::new("Count"), Cell::new("%")]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.label),
            Cell::new(row.count).set_alignment(CellAlignment::Right),
            Cell::new(row.percentage).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

fn bounce_color(rate: f64) -> Color {
    if rate >= 60.0 {
        Color::Red
    } else if rate >= 40.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Whole seconds as `3m 21s`.
pub(crate) fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (m, s) = (total / 60, total % 60);
    if m == 0 {
        format!("{s}s")
    } else {
        format!("{m}m {s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(201.0), "3m 21s");
        assert_eq!(format_duration(45.9), "45s");
        assert_eq!(format_duration(-3.0), "0s");
    }

    #[test]
    fn test_bounce_color_bands() {
        assert_eq!(bounce_color(25.0), Color::Green);
        assert_eq!(bounce_color(41.0), Color::Yellow);
        assert_eq!(bounce_color(72.0), Color::Red);
    }
}
