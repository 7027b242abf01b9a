//! Deterministic stand-in analytics.
//!
//! Every number here is derived from a string seed or an index, so the same
//! input always renders the same dashboard.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::App;

/// Sum of the character codes of `s`.
pub fn seed_hash(s: &str) -> u32 {
    s.chars().fold(0u32, |acc, c| acc.wrapping_add(c as u32))
}

fn lcg(seed: u64) -> u64 {
    (seed.wrapping_mul(9301).wrapping_add(49297)) % 233_280
}

/// `min + lcg(seed) mod (max - min)`, in floating point so fractional
/// ranges behave like their integer counterparts.
fn ranged(min: f64, max: f64, seed: u64) -> f64 {
    min + (lcg(seed) as f64 % (max - min))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub label: String,
    pub count: u64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsData {
    pub page_views: u64,
    pub unique_visitors: u64,
    pub bounce_rate: f64,
    /// Seconds.
    pub avg_session_duration: f64,
    pub top_pages: Vec<BreakdownRow>,
    pub referrers: Vec<BreakdownRow>,
    pub devices: Vec<BreakdownRow>,
    pub locations: Vec<BreakdownRow>,
}

const TOP_PAGES: &[(&str, u32)] = &[
    ("/", 40),
    ("/about", 25),
    ("/services", 15),
    ("/contact", 10),
    ("/blog", 10),
];
const REFERRERS: &[(&str, u32)] = &[
    ("Direct", 45),
    ("Google", 35),
    ("GitHub", 10),
    ("LinkedIn", 5),
    ("Other", 5),
];
const DEVICES: &[(&str, u32)] = &[("Desktop", 60), ("Mobile", 35), ("Tablet", 5)];
const LOCATIONS: &[(&str, u32)] = &[
    ("Nigeria", 70),
    ("United States", 15),
    ("United Kingdom", 5),
    ("Canada", 5),
    ("Other", 5),
];

pub const DEFAULT_SEED: &str = "default-seed";

fn breakdown(total: u64, table: &[(&str, u32)]) -> Vec<BreakdownRow> {
    table
        .iter()
        .map(|(label, pct)| BreakdownRow {
            label: label.to_string(),
            count: (total as f64 * (f64::from(*pct) / 100.0)).floor() as u64,
            percentage: *pct,
        })
        .collect()
}

/// Figures for one app, scaled by `multiplier`. An empty seed falls back to
/// [`DEFAULT_SEED`].
pub fn generate_analytics(multiplier: f64, seed: &str) -> AnalyticsData {
    let seed = if seed.is_empty() { DEFAULT_SEED } else { seed };
    let hash = u64::from(seed_hash(seed));
    let random = |min: f64, max: f64| ranged(min, max, hash);

    let page_views = (random(100.0, 1100.0) * multiplier).floor().max(0.0) as u64;
    let unique_visitors = (page_views as f64 * 0.7).floor() as u64;

    AnalyticsData {
        page_views,
        unique_visitors,
        bounce_rate: random(20.0, 50.0).floor(),
        avg_session_duration: random(60.0, 360.0).floor(),
        top_pages: breakdown(page_views, TOP_PAGES),
        referrers: breakdown(unique_visitors, REFERRERS),
        devices: breakdown(unique_visitors, DEVICES),
        locations: breakdown(unique_visitors, LOCATIONS),
    }
}

/// How strongly a live update moves the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intensity {
    #[default]
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn multiplier(&self) -> f64 {
        match self {
            Intensity::Low => 1.02,
            Intensity::Medium => 1.05,
            Intensity::High => 1.1,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        })
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            other => Err(format!("unknown intensity: {other}")),
        }
    }
}

fn jitter_rows(rows: &[BreakdownRow], seed: u64) -> Vec<BreakdownRow> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let factor = 0.95 + ranged(0.0, 0.1, seed + i as u64) * 0.1;
            BreakdownRow {
                count: (row.count as f64 * factor).floor() as u64,
                ..row.clone()
            }
        })
        .collect()
}

/// One tick of simulated live traffic, derived from `timestamp`.
pub fn simulate_update(data: &AnalyticsData, intensity: Intensity, timestamp: u64) -> AnalyticsData {
    let m = intensity.multiplier();
    AnalyticsData {
        page_views: (data.page_views as f64 * m).floor() as u64,
        unique_visitors: (data.unique_visitors as f64 * m).floor() as u64,
        bounce_rate: (data.bounce_rate + ranged(-2.5, 2.5, timestamp)).clamp(10.0, 80.0),
        avg_session_duration: (data.avg_session_duration + ranged(-10.0, 10.0, timestamp + 1))
            .clamp(30.0, 600.0),
        top_pages: jitter_rows(&data.top_pages, timestamp),
        referrers: jitter_rows(&data.referrers, timestamp + 10),
        devices: jitter_rows(&data.devices, timestamp + 20),
        locations: jitter_rows(&data.locations, timestamp + 30),
    }
}

// ── Traffic series ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficPoint {
    pub date: NaiveDate,
    pub visitors: u64,
    pub page_views: u64,
}

/// Last day of every series.
pub fn series_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default()
}

/// `days` daily points, oldest first, ending on [`series_end`].
pub fn traffic_series(days: u32) -> Vec<TrafficPoint> {
    let end = series_end();
    (0..days)
        .map(|i| {
            let day_seed = i64::from(i) * 7 + 42;
            let visitors = (50 + day_seed % 40 - 20).max(0);
            let page_views = (visitors * 2 + day_seed % 100).max(0);
            TrafficPoint {
                date: end - Duration::days(i64::from(days - 1 - i)),
                visitors: visitors as u64,
                page_views: page_views as u64,
            }
        })
        .collect()
}

// ── Portfolio summary ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopApp {
    pub name: String,
    pub category: String,
    pub views: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub views: u32,
    pub apps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub top_apps: Vec<TopApp>,
    pub categories: Vec<CategoryStat>,
    pub total_users: u32,
    pub total_views: u32,
}

/// Dashboard totals for a list of apps. `None` for an empty list.
///
/// The top list is the first five apps (in the order given), ranked by
/// their hashed view counts.
pub fn portfolio_summary(apps: &[App]) -> Option<PortfolioSummary> {
    if apps.is_empty() {
        return None;
    }

    let mut top_apps: Vec<TopApp> = apps
        .iter()
        .take(5)
        .map(|app| TopApp {
            name: app.name.clone(),
            category: app.category.clone(),
            views: 10 + seed_hash(&app.name) % 90,
        })
        .collect();
    top_apps.sort_by(|a, b| b.views.cmp(&a.views));

    let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
    for app in apps {
        *per_category.entry(app.category.as_str()).or_default() += 1;
    }
    let mut categories: Vec<CategoryStat> = per_category
        .into_iter()
        .map(|(category, count)| CategoryStat {
            category: category.to_string(),
            views: count as u32 * (10 + seed_hash(category) % 40),
            apps: count,
        })
        .collect();
    categories.sort_by(|a, b| b.views.cmp(&a.views));

    let apps_hash = apps.len() as u32 * 7 + 42;
    Some(PortfolioSummary {
        top_apps,
        categories,
        total_users: 100 + apps_hash % 400,
        total_views: 500 + apps_hash % 1500,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_hash() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("ab"), 97 + 98);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate_analytics(1.0, "widget");
        let b = generate_analytics(1.0, "widget");
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_known_values() {
        assert_eq!(seed_hash("widget"), 644);
        assert_eq!(lcg(644), 207_141);

        let data = generate_analytics(1.0, "widget");
        assert_eq!(data.page_views, 241);
        assert_eq!(data.unique_visitors, 168);
        assert_eq!(data.bounce_rate, 41.0);
        assert_eq!(data.avg_session_duration, 201.0);
        assert_eq!(data.top_pages[0].label, "/");
        assert_eq!(data.top_pages[0].count, 96);
        assert_eq!(data.locations[0].label, "Nigeria");
        assert_eq!(data.locations[0].count, 117);
    }

    #[test]
    fn test_multiplier_scales_views() {
        let base = generate_analytics(1.0, "widget");
        let doubled = generate_analytics(2.0, "widget");
        assert_eq!(doubled.page_views, base.page_views * 2);
    }

    #[test]
    fn test_empty_seed_uses_default() {
        assert_eq!(
            generate_analytics(1.0, ""),
            generate_analytics(1.0, DEFAULT_SEED)
        );
    }

    #[test]
    fn test_simulate_update_clamps() {
        let mut data = generate_analytics(1.0, "widget");
        data.bounce_rate = 9.0;
        data.avg_session_duration = 700.0;
        let next = simulate_update(&data, Intensity::High, 12345);
        assert!((10.0..=80.0).contains(&next.bounce_rate));
        assert!((30.0..=600.0).contains(&next.avg_session_duration));
        assert_eq!(next.page_views, (data.page_views as f64 * 1.1).floor() as u64);
        assert_eq!(next.top_pages.len(), data.top_pages.len());
    }

    #[test]
    fn test_simulate_update_is_deterministic() {
        let data = generate_analytics(1.0, "gadget");
        assert_eq!(
            simulate_update(&data, Intensity::Medium, 42),
            simulate_update(&data, Intensity::Medium, 42)
        );
    }

    #[test]
    fn test_intensity_parse() {
        assert_eq!("HIGH".parse::<Intensity>().unwrap(), Intensity::High);
        assert!("extreme".parse::<Intensity>().is_err());
    }

    #[test]
    fn test_traffic_series() {
        let series = traffic_series(7);
        assert_eq!(series.len(), 7);
        assert_eq!(series[6].date, series_end());
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        // day 0: seed 42 -> visitors 50 + 2 - 20, page views 2*32 + 42
        assert_eq!(series[0].visitors, 32);
        assert_eq!(series[0].page_views, 106);
        assert!(traffic_series(0).is_empty());
    }

    #[test]
    fn test_portfolio_summary() {
        assert!(portfolio_summary(&[]).is_none());

        let apps: Vec<App> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .enumerate()
            .map(|(i, n)| App {
                category: if i % 2 == 0 { "Tools" } else { "Games" }.to_string(),
                ..App::named(n)
            })
            .collect();
        let summary = portfolio_summary(&apps).unwrap();

        assert_eq!(summary.top_apps.len(), 5);
        assert!(!summary.top_apps.iter().any(|a| a.name == "F"));
        assert!(summary
            .top_apps
            .windows(2)
            .all(|w| w[0].views >= w[1].views));
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.total_users, 100 + (6 * 7 + 42) % 400);
        assert_eq!(summary.total_views, 500 + (6 * 7 + 42) % 1500);
    }
}
