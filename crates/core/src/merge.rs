//! Decorate catalog apps with the images recorded in the asset map.

use std::collections::BTreeMap;

use crate::domain::{App, AssetMap, AssetRecord};

/// Keys tried, in order, after aliases, the exact name and its lowercase form.
pub fn name_variations(name: &str) -> Vec<String> {
    let collapse = |sep: &str| {
        name.split_whitespace()
            .collect::<Vec<_>>()
            .join(sep)
            .to_lowercase()
    };
    vec![
        collapse(""),
        name.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
        name.split(' ').next().unwrap_or_default().to_lowercase(),
        collapse("-"),
        collapse("_"),
    ]
}

/// Find the record for an app name. `None` when no key fits.
pub fn lookup<'a>(
    assets: &'a AssetMap,
    aliases: &BTreeMap<String, String>,
    name: &str,
) -> Option<&'a AssetRecord> {
    if let Some(record) = aliases.get(name).and_then(|key| assets.get(key)) {
        return Some(record);
    }
    if let Some(record) = assets.get(name) {
        return Some(record);
    }
    if let Some(record) = assets.get(&name.to_lowercase()) {
        return Some(record);
    }
    name_variations(name)
        .into_iter()
        .filter(|v| !v.is_empty())
        .find_map(|v| assets.get(&v))
}

/// Attach logo, cover and screenshots to every app that has a record.
/// Apps without one pass through unchanged.
pub fn merge_app_assets(
    apps: Vec<App>,
    assets: &AssetMap,
    aliases: &BTreeMap<String, String>,
) -> Vec<App> {
    apps.into_iter()
        .map(|mut app| {
            if let Some(record) = lookup(assets, aliases, &app.name) {
                app.logo = record.logo.clone();
                app.cover = record.effective_cover().map(str::to_string);
                app.screenshots = record.screenshots.clone();
            }
            app
        })
        .collect()
}
