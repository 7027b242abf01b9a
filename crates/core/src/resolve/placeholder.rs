use tracing::debug;

use crate::domain::{AssetMap, AssetRole, MissingAssetsReport, MissingEntry, REASON_PLACEHOLDER};
use crate::pool::UnclaimedPool;
use crate::scanner::ImageFile;

/// Default number of screenshots handed to an entity that has none.
pub const DEFAULT_SCREENSHOT_QUOTA: usize = 3;

/// A placeholder image handed to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderAssignment {
    pub entity: String,
    pub role: AssetRole,
    pub web_path: String,
}

/// Pick one placeholder for `role`, removing it from the pool.
///
/// Preference: both the role keyword and the entity name, then either of
/// them, then any role keyword at all. Returns `None` when nothing fits.
pub fn find_placeholder(
    pool: &mut UnclaimedPool,
    entity: &str,
    role: AssetRole,
) -> Option<ImageFile> {
    let entity = entity.to_lowercase();
    let keyword = role.keyword();
    let has_entity = |name: &str| !entity.is_empty() && name.contains(&entity);

    pool.take_first(|i| {
        let name = i.file_name_lower();
        name.contains(keyword) && has_entity(&name)
    })
    .or_else(|| {
        pool.take_first(|i| {
            let name = i.file_name_lower();
            name.contains(keyword) || has_entity(&name)
        })
    })
    .or_else(|| {
        pool.take_first(|i| {
            let name = i.file_name_lower();
            AssetRole::ALL.iter().any(|r| name.contains(r.keyword()))
        })
    })
}

/// Pick up to `count` screenshot placeholders: files named as screenshots
/// first, then any remaining images in pool order.
pub fn find_screenshot_placeholders(pool: &mut UnclaimedPool, count: usize) -> Vec<ImageFile> {
    let keyword = AssetRole::Screenshot.keyword();
    let mut taken = pool.take_up_to(count, |i| i.file_name_lower().contains(keyword));
    if taken.len() < count {
        let remaining = count - taken.len();
        taken.extend(pool.take_up_to(remaining, |_| true));
    }
    taken
}

/// Backfill every incomplete entity from the pool, in catalog order.
///
/// Fields are filled in the order logo, cover, screenshots. Entities that
/// received anything get a report entry listing what was used.
pub fn allocate_placeholders(
    entities: &[String],
    assets: &mut AssetMap,
    mut pool: UnclaimedPool,
    screenshot_quota: usize,
    report: &mut MissingAssetsReport,
) -> (UnclaimedPool, Vec<PlaceholderAssignment>) {
    let mut assignments = Vec::new();

    for entity in entities {
        let mut record = assets.get(entity).cloned().unwrap_or_default();
        if record.is_complete() {
            continue;
        }

        let mut used: Vec<(AssetRole, String)> = Vec::new();

        if record.logo.is_none() {
            if let Some(image) = find_placeholder(&mut pool, entity, AssetRole::Logo) {
                record.logo = Some(image.web_path.clone());
                used.push((AssetRole::Logo, image.web_path));
            }
        }

        if record.cover.is_none() {
            if let Some(image) = find_placeholder(&mut pool, entity, AssetRole::Cover) {
                record.cover = Some(image.web_path.clone());
                used.push((AssetRole::Cover, image.web_path));
            }
        }

        if record.screenshots.is_empty() {
            for image in find_screenshot_placeholders(&mut pool, screenshot_quota) {
                record.screenshots.push(image.web_path.clone());
                used.push((AssetRole::Screenshot, image.web_path));
            }
        }

        if used.is_empty() {
            continue;
        }

        debug!(entity = %entity, count = used.len(), "placeholders assigned");
        report.insert(entity.clone(), placeholder_entry(&used));
        assets.insert(entity.clone(), record);
        assignments.extend(used.into_iter().map(|(role, web_path)| PlaceholderAssignment {
            entity: entity.clone(),
            role,
            web_path,
        }));
    }

    (pool, assignments)
}

fn placeholder_entry(used: &[(AssetRole, String)]) -> MissingEntry {
    let paths: Vec<&str> = used.iter().map(|(_, p)| p.as_str()).collect();
    MissingEntry {
        used: Some(paths.join(", ")),
        reason: Some(REASON_PLACEHOLDER.to_string()),
    }
}
