use tracing::debug;

use super::convention::classify_file_name;
use super::similarity::similarity;
use crate::domain::{AssetMap, AssetRole};
use crate::pool::UnclaimedPool;
use crate::scanner::ImageFile;

/// Default similarity a filename must exceed to count as a match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// One way a filename can be tied to an entity name. Both sides are lowercase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrphanRule {
    /// The filename contains the entity name.
    Contains,
    /// The filename contains the entity name stripped to `[a-z0-9]`.
    ContainsAlphanumeric,
    /// Normalized Levenshtein similarity strictly above the threshold.
    Similarity(f64),
}

impl OrphanRule {
    pub fn accepts(&self, file_name: &str, entity: &str) -> bool {
        match self {
            OrphanRule::Contains => !entity.is_empty() && file_name.contains(entity),
            OrphanRule::ContainsAlphanumeric => {
                let stripped = alphanumeric(entity);
                !stripped.is_empty() && file_name.contains(&stripped)
            }
            OrphanRule::Similarity(threshold) => similarity(file_name, entity) > *threshold,
        }
    }
}

/// The rules in priority order.
pub fn default_rules(threshold: f64) -> Vec<OrphanRule> {
    vec![
        OrphanRule::Contains,
        OrphanRule::ContainsAlphanumeric,
        OrphanRule::Similarity(threshold),
    ]
}

pub(crate) fn alphanumeric(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// An orphaned image attributed to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanMatch {
    pub entity: String,
    pub role: AssetRole,
    pub web_path: String,
}

/// Attribute unclaimed images to entities that have no record yet.
///
/// Policy: for each entity, the first image in pool order that any rule
/// accepts wins. No best-score search happens across candidates. If the
/// winner's role cannot be read from its name, nothing is attributed to that
/// entity and the image stays in the pool. Each entity receives at most one
/// orphan.
pub fn match_orphans(
    entities: &[String],
    assets: &mut AssetMap,
    mut pool: UnclaimedPool,
    rules: &[OrphanRule],
) -> (UnclaimedPool, Vec<OrphanMatch>) {
    let mut matches = Vec::new();

    for entity in entities {
        if assets.contains_key(entity) {
            continue;
        }
        let entity_lower = entity.to_lowercase();

        let Some((web_path, role)) = pool
            .iter()
            .find(|image| {
                let name = image.file_name_lower();
                rules.iter().any(|r| r.accepts(&name, &entity_lower))
            })
            .map(|image| (image.web_path.clone(), classify_file_name(image)))
        else {
            continue;
        };
        let Some(role) = role else {
            debug!(entity = %entity, path = %web_path, "orphan candidate has no readable role");
            continue;
        };
        let Some(image) = pool.take_first(|i| i.web_path == web_path) else {
            continue;
        };

        debug!(entity = %entity, path = %image.web_path, %role, "orphan matched");
        attach(assets.entry(entity.clone()).or_default(), role, &image);
        matches.push(OrphanMatch {
            entity: entity.clone(),
            role,
            web_path: image.web_path,
        });
    }

    (pool, matches)
}

fn attach(record: &mut crate::domain::AssetRecord, role: AssetRole, image: &ImageFile) {
    match role {
        AssetRole::Logo => record.logo = Some(image.web_path.clone()),
        AssetRole::Cover => record.cover = Some(image.web_path.clone()),
        AssetRole::Screenshot => {
            record.screenshots.push(image.web_path.clone());
            if record.cover.is_none() && record.screenshots.len() == 1 {
                record.cover = Some(image.web_path.clone());
            }
        }
    }
}
