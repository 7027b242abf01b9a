pub mod archive;
pub mod convention;
pub mod orphan;
pub mod placeholder;
pub mod similarity;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::domain::{AssetMap, MissingAssetsReport, MissingEntry};
use crate::domain::{REASON_INCOMPLETE, REASON_NO_ASSETS};
use crate::error::{Error, Result};
use crate::pool::UnclaimedPool;
use crate::scanner;
use orphan::OrphanMatch;
use placeholder::PlaceholderAssignment;

/// Everything one run decided, before anything is written or moved.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Non-empty records only.
    pub assets: AssetMap,
    pub missing: MissingAssetsReport,
    /// Images nobody claimed; these go to the archive.
    pub unclaimed: UnclaimedPool,
    pub orphans: Vec<OrphanMatch>,
    pub placeholders: Vec<PlaceholderAssignment>,
}

/// Phase 1: classify every `<root>/<owned_dir>/<entity>/` directory.
///
/// Returns the records keyed by directory name. Files that match no naming
/// convention are left alone: they belong to their directory's entity and
/// never enter the unclaimed pool.
pub fn map_owned_dirs(root: &Path, owned_dir: &str) -> Result<AssetMap> {
    let mut assets = AssetMap::new();

    let owned = root.join(owned_dir);
    if !owned.is_dir() {
        warn!(path = %owned.display(), "entity directory not found, skipping convention matching");
        return Ok(assets);
    }

    let dirs = scanner::list_subdirectories(&owned)?;
    info!(count = dirs.len(), "found entity directories");

    for dir in dirs {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mapped = convention::map_entity_dir(root, &dir)?;
        debug!(
            entity = %name,
            logo = mapped.record.logo.is_some(),
            cover = mapped.record.cover.is_some(),
            screenshots = mapped.record.screenshots.len(),
            "mapped entity directory"
        );
        for image in &mapped.unrecognized {
            debug!(entity = %name, path = %image.web_path, "unrecognized file left in place");
        }
        assets.insert(name, mapped.record);
    }

    Ok(assets)
}

/// Describe every catalog entity that still lacks a complete asset set.
/// Entries already present (placeholder substitutions) are kept as they are.
pub fn build_missing_report(entities: &[String], assets: &AssetMap, report: &mut MissingAssetsReport) {
    for entity in entities {
        if report.contains_key(entity) {
            continue;
        }
        let reason = match assets.get(entity) {
            None => REASON_NO_ASSETS,
            Some(record) if record.is_empty() => REASON_NO_ASSETS,
            Some(record) if !record.is_complete() => REASON_INCOMPLETE,
            Some(_) => continue,
        };
        report.insert(
            entity.clone(),
            MissingEntry {
                used: None,
                reason: Some(reason.to_string()),
            },
        );
    }
}

/// Run every matching phase in order. Reads the filesystem but changes nothing.
///
/// Phases: owned directories, full inventory, orphan matching, placeholder
/// allocation, report. The unclaimed pool is handed from phase to phase.
pub fn resolve(config: &ResolverConfig, entities: &[String]) -> Result<Resolution> {
    let root = config.asset_root.as_path();
    if root.exists() && !root.is_dir() {
        return Err(Error::AssetRootNotDirectory(root.to_path_buf()));
    }

    let (mut assets, inventory) = if root.is_dir() {
        let assets = map_owned_dirs(root, &config.owned_dir)?;
        let inventory = scanner::scan_inventory(
            root,
            &[config.owned_dir.as_str(), config.archive_dir.as_str()],
        )?;
        (assets, inventory)
    } else {
        warn!(path = %root.display(), "asset root not found");
        (AssetMap::new(), Vec::new())
    };

    let pool = UnclaimedPool::from_images(inventory);
    info!(images = pool.len(), "unclaimed images before matching");

    let rules = orphan::default_rules(config.similarity_threshold);
    let (pool, orphans) = orphan::match_orphans(entities, &mut assets, pool, &rules);
    info!(count = orphans.len(), "orphaned images matched");

    let mut missing = MissingAssetsReport::new();
    let (pool, placeholders) = placeholder::allocate_placeholders(
        entities,
        &mut assets,
        pool,
        config.screenshot_quota,
        &mut missing,
    );
    info!(count = placeholders.len(), "placeholders assigned");

    build_missing_report(entities, &assets, &mut missing);
    assets.retain(|_, record| !record.is_empty());

    Ok(Resolution {
        assets,
        missing,
        unclaimed: pool,
        orphans,
        placeholders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetRecord, REASON_PLACEHOLDER};
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"img").unwrap();
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_owned_dirs_missing_is_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = map_owned_dirs(tmp.path(), "apps").unwrap();
        assert!(assets.is_empty());
    }

    #[test]
    fn test_map_owned_dirs_keys_by_directory() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("apps/widget/logo.png"));
        touch(&tmp.path().join("apps/widget/banner.png"));
        fs::create_dir_all(tmp.path().join("apps/empty")).unwrap();

        let assets = map_owned_dirs(tmp.path(), "apps").unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets["empty"].is_empty());
        assert_eq!(assets["widget"].logo.as_deref(), Some("/apps/widget/logo.png"));
        assert!(!assets["widget"].paths().contains(&"/apps/widget/banner.png"));
    }

    #[test]
    fn test_build_missing_report_reasons() {
        let mut assets = AssetMap::new();
        assets.insert(
            "partial".into(),
            AssetRecord {
                logo: Some("/l.png".into()),
                ..Default::default()
            },
        );
        assets.insert("empty".into(), AssetRecord::default());
        assets.insert(
            "full".into(),
            AssetRecord {
                logo: Some("/l2.png".into()),
                cover: Some("/c.png".into()),
                screenshots: vec!["/s.png".into()],
            },
        );
        let mut report = MissingAssetsReport::new();
        report.insert(
            "placeholder".into(),
            MissingEntry {
                used: Some("/x.png".into()),
                reason: Some(REASON_PLACEHOLDER.into()),
            },
        );

        build_missing_report(
            &names(&["partial", "empty", "full", "absent", "placeholder"]),
            &assets,
            &mut report,
        );

        assert_eq!(report["partial"].reason.as_deref(), Some(REASON_INCOMPLETE));
        assert_eq!(report["empty"].reason.as_deref(), Some(REASON_NO_ASSETS));
        assert_eq!(report["absent"].reason.as_deref(), Some(REASON_NO_ASSETS));
        assert_eq!(report["placeholder"].reason.as_deref(), Some(REASON_PLACEHOLDER));
        assert!(!report.contains_key("full"));
    }

    #[test]
    fn test_owned_dir_strays_never_enter_the_pool() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["logo.png", "cover.png", "screenshot-1.png", "banner.png"] {
            touch(&tmp.path().join("apps/widget").join(name));
        }
        let config = ResolverConfig::with_root(tmp.path());
        let resolution = resolve(&config, &names(&["widget", "gadget"])).unwrap();

        assert!(!resolution.assets.contains_key("gadget"));
        assert!(resolution.placeholders.is_empty());
        assert!(!resolution.unclaimed.contains("/apps/widget/banner.png"));
        assert_eq!(
            resolution.missing["gadget"].reason.as_deref(),
            Some(REASON_NO_ASSETS)
        );
    }

    #[test]
    fn test_resolve_rejects_file_as_root() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("public");
        fs::write(&file, b"not a dir").unwrap();
        let config = ResolverConfig::with_root(&file);
        let err = resolve(&config, &[]).unwrap_err();
        assert!(matches!(err, Error::AssetRootNotDirectory(_)));
    }

    #[test]
    fn test_resolve_missing_root_reports_entities() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ResolverConfig::with_root(&tmp.path().join("nope"));
        let resolution = resolve(&config, &names(&["widget"])).unwrap();
        assert!(resolution.assets.is_empty());
        assert_eq!(
            resolution.missing["widget"].reason.as_deref(),
            Some(REASON_NO_ASSETS)
        );
    }

    #[test]
    fn test_resolve_drops_empty_records() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("apps/ghost")).unwrap();
        let config = ResolverConfig::with_root(tmp.path());
        let resolution = resolve(&config, &names(&["ghost"])).unwrap();
        assert!(!resolution.assets.contains_key("ghost"));
        assert!(resolution.missing.contains_key("ghost"));
    }
}
