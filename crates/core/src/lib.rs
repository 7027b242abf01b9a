pub mod analytics;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod merge;
pub mod output;
pub mod pool;
pub mod resolve;
pub mod scanner;
pub mod search;

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::info;

use catalog::{load_apps_or_empty, CatalogSource};
use config::ResolverConfig;
use domain::*;
use error::Result;
use resolve::archive::{self, ArchiveProgress};
use resolve::Resolution;

/// Callback for reporting resolver progress.
pub enum ResolveProgress {
    /// The catalog was read.
    CatalogLoaded { entities: usize },
    /// An orphaned image was attributed to an entity.
    OrphanMatched { entity: String, web_path: String },
    /// A placeholder image was handed to an entity.
    PlaceholderAssigned {
        entity: String,
        role: AssetRole,
        web_path: String,
    },
    /// The mapping file was written.
    MappingWritten { path: PathBuf, entries: usize },
    /// The missing-assets report was written.
    ReportWritten { path: PathBuf, entries: usize },
    /// Archive sweep progress.
    Archive(ArchiveProgress),
}

/// Counts from one completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveSummary {
    pub entities: usize,
    pub mapped: usize,
    pub missing: usize,
    pub orphans: usize,
    pub placeholders: usize,
    pub archived: usize,
    pub archive_failures: usize,
}

/// The main entry point for the folio library: resolves the asset tree
/// against a catalog and writes the results.
pub struct AssetResolver {
    config: ResolverConfig,
    catalog: Box<dyn CatalogSource>,
}

impl AssetResolver {
    pub fn new(config: ResolverConfig, catalog: Box<dyn CatalogSource>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Catalog apps, or none if the catalog cannot be read.
    pub fn apps(&self) -> Vec<App> {
        load_apps_or_empty(self.catalog.as_ref())
    }

    /// Compute the mapping and report without touching the filesystem.
    pub fn plan(&self) -> Result<Resolution> {
        let entities = entity_names(&self.apps());
        resolve::resolve(&self.config, &entities)
    }

    /// Resolve, write the mapping and report, then archive what nobody claimed.
    /// Calls `progress_cb` with progress updates if provided.
    pub fn run(
        &self,
        mut progress_cb: Option<&mut dyn FnMut(ResolveProgress)>,
    ) -> Result<ResolveSummary> {
        let entities = entity_names(&self.apps());
        info!(source = %self.catalog.describe(), count = entities.len(), "catalog loaded");
        if let Some(ref mut cb) = progress_cb {
            cb(ResolveProgress::CatalogLoaded {
                entities: entities.len(),
            });
        }

        let resolution = resolve::resolve(&self.config, &entities)?;

        if let Some(ref mut cb) = progress_cb {
            for m in &resolution.orphans {
                cb(ResolveProgress::OrphanMatched {
                    entity: m.entity.clone(),
                    web_path: m.web_path.clone(),
                });
            }
            for p in &resolution.placeholders {
                cb(ResolveProgress::PlaceholderAssigned {
                    entity: p.entity.clone(),
                    role: p.role,
                    web_path: p.web_path.clone(),
                });
            }
        }

        let mut summary = ResolveSummary {
            entities: entities.len(),
            mapped: resolution.assets.len(),
            missing: resolution.missing.len(),
            orphans: resolution.orphans.len(),
            placeholders: resolution.placeholders.len(),
            ..Default::default()
        };

        output::write_json(&self.config.mapping_path, &resolution.assets)?;
        info!(path = %self.config.mapping_path.display(), entries = summary.mapped, "mapping written");
        if let Some(ref mut cb) = progress_cb {
            cb(ResolveProgress::MappingWritten {
                path: self.config.mapping_path.clone(),
                entries: summary.mapped,
            });
        }

        output::write_json(&self.config.report_path, &resolution.missing)?;
        info!(path = %self.config.report_path.display(), entries = summary.missing, "report written");
        if let Some(ref mut cb) = progress_cb {
            cb(ResolveProgress::ReportWritten {
                path: self.config.report_path.clone(),
                entries: summary.missing,
            });
        }

        if self.config.asset_root.is_dir() {
            let mut forward = |event: ArchiveProgress| {
                if let Some(ref mut cb) = progress_cb {
                    cb(ResolveProgress::Archive(event));
                }
            };
            let outcome = archive::archive_unclaimed(
                &self.config.archive_path(),
                resolution.unclaimed,
                Some(&mut forward),
            )?;
            summary.archived = outcome.moved.len();
            summary.archive_failures = outcome.failed.len();
            info!(
                moved = summary.archived,
                failed = summary.archive_failures,
                "unclaimed images archived"
            );
        }

        Ok(summary)
    }
}

/// Entity names in catalog order, duplicates removed.
pub fn entity_names(apps: &[App]) -> Vec<String> {
    let mut seen = HashSet::new();
    apps.iter()
        .filter(|a| seen.insert(a.name.as_str()))
        .map(|a| a.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::StaticCatalog;

    #[test]
    fn test_entity_names_dedup_keeps_order() {
        let apps = vec![App::named("b"), App::named("a"), App::named("b")];
        assert_eq!(entity_names(&apps), vec!["b", "a"]);
    }

    #[test]
    fn test_run_without_root_writes_outputs_only() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ResolverConfig::with_root(&tmp.path().join("public"));
        let resolver = AssetResolver::new(
            config.clone(),
            Box::new(StaticCatalog(vec![App::named("widget")])),
        );

        let mut events = Vec::new();
        let summary = resolver
            .run(Some(&mut |p| {
                events.push(match p {
                    ResolveProgress::CatalogLoaded { .. } => "catalog",
                    ResolveProgress::MappingWritten { .. } => "mapping",
                    ResolveProgress::ReportWritten { .. } => "report",
                    _ => "other",
                })
            }))
            .unwrap();

        assert_eq!(events, vec!["catalog", "mapping", "report"]);
        assert_eq!(summary.entities, 1);
        assert_eq!(summary.missing, 1);
        assert!(config.mapping_path.exists());
        assert!(config.report_path.exists());
        assert!(!config.archive_path().exists());
    }
}
