use anyhow::Result;
use folio_core::resolve::archive::ArchiveProgress;
use folio_core::{AssetResolver, ResolveProgress, ResolveSummary};
use indicatif::{ProgressBar, ProgressStyle};

use super::Context;

pub fn run(ctx: &Context, dry_run: bool) -> Result<()> {
    let config = ctx.resolver_config();
    let resolver = AssetResolver::new(config, ctx.catalog()?);

    if dry_run {
        return plan(&resolver);
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let summary = resolver.run(Some(&mut |progress| match progress {
        ResolveProgress::CatalogLoaded { entities } => {
            pb.println(format!("Catalog: {entities} apps"));
        }
        ResolveProgress::OrphanMatched { entity, web_path } => {
            pb.println(format!("  orphan       {web_path} -> {entity}"));
        }
        ResolveProgress::PlaceholderAssigned {
            entity,
            role,
            web_path,
        } => {
            pb.println(format!("  placeholder  {web_path} -> {entity} ({role})"));
        }
        ResolveProgress::MappingWritten { path, entries } => {
            pb.println(format!("Mapping: {entries} entries -> {}", path.display()));
        }
        ResolveProgress::ReportWritten { path, entries } => {
            pb.println(format!("Report:  {entries} entries -> {}", path.display()));
        }
        ResolveProgress::Archive(ArchiveProgress::Start { total }) => {
            pb.set_length(total as u64);
            pb.set_position(0);
            pb.set_message("Archiving unclaimed images...");
        }
        ResolveProgress::Archive(ArchiveProgress::Moved { target, .. }) => {
            pb.inc(1);
            pb.set_message(format!("-> {}", target.display()));
        }
        ResolveProgress::Archive(ArchiveProgress::Failed { path, message }) => {
            pb.inc(1);
            pb.println(format!("  failed       {}: {message}", path.display()));
        }
        ResolveProgress::Archive(ArchiveProgress::Complete { moved, failed }) => {
            pb.finish_with_message(format!("{moved} archived, {failed} failed"));
        }
    }))?;

    if !pb.is_finished() {
        pb.finish_and_clear();
    }
    println!("{}", summary_line(&summary));
    Ok(())
}

fn plan(resolver: &AssetResolver) -> Result<()> {
    let plan = resolver.plan()?;
    for m in &plan.orphans {
        println!("  orphan       {} -> {} ({})", m.web_path, m.entity, m.role);
    }
    for p in &plan.placeholders {
        println!("  placeholder  {} -> {} ({})", p.web_path, p.entity, p.role);
    }
    for image in plan.unclaimed.iter() {
        println!("  archive      {}", image.web_path);
    }
    println!(
        "Dry run: {} mapped, {} in report, {} would be archived",
        plan.assets.len(),
        plan.missing.len(),
        plan.unclaimed.len()
    );
    Ok(())
}

pub(crate) fn summary_line(summary: &ResolveSummary) -> String {
    let mut line = format!(
        "Done: {} apps, {} mapped, {} in report, {} orphans, {} placeholders, {} archived",
        summary.entities,
        summary.mapped,
        summary.missing,
        summary.orphans,
        summary.placeholders,
        summary.archived,
    );
    if summary.archive_failures > 0 {
        line.push_str(&format!(" ({} failed)", summary.archive_failures));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let summary = ResolveSummary {
            entities: 3,
            mapped: 2,
            missing: 1,
            orphans: 1,
            placeholders: 0,
            archived: 4,
            archive_failures: 0,
        };
        assert_eq!(
            summary_line(&summary),
            "Done: 3 apps, 2 mapped, 1 in report, 1 orphans, 0 placeholders, 4 archived"
        );
    }

    #[test]
    fn test_summary_line_mentions_failures() {
        let summary = ResolveSummary {
            archive_failures: 2,
            ..Default::default()
        };
        assert!(summary_line(&summary).ends_with("(2 failed)"));
    }
}
