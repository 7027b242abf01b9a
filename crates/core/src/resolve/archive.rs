use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::pool::UnclaimedPool;

/// Progress callback events for the archive sweep.
pub enum ArchiveProgress {
    /// Starting the sweep with total count.
    Start { total: usize },
    /// A file was moved into the archive.
    Moved { source: PathBuf, target: PathBuf },
    /// A file could not be moved; the sweep continues.
    Failed { path: PathBuf, message: String },
    /// Sweep completed.
    Complete { moved: usize, failed: usize },
}

/// Outcome of one sweep.
#[derive(Debug, Default)]
pub struct ArchiveOutcome {
    pub moved: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Build a free target path inside `archive_dir` for `original`.
/// Name collisions get `_1`, `_2`, … appended to the stem; nothing is overwritten.
pub fn build_archive_path(archive_dir: &Path, original: &Path) -> PathBuf {
    let file_stem = original
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    let ext = original
        .extension()
        .unwrap_or_default()
        .to_string_lossy();

    let base_name = if ext.is_empty() {
        file_stem.to_string()
    } else {
        format!("{}.{}", file_stem, ext)
    };

    let mut target = archive_dir.join(&base_name);
    let mut counter = 1u32;
    while target.exists() {
        target = if ext.is_empty() {
            archive_dir.join(format!("{}_{}", file_stem, counter))
        } else {
            archive_dir.join(format!("{}_{}.{}", file_stem, counter, ext))
        };
        counter += 1;
    }

    target
}

/// Move every image left in the pool into `archive_dir`.
///
/// Individual failures are logged and reported but never abort the sweep, and
/// files already moved stay moved.
pub fn archive_unclaimed(
    archive_dir: &Path,
    pool: UnclaimedPool,
    mut progress_cb: Option<&mut dyn FnMut(ArchiveProgress)>,
) -> Result<ArchiveOutcome> {
    let images = pool.into_images();
    let mut outcome = ArchiveOutcome::default();

    if let Some(ref mut cb) = progress_cb {
        cb(ArchiveProgress::Start {
            total: images.len(),
        });
    }

    if !images.is_empty() {
        fs::create_dir_all(archive_dir)?;
    }

    for image in images {
        if !image.path.exists() {
            continue;
        }
        let target = build_archive_path(archive_dir, &image.path);
        match fs::rename(&image.path, &target) {
            Ok(()) => {
                if let Some(ref mut cb) = progress_cb {
                    cb(ArchiveProgress::Moved {
                        source: image.path.clone(),
                        target: target.clone(),
                    });
                }
                outcome.moved.push((image.path, target));
            }
            Err(e) => {
                warn!(path = %image.path.display(), error = %e, "failed to archive image");
                if let Some(ref mut cb) = progress_cb {
                    cb(ArchiveProgress::Failed {
                        path: image.path.clone(),
                        message: e.to_string(),
                    });
                }
                outcome.failed.push((image.path, e.to_string()));
            }
        }
    }

    if let Some(ref mut cb) = progress_cb {
        cb(ArchiveProgress::Complete {
            moved: outcome.moved.len(),
            failed: outcome.failed.len(),
        });
    }

    Ok(outcome)
}
