use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

/// Extensions treated as images (compared lowercase).
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "svg"];

/// An image discovered under the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Root-relative web path with a leading `/` and forward slashes.
    pub web_path: String,
}

impl ImageFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let web_path = web_path(root, &path);
        Self { path, web_path }
    }

    /// Lowercased file name including the extension.
    pub fn file_name_lower(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Lowercased file name without its extension.
    pub fn stem_lower(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Express `path` relative to `root` as `/a/b/c.png`.
pub fn web_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in rel.components() {
        if let std::path::Component::Normal(part) = component {
            out.push('/');
            out.push_str(&part.to_string_lossy());
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Immediate subdirectories of `dir`, sorted by name. Hidden directories are skipped.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() && !is_hidden(&entry) {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Image files directly inside `dir` (not recursive), sorted by name.
pub fn list_images(root: &Path, dir: &Path) -> Result<Vec<ImageFile>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            images.push(ImageFile::new(root, entry.into_path()));
        }
    }
    Ok(images)
}

/// Recursively collect every image under `root`, in file-name order.
///
/// Hidden directories are never entered. Directly under the root, the
/// directories named in `skip_top_level` (the owned entity directories and
/// the archive) are skipped as well.
pub fn scan_inventory(root: &Path, skip_top_level: &[&str]) -> Result<Vec<ImageFile>> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            if is_hidden(e) {
                return false;
            }
            let name = e.file_name().to_string_lossy();
            !(e.depth() == 1 && skip_top_level.iter().any(|s| *s == name))
        });

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            images.push(ImageFile::new(root, entry.into_path()));
        }
    }
    Ok(images)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
