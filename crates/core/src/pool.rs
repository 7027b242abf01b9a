use crate::scanner::ImageFile;

/// Images not yet attributed to any entity, in discovery order.
///
/// Keyed by web path, so two files sharing a basename in different folders
/// are tracked separately. Each phase takes the pool by value and hands it
/// back with whatever it consumed removed.
#[derive(Debug, Clone, Default)]
pub struct UnclaimedPool {
    images: Vec<ImageFile>,
}

impl UnclaimedPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_images(images: impl IntoIterator<Item = ImageFile>) -> Self {
        let mut pool = Self::new();
        pool.extend(images);
        pool
    }

    /// Add an image unless one with the same web path is already present.
    pub fn push(&mut self, image: ImageFile) {
        if !self.contains(&image.web_path) {
            self.images.push(image);
        }
    }

    pub fn extend(&mut self, images: impl IntoIterator<Item = ImageFile>) {
        for image in images {
            self.push(image);
        }
    }

    pub fn contains(&self, web_path: &str) -> bool {
        self.images.iter().any(|i| i.web_path == web_path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageFile> {
        self.images.iter()
    }

    /// Remove and return the first image accepted by `pred`.
    pub fn take_first(&mut self, mut pred: impl FnMut(&ImageFile) -> bool) -> Option<ImageFile> {
        let idx = self.images.iter().position(|i| pred(i))?;
        Some(self.images.remove(idx))
    }

    /// Remove and return up to `limit` images accepted by `pred`, in pool order.
    pub fn take_up_to(
        &mut self,
        limit: usize,
        mut pred: impl FnMut(&ImageFile) -> bool,
    ) -> Vec<ImageFile> {
        let mut taken = Vec::new();
        let mut idx = 0;
        while idx < self.images.len() && taken.len() < limit {
            if pred(&self.images[idx]) {
                taken.push(self.images.remove(idx));
            } else {
                idx += 1;
            }
        }
        taken
    }

    pub fn into_images(self) -> Vec<ImageFile> {
        self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn img(path: &str) -> ImageFile {
        ImageFile::new(Path::new("/root"), PathBuf::from(format!("/root{path}")))
    }

    #[test]
    fn test_push_dedupes_by_web_path() {
        let mut pool = UnclaimedPool::new();
        pool.push(img("/a/logo.png"));
        pool.push(img("/a/logo.png"));
        pool.push(img("/b/logo.png"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_take_first_removes_in_order() {
        let mut pool = UnclaimedPool::from_images(vec![
            img("/x.png"),
            img("/logo-a.png"),
            img("/logo-b.png"),
        ]);
        let taken = pool.take_first(|i| i.file_name_lower().contains("logo")).unwrap();
        assert_eq!(taken.web_path, "/logo-a.png");
        assert_eq!(pool.len(), 2);
        assert!(!pool.contains("/logo-a.png"));
    }

    #[test]
    fn test_take_first_none_leaves_pool_untouched() {
        let mut pool = UnclaimedPool::from_images(vec![img("/x.png")]);
        assert!(pool.take_first(|_| false).is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_take_up_to_respects_limit() {
        let mut pool = UnclaimedPool::from_images(vec![
            img("/s1.png"),
            img("/other.png"),
            img("/s2.png"),
            img("/s3.png"),
        ]);
        let taken = pool.take_up_to(2, |i| i.file_name_lower().starts_with('s'));
        let paths: Vec<_> = taken.iter().map(|i| i.web_path.as_str()).collect();
        assert_eq!(paths, vec!["/s1.png", "/s2.png"]);
        let left: Vec<_> = pool.iter().map(|i| i.web_path.as_str()).collect();
        assert_eq!(left, vec!["/other.png", "/s3.png"]);
    }
}
