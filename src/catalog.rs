//! The fixed, ordered list of source photographs.
//!
//! A catalog is one hero image followed by the target images, all living in
//! one source directory. Order only affects manifest ordering.

use std::path::{Path, PathBuf};

/// One source photograph. Identity is the filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Filename as configured, e.g. `img_1116.jpg`.
    pub identifier: String,
    pub path: PathBuf,
}

impl SourceImage {
    pub fn new(source_dir: &Path, filename: &str) -> Self {
        Self {
            identifier: filename.to_string(),
            path: source_dir.join(filename),
        }
    }

    /// Filename without its extension (`img_1116.jpg` → `img_1116`).
    ///
    /// Used for output naming and as the manifest identifier.
    pub fn base_name(&self) -> &str {
        Path::new(&self.identifier)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.identifier)
    }
}

#[derive(Debug, Clone)]
pub struct SourceCatalog {
    source_dir: PathBuf,
    images: Vec<SourceImage>,
}

impl SourceCatalog {
    pub fn new(source_dir: &Path, hero: &str, targets: &[String]) -> Self {
        let images = std::iter::once(hero)
            .chain(targets.iter().map(String::as_str))
            .map(|filename| SourceImage::new(source_dir, filename))
            .collect();
        Self {
            source_dir: source_dir.to_path_buf(),
            images,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Images in processing order, hero first.
    pub fn images(&self) -> &[SourceImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_comes_first() {
        let catalog = SourceCatalog::new(
            Path::new("src/sports"),
            "img_9050.jpg",
            &["img_1116.jpg".to_string(), "img_1128.jpg".to_string()],
        );
        let ids: Vec<&str> = catalog.images().iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, vec!["img_9050.jpg", "img_1116.jpg", "img_1128.jpg"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn paths_join_source_dir() {
        let catalog = SourceCatalog::new(Path::new("src/sports"), "img_9050.jpg", &[]);
        assert_eq!(
            catalog.images()[0].path,
            Path::new("src/sports").join("img_9050.jpg")
        );
        assert_eq!(catalog.source_dir(), Path::new("src/sports"));
    }

    #[test]
    fn base_name_strips_extension() {
        let image = SourceImage::new(Path::new("."), "img_1116.jpg");
        assert_eq!(image.base_name(), "img_1116");
    }

    #[test]
    fn base_name_keeps_inner_dots() {
        let image = SourceImage::new(Path::new("."), "team.photo.2024.jpeg");
        assert_eq!(image.base_name(), "team.photo.2024");
    }

    #[test]
    fn base_name_without_extension() {
        let image = SourceImage::new(Path::new("."), "README");
        assert_eq!(image.base_name(), "README");
    }
}
