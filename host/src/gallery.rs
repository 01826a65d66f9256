//! # Gallery 模块
//!
//! 画廊分区的图片列表来源与渲染。
//!
//! 图片列表由 [`ImageCatalog`] 提供：
//! - [`ConfigCatalog`]：直接使用配置中列出的图片
//! - [`FsCatalog`]：扫描分区目录中的图片文件（按路径排序）

use std::path::{Path, PathBuf};

use text_type::{Element, RenderNode};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{GallerySection, SiteConfig};

/// 识别为图片的扩展名
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "avif"];

/// 图片列表来源
pub trait ImageCatalog {
    /// 返回分区的有序图片引用
    fn images(&self, section: &GallerySection) -> Vec<String>;
}

/// 配置列出的图片
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigCatalog;

impl ImageCatalog for ConfigCatalog {
    fn images(&self, section: &GallerySection) -> Vec<String> {
        section.images.clone()
    }
}

/// 文件系统目录扫描
#[derive(Debug, Clone)]
pub struct FsCatalog {
    base: PathBuf,
}

impl FsCatalog {
    /// `base` 为配置文件所在目录
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn scan(&self, dir: &Path) -> Option<Vec<String>> {
        let root = SiteConfig::resolve_dir(&self.base, dir);
        if !root.is_dir() {
            warn!(dir = %root.display(), "画廊目录不存在，使用配置列出的图片");
            return None;
        }

        let mut images: Vec<String> = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "跳过无法读取的画廊条目");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_image(entry.path()))
            // 配置目录之外的图片（绝对路径、`../`）保留完整路径
            .map(|entry| {
                let path = entry.path();
                let path = path.strip_prefix(&self.base).unwrap_or(path);
                path.to_string_lossy().replace('\\', "/")
            })
            .collect();
        images.sort();
        debug!(dir = %root.display(), count = images.len(), "扫描画廊目录");
        Some(images)
    }
}

impl ImageCatalog for FsCatalog {
    fn images(&self, section: &GallerySection) -> Vec<String> {
        section
            .dir
            .as_deref()
            .and_then(|dir| self.scan(dir))
            .unwrap_or_else(|| section.images.clone())
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// 已解析图片列表的画廊分区
#[derive(Debug, Clone, PartialEq)]
pub struct Gallery {
    pub title: String,
    pub images: Vec<String>,
}

impl Gallery {
    /// 通过 catalog 解析分区
    pub fn resolve(section: &GallerySection, catalog: &dyn ImageCatalog) -> Self {
        Self {
            title: section.title.clone(),
            images: catalog.images(section),
        }
    }

    /// 占用的行数：标题、图片（至少一行）、空行
    pub fn rows(&self) -> usize {
        2 + self.images.len().max(1)
    }

    pub fn render(&self) -> RenderNode {
        let mut list = Element::new("ul").with_class("gallery__images");
        for image in &self.images {
            list = list.with_child(
                Element::new("li")
                    .with_class("gallery__image")
                    .with_child(image.as_str()),
            );
        }
        Element::new("section")
            .with_class("gallery")
            .with_child(
                Element::new("h2")
                    .with_class("gallery__title")
                    .with_child(self.title.as_str()),
            )
            .with_child(list)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_config_catalog() {
        let section = GallerySection::new("Plan", vec!["a.png".to_string(), "b.png".to_string()]);
        let gallery = Gallery::resolve(&section, &ConfigCatalog);
        assert_eq!(gallery.images, ["a.png", "b.png"]);
        assert_eq!(gallery.rows(), 4);
    }

    #[test]
    fn test_fs_catalog_scans_sorted_images() {
        let dir = tempfile::tempdir().unwrap();
        let shots = dir.path().join("shots");
        fs::create_dir_all(shots.join("nested")).unwrap();
        fs::write(shots.join("b.PNG"), b"").unwrap();
        fs::write(shots.join("a.jpg"), b"").unwrap();
        fs::write(shots.join("notes.txt"), b"").unwrap();
        fs::write(shots.join("nested").join("c.webp"), b"").unwrap();

        let section = GallerySection {
            title: "Prep".to_string(),
            images: vec!["fallback.png".to_string()],
            dir: Some(PathBuf::from("shots")),
        };
        let catalog = FsCatalog::new(dir.path());
        assert_eq!(
            catalog.images(&section),
            ["shots/a.jpg", "shots/b.PNG", "shots/nested/c.webp"]
        );
    }

    #[test]
    fn test_fs_catalog_keeps_paths_outside_base() {
        let base = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("a.png"), b"").unwrap();

        let section = GallerySection {
            title: "Cook".to_string(),
            images: vec!["fallback.png".to_string()],
            dir: Some(outside.path().to_path_buf()),
        };
        let images = FsCatalog::new(base.path()).images(&section);
        let expected = outside.path().join("a.png").to_string_lossy().replace('\\', "/");
        assert_eq!(images, [expected]);
    }

    #[test]
    fn test_fs_catalog_falls_back_to_listed_images() {
        let dir = tempfile::tempdir().unwrap();
        let section = GallerySection {
            title: "Eat".to_string(),
            images: vec!["fallback.png".to_string()],
            dir: Some(PathBuf::from("missing")),
        };
        let catalog = FsCatalog::new(dir.path());
        assert_eq!(catalog.images(&section), ["fallback.png"]);
    }

    #[test]
    fn test_render_gallery() {
        let gallery = Gallery {
            title: "Eat well".to_string(),
            images: vec!["eat.png".to_string()],
        };
        let node = gallery.render();
        assert_eq!(node.find_by_class("gallery__image").len(), 1);
        assert_eq!(node.text_content(), "Eat welleat.png");
    }
}
