//! # Host 层
//!
//! UPlate 落地页的终端宿主实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 站点配置加载与验证
//! - 页面外壳组装（首屏、滚动揭示、画廊）
//! - 时钟与滚动驱动
//! - 把渲染树输出为终端帧
//!
//! Host 层不包含动画逻辑，只负责把时间和视口变化交给 `text-type` 组件。

pub mod app;
pub mod config;
pub mod frame;
pub mod gallery;
pub mod page;

pub use app::AppState;
pub use config::{
    GallerySection, HeroConfig, RevealConfig, SiteConfig, SiteConfigError, TerminalConfig,
};
pub use gallery::{ConfigCatalog, FsCatalog, Gallery, ImageCatalog};
pub use page::{Page, PageLayout, SharedQueue, SharedTracker, Tagline};
