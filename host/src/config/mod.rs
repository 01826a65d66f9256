//! # Config 模块
//!
//! 站点配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (site.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use text_type::{AnimationConfig, DiagnosticLevel, DiagnosticResult, RevealBand, check_config};
use thiserror::Error;
use tracing::{info, warn};

/// 站点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// 首屏
    #[serde(default)]
    pub hero: HeroConfig,

    /// 滚动揭示段落
    #[serde(default)]
    pub reveal: RevealConfig,

    /// 画廊（按顺序排列）
    #[serde(default = "default_galleries")]
    pub galleries: Vec<GallerySection>,

    /// 终端配置
    #[serde(default)]
    pub terminal: TerminalConfig,
}

/// 首屏配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroConfig {
    /// 品牌名
    #[serde(default = "default_brand")]
    pub brand: String,

    /// 标语打字动画
    #[serde(default = "default_tagline")]
    pub tagline: AnimationConfig,
}

/// 滚动揭示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// 段落文本
    #[serde(default = "default_reveal_text")]
    pub text: String,

    /// 视口中的揭示区间
    #[serde(default)]
    pub band: RevealBand,
}

/// 画廊分区
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GallerySection {
    /// 标题
    pub title: String,

    /// 直接列出的图片
    #[serde(default)]
    pub images: Vec<String>,

    /// 图片目录（相对于配置文件所在目录）
    ///
    /// 设置后由目录扫描提供图片列表，`images` 仅在目录不可读时作为后备。
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl GallerySection {
    pub fn new(title: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            title: title.into(),
            images,
            dir: None,
        }
    }
}

/// 终端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// 页面宽度（列）
    #[serde(default = "default_width")]
    pub width: usize,

    /// 视口高度（行）
    #[serde(default = "default_viewport_height")]
    pub viewport_height: usize,

    /// 帧间隔（毫秒）
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// 每帧滚动的行数
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f32,

    /// 开始滚动前的停留时间（毫秒）
    #[serde(default = "default_scroll_after_ms")]
    pub scroll_after_ms: u64,
}

// 默认值函数
fn default_brand() -> String {
    "UPlate".to_string()
}

fn default_tagline() -> AnimationConfig {
    AnimationConfig {
        tag: "div".to_string(),
        class_name: "typing".to_string(),
        typing_speed: 50,
        pause_duration: 2000,
        show_cursor: true,
        cursor_character: "|".to_string(),
        hide_cursor_while_typing: false,
        ..AnimationConfig::new("Your new college meal prep buddy")
    }
}

fn default_reveal_text() -> String {
    "Plan the week, shop once, and cook meals that fit a student budget. \
     UPlate turns your class schedule into a prep plan you can actually keep."
        .to_string()
}

fn default_galleries() -> Vec<GallerySection> {
    vec![
        GallerySection::new(
            "Plan your week",
            vec!["screens/plan-week.png".to_string(), "screens/plan-grocery.png".to_string()],
        ),
        GallerySection::new(
            "Prep together",
            vec!["screens/prep-steps.png".to_string(), "screens/prep-timer.png".to_string()],
        ),
        GallerySection::new("Eat well", vec!["screens/eat-macros.png".to_string()]),
    ]
}

fn default_width() -> usize {
    60
}

fn default_viewport_height() -> usize {
    12
}

fn default_frame_interval_ms() -> u64 {
    50
}

fn default_scroll_step() -> f32 {
    0.5
}

fn default_scroll_after_ms() -> u64 {
    3000
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hero: HeroConfig::default(),
            reveal: RevealConfig::default(),
            galleries: default_galleries(),
            terminal: TerminalConfig::default(),
        }
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            tagline: default_tagline(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            text: default_reveal_text(),
            band: RevealBand::default(),
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            viewport_height: default_viewport_height(),
            frame_interval_ms: default_frame_interval_ms(),
            scroll_step: default_scroll_step(),
            scroll_after_ms: default_scroll_after_ms(),
        }
    }
}

impl SiteConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并输出警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载配置文件，任何错误都直接返回
    pub fn load_strict(path: impl AsRef<Path>) -> Result<Self, SiteConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        info!(path = %path.display(), "配置文件加载成功");
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SiteConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), SiteConfigError> {
        if self.hero.brand.trim().is_empty() {
            return Err(SiteConfigError::ValidationFailed(
                "品牌名不能为空".to_string(),
            ));
        }

        let diagnostics = self.diagnostics();
        if let Some(first) = diagnostics.filter_by_level(DiagnosticLevel::Error).first() {
            return Err(SiteConfigError::ValidationFailed(first.to_string()));
        }

        let band = self.reveal.band;
        let in_range = |v: f32| (0.0..=1.0).contains(&v);
        if !in_range(band.start) || !in_range(band.end) {
            return Err(SiteConfigError::ValidationFailed(
                "揭示区间必须在 0.0 - 1.0 之间".to_string(),
            ));
        }
        if band.start <= band.end {
            return Err(SiteConfigError::ValidationFailed(format!(
                "揭示区间起点（{}）必须低于终点（{}）",
                band.start, band.end
            )));
        }

        if let Some(idx) = self.galleries.iter().position(|g| g.title.trim().is_empty()) {
            return Err(SiteConfigError::ValidationFailed(format!(
                "第 {} 个画廊缺少标题",
                idx
            )));
        }

        if self.terminal.width < 20 {
            return Err(SiteConfigError::ValidationFailed(
                "终端宽度至少 20 列".to_string(),
            ));
        }
        if self.terminal.viewport_height < 4 {
            return Err(SiteConfigError::ValidationFailed(
                "视口高度至少 4 行".to_string(),
            ));
        }
        if self.terminal.frame_interval_ms == 0 {
            return Err(SiteConfigError::ValidationFailed(
                "帧间隔必须大于 0".to_string(),
            ));
        }
        if !(self.terminal.scroll_step.is_finite() && self.terminal.scroll_step >= 0.0) {
            return Err(SiteConfigError::ValidationFailed(
                "滚动步长必须为非负数".to_string(),
            ));
        }

        Ok(())
    }

    /// 动画配置诊断（不阻塞）
    pub fn diagnostics(&self) -> DiagnosticResult {
        check_config("hero.tagline", &self.hero.tagline)
    }

    /// 解析配置中的相对路径
    pub fn resolve_dir(base: &Path, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base.join(dir)
        }
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum SiteConfigError {
    /// 序列化 / 解析失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.hero.brand, "UPlate");
        assert_eq!(
            config.hero.tagline.entries(),
            ["Your new college meal prep buddy".to_string()]
        );
        assert_eq!(config.hero.tagline.typing_speed, 50);
        assert_eq!(config.hero.tagline.pause_duration, 2000);
        assert_eq!(config.terminal.width, 60);
        assert_eq!(config.galleries.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "hero": { "tagline": { "text": ["Plan", "Cook"], "typingSpeed": 30 } },
            "terminal": { "width": 40 }
        }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hero.brand, "UPlate");
        assert_eq!(config.hero.tagline.entries().len(), 2);
        assert_eq!(config.hero.tagline.typing_speed, 30);
        assert_eq!(config.hero.tagline.pause_duration, 2000);
        assert_eq!(config.terminal.width, 40);
        assert_eq!(config.terminal.viewport_height, 12);
        assert_eq!(config.reveal.band, RevealBand::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = SiteConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        // 反序列化
        let loaded: SiteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.hero.tagline, config.hero.tagline);
        assert_eq!(loaded.galleries, config.galleries);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SiteConfig::default();

        // 空文本序列：动画配置错误
        config.hero.tagline.text = Vec::<String>::new().into();
        assert!(matches!(
            config.validate(),
            Err(SiteConfigError::ValidationFailed(_))
        ));

        config.hero.tagline = default_tagline();
        config.reveal.band = RevealBand { start: 0.3, end: 0.6 };
        assert!(config.validate().is_err());

        config.reveal.band = RevealBand::default();
        config.terminal.frame_interval_ms = 0;
        assert!(config.validate().is_err());

        config.terminal.frame_interval_ms = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_dir() {
        let base = Path::new("site");
        assert_eq!(
            SiteConfig::resolve_dir(base, Path::new("img")),
            PathBuf::from("site").join("img")
        );
    }
}
