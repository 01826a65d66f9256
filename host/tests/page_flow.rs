//! # 页面流程集成测试
//!
//! 测试 SiteConfig → Page → AppState → 终端帧 的执行链路。
//! 这些测试使用虚拟时钟，不依赖真实终端。

use std::fs;
use std::time::Duration;

use host::{AppState, ConfigCatalog, FsCatalog, Page, SiteConfig, SiteConfigError};
use text_type::{AnimationConfig, FixedSequence, Phase};

fn small_site() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.hero.tagline.text = "Meal prep".into();
    config.hero.tagline.looping = false;
    config.reveal.text = "plan cook eat".to_string();
    config.terminal.width = 30;
    config.terminal.viewport_height = 6;
    config.terminal.frame_interval_ms = 100;
    config.terminal.scroll_after_ms = 1000;
    config.terminal.scroll_step = 1.0;
    config
}

/// 无头模式：逐帧输出，标语逐字出现
#[test]
fn test_headless_frames() {
    let config = small_site();
    let mut app = AppState::new(&config, &ConfigCatalog, FixedSequence::default());
    let mut out = Vec::new();
    app.run_headless(12, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("--- frame 0 @ 0ms ---"));
    assert!(text.contains("--- frame 11 @ 1100ms ---"));
    assert!(text.contains("UPlate"));
    assert_eq!(app.frame, 12);

    // 9 个字符 × 50ms，1100ms 时早已打完
    assert_eq!(app.page.tagline().state().displayed_text, "Meal prep");
    assert_eq!(app.page.tagline().phase(), Phase::Complete);
    assert!(app.page.completed().is_empty());
}

/// 停留结束后开始滚动，滚到揭示段落时逐词显现
#[test]
fn test_scroll_reveals_paragraph() {
    let config = small_site();
    let mut app = AppState::new(&config, &ConfigCatalog, FixedSequence::default());
    let mut out = Vec::new();

    app.run_headless(10, &mut out).unwrap();
    assert_eq!(app.page.scroll(), 0.0);
    assert_eq!(app.page.reveal().revealed(), 0);

    app.run_headless(60, &mut out).unwrap();
    assert_eq!(app.page.scroll(), app.page.layout().max_scroll());
    assert!(app.page.reveal().is_complete());

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("plan cook eat"));
}

/// 多条标语循环时，完成回调按顺序记录
#[test]
fn test_tagline_sequence_reports_completions() {
    let mut config = small_site();
    config.hero.tagline.text = vec!["ab", "cd"].into();
    config.hero.tagline.looping = true;
    config.hero.tagline.pause_duration = 100;

    let mut app = AppState::new(&config, &ConfigCatalog, FixedSequence::default());
    let mut out = Vec::new();
    app.run_headless(40, &mut out).unwrap();

    let completed = app.page.completed();
    assert!(completed.len() >= 2);
    assert_eq!(completed[0], ("ab".to_string(), 0));
    assert_eq!(completed[1], ("cd".to_string(), 1));
}

/// 零速度循环：每帧都能返回，索引逐帧轮换 0,1,0,1
#[test]
fn test_zero_delay_loop_yields_between_frames() {
    let mut config = small_site();
    config.hero.tagline = AnimationConfig {
        typing_speed: 0,
        initial_delay: 0,
        pause_duration: 0,
        deleting_speed: 0,
        looping: true,
        ..AnimationConfig::new(vec!["Hi", "Bye"])
    };
    config.validate().unwrap();

    let mut page = Page::mount(&config, &ConfigCatalog, FixedSequence::default());
    let mut indices = vec![page.tagline().state().active_text_index];
    for frame in 0..200u64 {
        page.tick(Duration::from_millis(frame * 50));
        let index = page.tagline().state().active_text_index;
        if indices.last() != Some(&index) {
            indices.push(index);
        }
    }

    assert!(indices.len() >= 4);
    assert_eq!(indices[..4], [0, 1, 0, 1]);
    let completed = page.completed();
    assert_eq!(completed[0], ("Hi".to_string(), 0));
    assert_eq!(completed[1], ("Bye".to_string(), 1));
}

/// 配置保存 / 严格加载 / 回退加载
#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.json");

    let config = small_site();
    config.save(&path).unwrap();
    let loaded = SiteConfig::load_strict(&path).unwrap();
    assert_eq!(loaded.hero.tagline, config.hero.tagline);
    assert_eq!(loaded.terminal.width, 30);

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        SiteConfig::load_strict(&path),
        Err(SiteConfigError::SerializationFailed(_))
    ));
    // 宽松加载回退到默认值
    assert_eq!(SiteConfig::load(&path).terminal.width, 60);

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        SiteConfig::load_strict(&missing),
        Err(SiteConfigError::IoError(_))
    ));
    assert_eq!(SiteConfig::load(&missing).hero.brand, "UPlate");
}

/// 画廊目录扫描进入页面
#[test]
fn test_gallery_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("shots")).unwrap();
    fs::write(dir.path().join("shots").join("cook.png"), b"").unwrap();

    let json = r#"{
        "galleries": [ { "title": "Cook", "dir": "shots" } ],
        "terminal": { "width": 30, "viewport_height": 6 }
    }"#;
    let config: SiteConfig = serde_json::from_str(json).unwrap();
    let app = AppState::new(
        &config,
        &FsCatalog::new(dir.path()),
        FixedSequence::default(),
    );

    let galleries = app.page.galleries();
    assert_eq!(galleries.len(), 1);
    assert_eq!(galleries[0].images, ["shots/cook.png"]);

    let lines = app.page.lines(Duration::ZERO);
    assert!(lines.iter().any(|l| l.trim() == "- shots/cook.png"));
}

/// 绝对路径的画廊目录同样能扫描到图片
#[test]
fn test_gallery_from_absolute_directory() {
    let shots = tempfile::tempdir().unwrap();
    fs::write(shots.path().join("a.png"), b"").unwrap();
    let base = tempfile::tempdir().unwrap();

    let mut config = small_site();
    config.galleries = vec![host::GallerySection {
        title: "Plan".to_string(),
        images: vec!["fallback.png".to_string()],
        dir: Some(shots.path().to_path_buf()),
    }];
    let app = AppState::new(
        &config,
        &FsCatalog::new(base.path()),
        FixedSequence::default(),
    );

    let expected = shots.path().join("a.png").to_string_lossy().replace('\\', "/");
    assert_eq!(app.page.galleries()[0].images, [expected]);
}
