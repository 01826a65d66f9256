//! UPlate - 终端宿主
//!
//! 加载站点配置，组装页面外壳，驱动打字动画与滚动揭示并输出到终端。

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use host::{AppState, FsCatalog, SiteConfig};
use text_type::RngSource;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "uplate")]
#[command(about = "UPlate 落地页的终端演示")]
#[command(version)]
struct Cli {
    /// 站点配置文件
    #[arg(short, long, default_value = "site.json")]
    config: PathBuf,

    /// 实时模式的运行时长（毫秒）
    #[arg(long, default_value = "8000")]
    duration_ms: u64,

    /// 无头模式：以虚拟时钟输出 N 帧后退出
    #[arg(long)]
    frames: Option<u64>,

    /// 配置文件无效时直接报错，而不是回退到默认配置
    #[arg(long)]
    strict: bool,

    /// 日志级别（off/error/warn/info/debug/trace）
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let config = if cli.strict {
        SiteConfig::load_strict(&cli.config)
            .with_context(|| format!("无法加载配置文件 {}", cli.config.display()))?
    } else {
        SiteConfig::load(&cli.config)
    };
    config.validate().context("站点配置无效")?;

    for diagnostic in &config.diagnostics().diagnostics {
        warn!("{}", diagnostic);
    }

    let base = cli
        .config
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let catalog = FsCatalog::new(base);
    let mut app = AppState::new(&config, &catalog, RngSource::thread());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.frames {
        Some(frames) => app.run_headless(frames, &mut out)?,
        None => app.run_realtime(Duration::from_millis(cli.duration_ms), &mut out)?,
    }

    info!(frames = app.frame, "退出");
    Ok(())
}
