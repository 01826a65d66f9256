//! # App 模块
//!
//! 应用状态与主循环逻辑。
//!
//! 两种运行方式共用同一套 update / draw：
//! - 实时模式：墙钟驱动，按帧间隔休眠，覆盖式刷新终端
//! - 无头模式：虚拟时钟按帧间隔前进，逐帧输出，便于测试和录制

mod draw;
mod update;

pub use draw::*;
pub use update::*;

use std::io::Write;
use std::time::{Duration, Instant};

use text_type::RandomSource;
use tracing::{debug, info};

use crate::config::{SiteConfig, TerminalConfig};
use crate::gallery::ImageCatalog;
use crate::page::Page;

/// 应用状态
pub struct AppState<R: RandomSource> {
    /// 页面
    pub page: Page<R>,
    /// 终端配置
    pub terminal: TerminalConfig,
    /// 已绘制的帧数
    pub frame: u64,
}

impl<R: RandomSource> AppState<R> {
    pub fn new(config: &SiteConfig, catalog: &dyn ImageCatalog, random: R) -> Self {
        Self {
            page: Page::mount(config, catalog, random),
            terminal: config.terminal.clone(),
            frame: 0,
        }
    }

    /// 第 `frame` 帧的时刻（溢出时饱和）
    pub fn frame_time(&self, frame: u64) -> Duration {
        Duration::from_millis(self.terminal.frame_interval_ms.saturating_mul(frame))
    }

    /// 无头运行 `frames` 帧，时钟从 0 开始按帧间隔前进
    pub fn run_headless(&mut self, frames: u64, out: &mut impl Write) -> std::io::Result<()> {
        info!(frames, "无头模式启动");
        for _ in 0..frames {
            let now = self.frame_time(self.frame);
            update(self, now);
            writeln!(out, "--- frame {} @ {}ms ---", self.frame, now.as_millis())?;
            draw(self, now, out)?;
            self.frame += 1;
        }
        out.flush()
    }

    /// 实时运行到 `duration`
    pub fn run_realtime(&mut self, duration: Duration, out: &mut impl Write) -> std::io::Result<()> {
        info!(duration_ms = duration.as_millis() as u64, "实时模式启动");
        let start = Instant::now();
        loop {
            let now = start.elapsed();
            update(self, now);
            write!(out, "\x1b[H\x1b[2J")?;
            draw(self, now, out)?;
            out.flush()?;
            self.frame += 1;

            if now >= duration {
                break;
            }
            let next = self.frame_time(self.frame);
            if let Some(wait) = next.checked_sub(start.elapsed()) {
                std::thread::sleep(wait);
            }
        }
        debug!(frames = self.frame, "实时模式结束");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::ConfigCatalog;
    use text_type::FixedSequence;

    #[test]
    fn test_frame_time_saturates() {
        let mut config = SiteConfig::default();
        config.terminal.frame_interval_ms = u64::MAX / 2;
        let app = AppState::new(&config, &ConfigCatalog, FixedSequence::default());
        assert_eq!(app.frame_time(1), Duration::from_millis(u64::MAX / 2));
        assert_eq!(app.frame_time(3), Duration::from_millis(u64::MAX));

        config.terminal.frame_interval_ms = 50;
        let app = AppState::new(&config, &ConfigCatalog, FixedSequence::default());
        let frame = u64::from(u32::MAX) + 2;
        assert_eq!(app.frame_time(frame), Duration::from_millis(50 * frame));
    }
}
