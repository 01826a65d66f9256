//! # Cursor 模块
//!
//! 光标闪烁：不依赖定时器的连续透明度振荡。
//!
//! 透明度按 1 → 0 → 1 往返，每段时长为 `cursorBlinkDuration`，
//! 使用二次缓入缓出曲线。闪烁是时间的纯函数，宿主在绘制时按当前时间取值。

use std::time::Duration;

/// 二次缓入缓出
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// 光标闪烁振荡器
#[derive(Debug, Clone, PartialEq)]
pub struct CursorBlink {
    /// 单程时长（秒）
    half_period: f32,
    /// 振荡开始的时间点，None 表示未运行
    started_at: Option<Duration>,
}

impl CursorBlink {
    pub fn new(half_period: f32) -> Self {
        Self {
            half_period,
            started_at: None,
        }
    }

    pub fn half_period(&self) -> f32 {
        self.half_period
    }

    /// 完整周期（秒）
    pub fn period(&self) -> f32 {
        self.half_period * 2.0
    }

    /// 从 `now` 开始振荡，透明度重置为 1
    pub fn start(&mut self, now: Duration) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// `now` 时刻的透明度
    ///
    /// 未运行或单程时长非正时恒为 1。
    pub fn opacity(&self, now: Duration) -> f32 {
        let Some(start) = self.started_at else {
            return 1.0;
        };
        if self.half_period <= 0.0 || !self.half_period.is_finite() {
            return 1.0;
        }

        let elapsed = now.saturating_sub(start).as_secs_f32();
        let t = elapsed % self.period();
        if t < self.half_period {
            1.0 - ease_in_out_quad(t / self.half_period)
        } else {
            ease_in_out_quad((t - self.half_period) / self.half_period)
        }
    }
}
