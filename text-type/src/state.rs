//! # State 模块
//!
//! 打字动画的运行时状态。
//!
//! ## 设计原则
//!
//! - 状态由单个动画实例独占，所有字段都显式建模
//! - 可序列化，便于调试输出与快照比对
//! - 目标文本不存储，由配置和 `active_text_index` 推导

use serde::{Deserialize, Serialize};

/// 状态机阶段
///
/// ```text
/// Idle ──可见──► TypingForward ──打完(多条)──► PausedBeforeDelete
///                  │   ▲                           │
///          打完(单条/分行)  │                        Deleting
///                  ▼   └──── PausedBeforeNext ◄────┤ 删空(继续)
///               Complete ◄─────────────────────────┘ 删空(最后一条且不循环)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// 尚未开始（不可见或没有可打的文本）
    #[default]
    Idle,
    /// 正在逐字打出
    TypingForward,
    /// 打完后等待删除
    PausedBeforeDelete,
    /// 正在逐字删除
    Deleting,
    /// 删空后等待下一条
    PausedBeforeNext,
    /// 终止，不再有任何状态变化
    Complete,
}

impl Phase {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// 是否正在推进（会预约定时器）
    pub fn is_running(&self) -> bool {
        !matches!(self, Self::Idle | Self::Complete)
    }
}

/// 动画状态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    /// 当前显示的文本
    pub displayed_text: String,
    /// 已提交的字符数
    pub char_index: usize,
    /// 是否处于删除阶段
    pub is_deleting: bool,
    /// 当前条目索引（分行模式下恒为 0）
    pub active_text_index: usize,
    /// 是否已进入视口
    pub is_visible: bool,
    /// 当前阶段
    pub phase: Phase,
}

impl AnimationState {
    /// 创建初始状态
    pub fn new(is_visible: bool) -> Self {
        Self {
            is_visible,
            ..Self::default()
        }
    }

    /// 回到初始状态，保留可见性
    pub fn reset(&mut self) {
        *self = Self::new(self.is_visible);
    }

    /// 当前显示的字符数
    pub fn displayed_len(&self) -> usize {
        self.displayed_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_visibility() {
        let mut state = AnimationState::new(true);
        state.displayed_text.push_str("Hi");
        state.char_index = 2;
        state.active_text_index = 1;
        state.phase = Phase::Deleting;
        state.is_deleting = true;

        state.reset();
        assert_eq!(state, AnimationState::new(true));
        assert!(state.is_visible);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_phase_flags() {
        assert!(!Phase::Idle.is_running());
        assert!(Phase::Deleting.is_running());
        assert!(Phase::PausedBeforeNext.is_running());
        assert!(Phase::Complete.is_terminal());
        assert!(!Phase::Complete.is_running());
    }

    #[test]
    fn test_state_serialization() {
        let mut state = AnimationState::new(false);
        state.displayed_text = "你好".to_string();
        state.char_index = 2;
        state.phase = Phase::TypingForward;
        assert_eq!(state.displayed_len(), 2);

        let json = serde_json::to_string(&state).unwrap();
        let restored: AnimationState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
