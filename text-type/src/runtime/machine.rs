//! # Machine 模块
//!
//! 打字状态机。
//!
//! ## 执行模型
//!
//! ```text
//! begin()   -> Option<Duration>   // 从 Idle 启动，返回首个定时器的延迟
//! advance() -> Advance            // 定时器到期：执行一步转移，返回下一次延迟
//! ```
//!
//! 状态机不持有定时器，也不读时钟：每一步只做一次转移，
//! 并告诉调用方"多久之后再叫我"。调用方可以同步驱动它。

use std::time::Duration;

use tracing::trace;

use crate::config::AnimationConfig;
use crate::random::RandomSource;
use crate::state::{AnimationState, Phase};

/// 一条完成的条目（删空后、切换到下一条之前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedEntry {
    /// 源条目（未反转）
    pub text: String,
    /// 条目索引
    pub index: usize,
}

/// 单步推进的结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Advance {
    /// 下一次推进前的等待；None 表示不再需要定时器
    pub wait: Option<Duration>,
    /// 本步完成的条目
    pub completed: Option<CompletedEntry>,
}

impl Advance {
    fn wait(delay: Duration) -> Self {
        Self {
            wait: Some(delay),
            completed: None,
        }
    }

    fn stop() -> Self {
        Self::default()
    }
}

/// 计算目标文本
///
/// 分行模式取各行拼接；否则取 `index` 处的条目（越界为空串）。
/// 反向模式下按字符反转。
pub fn target_text(config: &AnimationConfig, index: usize) -> String {
    let source = match config.active_split_lines() {
        Some(lines) => lines.concat(),
        None => config.entries().get(index).cloned().unwrap_or_default(),
    };
    if config.reverse_mode {
        source.chars().rev().collect()
    } else {
        source
    }
}

/// 打字状态机
#[derive(Debug, Clone)]
pub struct TypingMachine {
    config: AnimationConfig,
    state: AnimationState,
    /// 当前目标文本（按字符）
    target: Vec<char>,
}

impl TypingMachine {
    /// 以配置创建，初始阶段为 Idle
    pub fn new(config: AnimationConfig) -> Self {
        let target = target_text(&config, 0).chars().collect();
        let state = AnimationState::new(!config.start_on_visible);
        Self {
            config,
            state,
            target,
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// 当前目标文本
    pub fn target_text(&self) -> String {
        self.target.iter().collect()
    }

    /// 目标文本字符数
    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    /// 是否有可打的内容（分行模式或至少一条源文本）
    pub fn has_source(&self) -> bool {
        self.config.is_split() || !self.config.entries().is_empty()
    }

    /// 标记已进入视口
    pub fn mark_visible(&mut self) {
        self.state.is_visible = true;
    }

    /// 光标是否应在打字 / 删除进行中被隐藏
    pub fn is_cursor_suppressed(&self) -> bool {
        if !self.config.hide_cursor_while_typing {
            return false;
        }
        let mid_typing = self.state.char_index > 0 && self.state.char_index < self.target.len();
        mid_typing || self.state.is_deleting
    }

    /// 从 Idle 启动
    ///
    /// 不可见、已启动或没有源文本时返回 None。首个字符在
    /// `initialDelay` 再加一个字符延迟之后提交。
    pub fn begin<R: RandomSource + ?Sized>(&mut self, random: &mut R) -> Option<Duration> {
        if self.state.phase != Phase::Idle || !self.state.is_visible || !self.has_source() {
            return None;
        }
        self.state.phase = Phase::TypingForward;
        trace!(target_len = self.target.len(), "开始打字");
        Some(self.config.initial_delay() + self.char_delay(random))
    }

    /// 定时器到期时调用：执行一次转移
    pub fn advance<R: RandomSource + ?Sized>(&mut self, random: &mut R) -> Advance {
        match self.state.phase {
            Phase::Idle | Phase::Complete => Advance::stop(),

            Phase::TypingForward => {
                if let Some(&ch) = self.target.get(self.state.char_index) {
                    self.state.displayed_text.push(ch);
                    self.state.char_index += 1;
                }
                if self.state.char_index < self.target.len() {
                    Advance::wait(self.char_delay(random))
                } else {
                    self.finish_typing()
                }
            }

            Phase::PausedBeforeDelete => {
                self.state.phase = Phase::Deleting;
                self.state.is_deleting = true;
                trace!("开始删除");
                if self.state.displayed_text.is_empty() {
                    self.finish_entry()
                } else {
                    Advance::wait(self.config.deleting_delay())
                }
            }

            Phase::Deleting => {
                self.state.displayed_text.pop();
                if self.state.displayed_text.is_empty() {
                    self.finish_entry()
                } else {
                    Advance::wait(self.config.deleting_delay())
                }
            }

            Phase::PausedBeforeNext => {
                self.state.phase = Phase::TypingForward;
                trace!(index = self.state.active_text_index, "开始下一条");
                Advance::wait(self.char_delay(random))
            }
        }
    }

    /// 当前阶段重新预约定时器时应使用的延迟（重新配置后恢复）
    pub fn resume_delay<R: RandomSource + ?Sized>(&self, random: &mut R) -> Option<Duration> {
        match self.state.phase {
            Phase::Idle | Phase::Complete => None,
            Phase::TypingForward if self.state.char_index == 0 => {
                Some(self.config.initial_delay() + self.char_delay(random))
            }
            Phase::TypingForward => Some(self.char_delay(random)),
            Phase::PausedBeforeDelete | Phase::PausedBeforeNext => Some(self.config.pause()),
            Phase::Deleting => Some(self.config.deleting_delay()),
        }
    }

    /// 替换配置
    ///
    /// 源文本身份变化时回到 Idle 并返回 true；否则只更新计时参数。
    pub fn reconfigure(&mut self, config: AnimationConfig) -> bool {
        let reset = !self.config.same_source(&config);
        self.config = config;
        if reset {
            self.reset();
        }
        reset
    }

    /// 回到初始状态（保留可见性）
    pub fn reset(&mut self) {
        self.state.reset();
        self.target = target_text(&self.config, 0).chars().collect();
    }

    fn char_delay<R: RandomSource + ?Sized>(&self, random: &mut R) -> Duration {
        match self.config.variable_speed {
            Some(speed) => speed.sample(random.next_unit()),
            None => self.config.typing_delay(),
        }
    }

    /// 当前条目打完
    fn finish_typing(&mut self) -> Advance {
        if !self.config.is_split() && self.config.entries().len() > 1 {
            self.state.phase = Phase::PausedBeforeDelete;
            Advance::wait(self.config.pause())
        } else {
            self.state.phase = Phase::Complete;
            trace!("打字完成");
            Advance::stop()
        }
    }

    /// 当前条目删空
    fn finish_entry(&mut self) -> Advance {
        self.state.is_deleting = false;

        let entries = self.config.entries();
        let index = self.state.active_text_index;
        if index + 1 >= entries.len() && !self.config.looping {
            self.state.phase = Phase::Complete;
            trace!(index, "最后一条已删除，停止");
            return Advance::stop();
        }

        let completed = CompletedEntry {
            text: entries.get(index).cloned().unwrap_or_default(),
            index,
        };
        let next = (index + 1) % entries.len().max(1);

        self.state.active_text_index = next;
        self.state.char_index = 0;
        self.state.displayed_text.clear();
        self.state.phase = Phase::PausedBeforeNext;
        self.target = target_text(&self.config, next).chars().collect();

        Advance {
            wait: Some(self.config.pause()),
            completed: Some(completed),
        }
    }
}
