//! # Component 模块
//!
//! `TextType` 组件：把状态机、可见门、光标闪烁和完成回调组装起来，
//! 并负责定时器的预约与取消。
//!
//! ## 事件流
//!
//! ```text
//! Host                                TextType
//!   │── mount(config, ...) ─────────────►│ 观察元素 / 启动
//!   │── handle(Intersection) ───────────►│ 可见门打开 -> begin()
//!   │── handle(Timer(id)) ──────────────►│ advance() -> schedule(next)
//!   │◄── render(now) ────────────────────│
//!   │── unmount() ──────────────────────►│ 取消定时器 / 停止闪烁 / 释放观察
//! ```
//!
//! 每个实例同一时刻至多一个挂起的定时器：预约新定时器前先取消旧的，
//! 到期 ID 与记录不符（已取消或属于别的实例）的定时器事件直接忽略。

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::AnimationConfig;
use crate::cursor::CursorBlink;
use crate::input::AnimatorInput;
use crate::random::RandomSource;
use crate::render::{CursorView, RenderNode, text_type_view};
use crate::runtime::machine::TypingMachine;
use crate::scheduler::{Scheduler, TimerId};
use crate::state::{AnimationState, Phase};
use crate::visibility::{ElementId, ObservationId, VisibilityGate, VisibilityObserver};

/// 完成回调：`(完成的条目, 条目索引)`
pub type CompletionCallback = Box<dyn FnMut(&str, usize)>;

/// 打字动画组件
pub struct TextType<S, O, R>
where
    S: Scheduler,
    O: VisibilityObserver,
    R: RandomSource,
{
    machine: TypingMachine,
    gate: VisibilityGate,
    blink: CursorBlink,
    element: ElementId,
    scheduler: S,
    observer: O,
    random: R,
    pending: Option<TimerId>,
    on_complete: Option<CompletionCallback>,
    mounted: bool,
}

impl<S, O, R> TextType<S, O, R>
where
    S: Scheduler,
    O: VisibilityObserver,
    R: RandomSource,
{
    /// 挂载组件
    ///
    /// `now` 是宿主时钟的当前时间，用作光标闪烁的起点。
    pub fn mount(
        config: AnimationConfig,
        element: ElementId,
        scheduler: S,
        observer: O,
        random: R,
        now: Duration,
    ) -> Self {
        let gate = VisibilityGate::new(config.start_on_visible);
        let blink = CursorBlink::new(config.cursor_blink_duration);
        let mut component = Self {
            machine: TypingMachine::new(config),
            gate,
            blink,
            element,
            scheduler,
            observer,
            random,
            pending: None,
            on_complete: None,
            mounted: true,
        };

        debug!(
            element = element.0,
            start_on_visible = component.machine.config().start_on_visible,
            "挂载 TextType"
        );

        if component.machine.config().show_cursor {
            component.blink.start(now);
        }
        component.gate.arm(&mut component.observer, element);
        if component.gate.is_visible() {
            component.start();
        }
        component
    }

    /// 设置完成回调（替换已有回调）
    pub fn on_complete(&mut self, callback: impl FnMut(&str, usize) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// 处理一条输入，返回状态是否发生了变化
    pub fn handle(&mut self, input: AnimatorInput) -> bool {
        if !self.mounted {
            return false;
        }
        match input {
            AnimatorInput::Timer(id) => self.on_timer(id),
            AnimatorInput::Intersection { observation, ratio } => {
                if !self.gate.on_intersection(observation, ratio) {
                    return false;
                }
                debug!(element = self.element.0, ratio, "元素进入视口");
                self.gate.release(&mut self.observer);
                self.machine.mark_visible();
                self.start();
                true
            }
        }
    }

    fn on_timer(&mut self, id: TimerId) -> bool {
        if self.pending != Some(id) {
            trace!(timer = id.value(), "忽略过期定时器");
            return false;
        }
        self.pending = None;

        let step = self.machine.advance(&mut self.random);
        trace!(
            phase = ?self.machine.phase(),
            char_index = self.machine.state().char_index,
            "推进一步"
        );

        if let Some(done) = step.completed
            && let Some(callback) = self.on_complete.as_mut()
        {
            callback(&done.text, done.index);
        }
        if let Some(wait) = step.wait {
            self.schedule(wait);
        }
        true
    }

    /// 更换配置
    ///
    /// 总是先取消挂起的定时器；源文本身份变化时状态重置并重新开始，
    /// 否则以新参数恢复当前阶段。
    pub fn reconfigure(&mut self, config: AnimationConfig, now: Duration) {
        if !self.mounted {
            return;
        }
        self.cancel_pending();

        let blink_changed = config.show_cursor != self.machine.config().show_cursor
            || config.cursor_blink_duration != self.machine.config().cursor_blink_duration;
        let start_on_visible = config.start_on_visible;

        let reset = self.machine.reconfigure(config);
        debug!(element = self.element.0, reset, "重新配置 TextType");

        if blink_changed {
            self.blink = CursorBlink::new(self.machine.config().cursor_blink_duration);
            if self.machine.config().show_cursor {
                self.blink.start(now);
            }
        }

        if !start_on_visible && !self.gate.is_visible() {
            self.gate.open(&mut self.observer);
            self.machine.mark_visible();
        }
        if !self.gate.is_visible() {
            return;
        }

        if self.machine.phase() == Phase::Idle {
            self.start();
        } else if let Some(wait) = self.machine.resume_delay(&mut self.random) {
            self.schedule(wait);
        }
    }

    /// 卸载：取消定时器、停止闪烁、释放观察（可重复调用）
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.cancel_pending();
        self.blink.stop();
        self.gate.release(&mut self.observer);
        self.mounted = false;
        debug!(element = self.element.0, "卸载 TextType");
    }

    /// 渲染当前帧
    pub fn render(&self, now: Duration) -> RenderNode {
        let cursor = CursorView {
            suppressed: self.machine.is_cursor_suppressed(),
            opacity: self.blink.opacity(now),
        };
        text_type_view(self.machine.config(), self.machine.state(), cursor)
    }

    fn start(&mut self) {
        if let Some(wait) = self.machine.begin(&mut self.random) {
            self.schedule(wait);
        }
    }

    fn schedule(&mut self, delay: Duration) {
        self.cancel_pending();
        let id = self.scheduler.schedule(delay);
        trace!(timer = id.value(), delay_ms = delay.as_millis() as u64, "预约定时器");
        self.pending = Some(id);
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        self.machine.config()
    }

    pub fn state(&self) -> &AnimationState {
        self.machine.state()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn machine(&self) -> &TypingMachine {
        &self.machine
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// 挂起中的定时器
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_running()
    }

    /// 等待中的视口观察
    pub fn observation(&self) -> Option<ObservationId> {
        self.gate.observation()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

impl<S, O, R> Drop for TextType<S, O, R>
where
    S: Scheduler,
    O: VisibilityObserver,
    R: RandomSource,
{
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<S, O, R> std::fmt::Debug for TextType<S, O, R>
where
    S: Scheduler,
    O: VisibilityObserver,
    R: RandomSource,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextType")
            .field("element", &self.element)
            .field("state", self.machine.state())
            .field("pending", &self.pending)
            .field("visible", &self.gate.is_visible())
            .field("mounted", &self.mounted)
            .finish()
    }
}
