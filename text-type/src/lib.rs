//! # TextType
//!
//! 打字机效果动画的核心库。
//!
//! ## 架构概述
//!
//! `text-type` 不依赖任何 IO、时钟或渲染引擎。时间、视口与随机数都以能力接口注入，
//! 宿主（Host）通过输入事件驱动组件：
//!
//! ```text
//! Host                                TextType
//!   │                                    │
//!   │──── AnimatorInput ────────────────►│
//!   │                                    │ advance()
//!   │◄─── Scheduler::schedule(delay) ────│
//!   │◄─── render(now) -> RenderNode ─────│
//!   │                                    │
//! ```
//!
//! ## 核心类型
//!
//! - [`AnimationConfig`]：创建参数（文本序列、速度、光标、分行）
//! - [`AnimationState`]：可观察的动画状态
//! - [`TypingMachine`]：纯状态机，每次 `advance()` 推进一步并给出下一次等待
//! - [`TextType`]：组件封装，管理定时器、可见门、光标闪烁与完成回调
//! - [`ScrollReveal`]：逐词滚动揭示
//!
//! ## 使用示例
//!
//! ```ignore
//! use text_type::{AnimationConfig, AnimatorInput, ElementId, RngSource, TextType, TimerQueue, ViewportTracker};
//!
//! let config = AnimationConfig::new(vec!["Plan", "Cook", "Eat"]);
//! let mut hero = TextType::mount(
//!     config,
//!     ElementId(0),
//!     TimerQueue::new(),
//!     ViewportTracker::default(),
//!     RngSource::thread(),
//!     Duration::ZERO,
//! );
//!
//! loop {
//!     hero.scheduler_mut().advance(frame_dt);
//!     while let Some(id) = hero.scheduler_mut().pop_due() {
//!         hero.handle(AnimatorInput::Timer(id));
//!     }
//!     draw(hero.render(now));
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`config`]：配置定义与 JSON 读写
//! - [`state`]：动画状态与阶段
//! - [`runtime`]：状态机与组件
//! - [`scheduler`]：定时器能力与虚拟时钟队列
//! - [`visibility`]：视口观察与可见门
//! - [`layout`]：分行模式的文本切分
//! - [`render`]：元素树输出
//! - [`reveal`]：滚动揭示
//! - [`diagnostic`]：配置检查

pub mod config;
pub mod cursor;
pub mod diagnostic;
pub mod error;
pub mod input;
pub mod layout;
pub mod random;
pub mod render;
pub mod reveal;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod visibility;

// 重导出核心类型
pub use config::{AnimationConfig, TextSource, VariableSpeed};
pub use cursor::{CursorBlink, ease_in_out_quad};
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, check_config};
pub use error::{ConfigError, ConfigResult};
pub use input::AnimatorInput;
pub use layout::{LineLayout, cursor_line, layout_lines, partition};
pub use random::{FixedSequence, RandomSource, RngSource};
pub use render::{CursorView, Element, RenderNode, text_type_view};
pub use reveal::{RevealBand, ScrollReveal};
pub use runtime::{Advance, CompletedEntry, CompletionCallback, TextType, TypingMachine};
pub use scheduler::{Scheduler, TimerId, TimerQueue};
pub use state::{AnimationState, Phase};
pub use visibility::{
    ElementId, IntersectionEntry, ObservationId, Rect, VISIBILITY_THRESHOLD, ViewportTracker,
    VisibilityGate, VisibilityObserver,
};
