//! # Runtime 模块
//!
//! 打字动画的执行核心。
//!
//! ## 模块结构
//!
//! - [`machine`]：纯状态机，同步推进
//! - [`component`]：组件封装，负责定时器、可见门、光标闪烁与回调

pub mod component;
pub mod machine;

pub use component::{CompletionCallback, TextType};
pub use machine::{Advance, CompletedEntry, TypingMachine, target_text};
