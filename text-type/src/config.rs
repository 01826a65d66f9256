//! # Config 模块
//!
//! 打字动画的创建参数。配置在挂载时给定，之后只读。
//!
//! JSON 字段名采用 camelCase，与页面侧的属性名一致：
//!
//! ```json
//! {
//!   "text": ["Hi", "Bye"],
//!   "typingSpeed": 50,
//!   "pauseDuration": 2000,
//!   "loop": true,
//!   "variableSpeed": { "min": 20, "max": 80 }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;

/// 源文本：单个字符串或字符串序列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextSource {
    /// 单个字符串
    Single(String),
    /// 有序字符串序列（逐条打出、删除、循环）
    Many(Vec<String>),
}

impl TextSource {
    /// 以切片形式访问所有条目
    pub fn entries(&self) -> &[String] {
        match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::Many(list) => list,
        }
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// 是否没有任何条目
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<&str> for TextSource {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for TextSource {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for TextSource {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<Vec<&str>> for TextSource {
    fn from(value: Vec<&str>) -> Self {
        Self::Many(value.into_iter().map(str::to_string).collect())
    }
}

/// 可变打字速度区间（毫秒）
///
/// 每个字符独立抽取 `[min, max]` 内的均匀随机延迟。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableSpeed {
    pub min: f64,
    pub max: f64,
}

impl VariableSpeed {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// 用 `[0, 1)` 上的单位随机数换算出一次延迟
    ///
    /// `min > max` 时按交换后的区间处理，负值截断为 0。
    pub fn sample(&self, unit: f64) -> Duration {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        let ms = (lo + unit.clamp(0.0, 1.0) * (hi - lo)).max(0.0);
        Duration::from_micros((ms * 1000.0).round() as u64)
    }
}

/// 打字动画配置
///
/// 所有字段都有默认值，只有 `text` 通常需要显式给出：
///
/// ```ignore
/// let config = AnimationConfig {
///     text: "Your new college meal prep buddy".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    /// 源文本
    #[serde(default)]
    pub text: TextSource,

    /// 可选的视觉行划分
    ///
    /// 非空时进入分行模式：打出各行拼接后的整串，且不删除、不循环。
    #[serde(default)]
    pub split_lines: Option<Vec<String>>,

    /// 每个字符的打字间隔（毫秒）
    #[serde(default = "default_typing_speed")]
    pub typing_speed: u64,

    /// 首个字符前的额外延迟（毫秒）
    #[serde(default)]
    pub initial_delay: u64,

    /// 打完 / 删完后的停顿（毫秒）
    #[serde(default = "default_pause_duration")]
    pub pause_duration: u64,

    /// 每个字符的删除间隔（毫秒）
    #[serde(default = "default_deleting_speed")]
    pub deleting_speed: u64,

    /// 最后一条删完后是否回到第一条
    #[serde(default = "default_true", rename = "loop")]
    pub looping: bool,

    /// 文本颜色，按条目索引轮换
    #[serde(default)]
    pub text_colors: Vec<String>,

    /// 可变打字速度
    #[serde(default)]
    pub variable_speed: Option<VariableSpeed>,

    /// 反向打字（按字符反转目标文本）
    #[serde(default)]
    pub reverse_mode: bool,

    /// 光标字符
    #[serde(default = "default_cursor_character")]
    pub cursor_character: String,

    /// 是否显示光标
    #[serde(default = "default_true")]
    pub show_cursor: bool,

    /// 打字 / 删除进行中时隐藏光标
    #[serde(default)]
    pub hide_cursor_while_typing: bool,

    /// 光标闪烁的半周期（秒）
    #[serde(default = "default_cursor_blink_duration")]
    pub cursor_blink_duration: f32,

    /// 进入视口后才开始
    #[serde(default)]
    pub start_on_visible: bool,

    /// 容器元素标签
    #[serde(default = "default_tag", rename = "as")]
    pub tag: String,

    /// 容器附加 class
    #[serde(default)]
    pub class_name: String,

    /// 光标附加 class
    #[serde(default)]
    pub cursor_class_name: String,
}

fn default_typing_speed() -> u64 {
    50
}

fn default_pause_duration() -> u64 {
    2000
}

fn default_deleting_speed() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_cursor_character() -> String {
    "|".to_string()
}

fn default_cursor_blink_duration() -> f32 {
    0.5
}

fn default_tag() -> String {
    "div".to_string()
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            text: TextSource::default(),
            split_lines: None,
            typing_speed: default_typing_speed(),
            initial_delay: 0,
            pause_duration: default_pause_duration(),
            deleting_speed: default_deleting_speed(),
            looping: true,
            text_colors: Vec::new(),
            variable_speed: None,
            reverse_mode: false,
            cursor_character: default_cursor_character(),
            show_cursor: true,
            hide_cursor_while_typing: false,
            cursor_blink_duration: default_cursor_blink_duration(),
            start_on_visible: false,
            tag: default_tag(),
            class_name: String::new(),
            cursor_class_name: String::new(),
        }
    }
}

impl AnimationConfig {
    /// 以给定文本创建默认配置
    pub fn new(text: impl Into<TextSource>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// 从 JSON 解析
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 序列化为带缩进的 JSON
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 源文本条目
    pub fn entries(&self) -> &[String] {
        self.text.entries()
    }

    /// 分行模式下的视觉行；未启用时返回 `None`
    pub fn active_split_lines(&self) -> Option<&[String]> {
        match &self.split_lines {
            Some(lines) if !lines.is_empty() => Some(lines),
            _ => None,
        }
    }

    /// 是否处于分行模式
    pub fn is_split(&self) -> bool {
        self.active_split_lines().is_some()
    }

    /// 源文本身份是否一致（决定重新配置时是否重置状态）
    ///
    /// 反向模式会改变目标文本，因此也算作身份的一部分。
    pub fn same_source(&self, other: &Self) -> bool {
        self.text == other.text
            && self.split_lines == other.split_lines
            && self.reverse_mode == other.reverse_mode
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay)
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_speed)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_duration)
    }

    pub fn deleting_delay(&self) -> Duration {
        Duration::from_millis(self.deleting_speed)
    }

    /// 指定条目的文本颜色
    pub fn color_for(&self, index: usize) -> Option<&str> {
        if self.text_colors.is_empty() {
            return None;
        }
        self.text_colors
            .get(index % self.text_colors.len())
            .map(String::as_str)
    }
}
