//! # Render 模块
//!
//! 把配置和状态映射为与宿主无关的元素树。
//!
//! ## 输出结构
//!
//! ```text
//! 普通模式：<as class="text-type ...">
//!             <span class="text-type__content">已打出的文本</span>
//!             <span class="text-type__cursor">|</span>
//!           </as>
//!
//! 分行模式：<as class="text-type ...">
//!             <div class="text-type__content-multi">
//!               <div class="text-type__line text-type__line--0">
//!                 <span class="text-type__line-content">...</span>
//!                 [光标，仅出现在一行]
//!               </div>
//!               ...
//!             </div>
//!           </as>
//! ```

use std::fmt::Write as _;

use crate::config::AnimationConfig;
use crate::layout::layout_lines;
use crate::state::AnimationState;

/// 元素节点
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    /// 内联样式（有序）
    pub style: Vec<(String, String)>,
    pub children: Vec<RenderNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            style: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 追加 class（空白分隔的多个 class 会被拆开，空串忽略）
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes
            .extend(class.split_whitespace().map(str::to_string));
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn style_value(&self, key: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 渲染树节点
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Element(Element),
    Text(String),
}

impl From<Element> for RenderNode {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<String> for RenderNode {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RenderNode {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl RenderNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    /// 所有文本节点按文档顺序拼接
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// 按文档顺序查找带指定 class 的元素
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if let Self::Element(e) = self {
            if e.has_class(class) {
                found.push(e);
            }
            for child in &e.children {
                child.collect_by_class(class, found);
            }
        }
    }

    /// 紧凑的标记文本
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(&escape(t)),
            Self::Element(e) => {
                let _ = write!(out, "<{}", e.tag);
                if !e.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", escape(&e.classes.join(" ")));
                }
                if !e.style.is_empty() {
                    let style = e
                        .style
                        .iter()
                        .map(|(k, v)| format!("{k}:{v}"))
                        .collect::<Vec<_>>()
                        .join(";");
                    let _ = write!(out, " style=\"{}\"", escape(&style));
                }
                out.push('>');
                for child in &e.children {
                    child.write_markup(out);
                }
                let _ = write!(out, "</{}>", e.tag);
            }
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 光标渲染参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorView {
    /// 是否处于隐藏状态（打字进行中）
    pub suppressed: bool,
    /// 闪烁透明度
    pub opacity: f32,
}

fn cursor_element(config: &AnimationConfig, cursor: CursorView) -> Element {
    let mut el = Element::new("span")
        .with_class("text-type__cursor")
        .with_class(&config.cursor_class_name);
    if cursor.suppressed {
        el = el.with_class("text-type__cursor--hidden");
    }
    el.with_style("opacity", format!("{:.2}", cursor.opacity))
        .with_child(config.cursor_character.as_str())
}

/// 渲染一个打字动画实例
pub fn text_type_view(
    config: &AnimationConfig,
    state: &AnimationState,
    cursor: CursorView,
) -> RenderNode {
    let root = Element::new(config.tag.as_str())
        .with_class("text-type")
        .with_class(&config.class_name);
    let color = config.color_for(state.active_text_index);

    let root = match config.active_split_lines() {
        Some(lines) => {
            let layout = layout_lines(&state.displayed_text, lines);
            let mut multi = Element::new("div").with_class("text-type__content-multi");
            if let Some(color) = color {
                multi = multi.with_style("color", color);
            }
            for (idx, piece) in layout.pieces.into_iter().enumerate() {
                let mut line = Element::new("div")
                    .with_class("text-type__line")
                    .with_class(&format!("text-type__line--{idx}"))
                    .with_child(
                        Element::new("span")
                            .with_class("text-type__line-content")
                            .with_child(piece),
                    );
                if config.show_cursor && idx == layout.cursor_line {
                    line = line.with_child(cursor_element(config, cursor));
                }
                multi = multi.with_child(line);
            }
            root.with_child(multi)
        }
        None => {
            let mut content = Element::new("span")
                .with_class("text-type__content")
                .with_child(state.displayed_text.as_str());
            if let Some(color) = color {
                content = content.with_style("color", color);
            }
            let mut root = root.with_child(content);
            if config.show_cursor {
                root = root.with_child(cursor_element(config, cursor));
            }
            root
        }
    };

    root.into()
}
