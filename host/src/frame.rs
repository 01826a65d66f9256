//! # Frame 模块
//!
//! 把渲染树压平成终端文本行。
//!
//! - 光标：隐藏或透明度低于一半时输出等宽空白
//! - 未揭示的词：以 `·` 占位，保持行宽不变
//! - 其余元素只取文本内容

use text_type::{Element, RenderNode};

/// 光标可见的透明度下限
const CURSOR_VISIBLE_OPACITY: f32 = 0.5;

/// 未揭示字符的占位符
const MASK: char = '·';

/// 压平为单行文本
pub fn inline_text(node: &RenderNode) -> String {
    let mut out = String::new();
    push_inline(node, &mut out);
    out
}

fn push_inline(node: &RenderNode, out: &mut String) {
    match node {
        RenderNode::Text(text) => out.push_str(text),
        RenderNode::Element(el) if el.has_class("text-type__cursor") => {
            let glyph = node.text_content();
            if cursor_visible(el) {
                out.push_str(&glyph);
            } else {
                out.extend(std::iter::repeat_n(' ', glyph.chars().count()));
            }
        }
        RenderNode::Element(el) if el.has_class("word") && !el.has_class("word--revealed") => {
            let word = node.text_content();
            out.extend(std::iter::repeat_n(MASK, word.chars().count()));
        }
        RenderNode::Element(el) => el.children.iter().for_each(|c| push_inline(c, out)),
    }
}

fn cursor_visible(cursor: &Element) -> bool {
    if cursor.has_class("text-type__cursor--hidden") {
        return false;
    }
    cursor
        .style_value("opacity")
        .and_then(|v| v.parse::<f32>().ok())
        .is_none_or(|opacity| opacity >= CURSOR_VISIBLE_OPACITY)
}

/// 按词折行（超长的词按字符硬切）
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.push(chars.drain(..width).collect());
        }
        let len = chars.len();
        if current_len > 0 && current_len + 1 + len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += len;
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// 居中（超宽时原样返回）
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// 截断或补齐到 `width` 列
pub fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(opacity: &str, hidden: bool) -> Element {
        let mut el = Element::new("span").with_class("text-type__cursor");
        if hidden {
            el = el.with_class("text-type__cursor--hidden");
        }
        el.with_style("opacity", opacity).with_child("|")
    }

    #[test]
    fn test_inline_cursor_blink() {
        let line = |c: Element| {
            let node: RenderNode = Element::new("div").with_child("Hi").with_child(c).into();
            inline_text(&node)
        };
        assert_eq!(line(cursor("1.00", false)), "Hi|");
        assert_eq!(line(cursor("0.50", false)), "Hi|");
        assert_eq!(line(cursor("0.20", false)), "Hi ");
        assert_eq!(line(cursor("1.00", true)), "Hi ");
    }

    #[test]
    fn test_inline_masks_hidden_words() {
        let node: RenderNode = Element::new("p")
            .with_child(Element::new("span").with_class("word word--revealed").with_child("meal"))
            .with_child(" ")
            .with_child(Element::new("span").with_class("word").with_child("prep"))
            .into();
        assert_eq!(inline_text(&node), "meal ····");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("plan cook eat", 9), ["plan cook", "eat"]);
        assert_eq!(wrap("abcdefghij xy", 4), ["abcd", "efgh", "ij", "xy"]);
        assert_eq!(wrap("", 10), [""]);
    }

    #[test]
    fn test_center_and_fit() {
        assert_eq!(center("ab", 6), "  ab");
        assert_eq!(center("abcdef", 4), "abcdef");
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("ab", 4), "ab  ");
    }
}
