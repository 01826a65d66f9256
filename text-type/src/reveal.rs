//! # Reveal 模块
//!
//! 滚动揭示：文本元素随滚动穿过视口中的一个区间时，逐词显现。
//!
//! 进度由元素顶边在视口中的位置决定：
//!
//! ```text
//! viewport.y + height * start  ── 进度 0（开始显现）
//! viewport.y + height * end    ── 进度 1（全部显现）
//! ```
//!
//! 已显现的词不会因为回滚而重新隐藏。

use serde::{Deserialize, Serialize};

use crate::render::{Element, RenderNode};
use crate::visibility::Rect;

/// 视口中的揭示区间（视口高度的比例，0 为顶部）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealBand {
    #[serde(default = "default_band_start")]
    pub start: f32,
    #[serde(default = "default_band_end")]
    pub end: f32,
}

fn default_band_start() -> f32 {
    0.9
}

fn default_band_end() -> f32 {
    0.4
}

impl Default for RevealBand {
    fn default() -> Self {
        Self {
            start: default_band_start(),
            end: default_band_end(),
        }
    }
}

impl RevealBand {
    /// 元素顶边处于 `element_top` 时的揭示进度（0.0 - 1.0）
    pub fn progress(&self, element_top: f32, viewport: &Rect) -> f32 {
        let start_y = viewport.y + viewport.height * self.start;
        let end_y = viewport.y + viewport.height * self.end;
        let span = start_y - end_y;
        if span.abs() <= f32::EPSILON {
            return if element_top <= end_y { 1.0 } else { 0.0 };
        }
        ((start_y - element_top) / span).clamp(0.0, 1.0)
    }
}

/// 逐词滚动揭示
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollReveal {
    words: Vec<String>,
    band: RevealBand,
    revealed: usize,
}

impl ScrollReveal {
    pub fn new(text: &str, band: RevealBand) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
            band,
            revealed: 0,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// 已显现的词数
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.words.len()
    }

    /// 根据元素与视口位置更新，返回新的已显现词数
    pub fn update(&mut self, element: &Rect, viewport: &Rect) -> usize {
        let progress = self.band.progress(element.y, viewport);
        let target = (progress * self.words.len() as f32).ceil() as usize;
        self.revealed = self.revealed.max(target.min(self.words.len()));
        self.revealed
    }

    /// 渲染为逐词 span
    pub fn render(&self) -> RenderNode {
        let mut paragraph = Element::new("p").with_class("scroll-reveal-text");
        for (idx, word) in self.words.iter().enumerate() {
            if idx > 0 {
                paragraph = paragraph.with_child(" ");
            }
            let class = if idx < self.revealed {
                "word word--revealed"
            } else {
                "word"
            };
            paragraph = paragraph.with_child(
                Element::new("span")
                    .with_class(class)
                    .with_child(word.as_str()),
            );
        }
        paragraph.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_at(y: f32) -> Rect {
        Rect::new(0.0, y, 100.0, 100.0)
    }

    #[test]
    fn test_band_progress() {
        let band = RevealBand::default();
        let vp = viewport_at(0.0);
        assert_eq!(band.progress(95.0, &vp), 0.0);
        assert_eq!(band.progress(90.0, &vp), 0.0);
        assert!((band.progress(65.0, &vp) - 0.5).abs() < 1e-5);
        assert_eq!(band.progress(40.0, &vp), 1.0);
        assert_eq!(band.progress(-10.0, &vp), 1.0);
    }

    #[test]
    fn test_reveal_is_monotonic() {
        let mut reveal = ScrollReveal::new("plan cook eat repeat", RevealBand::default());
        let element = Rect::new(0.0, 200.0, 100.0, 20.0);

        assert_eq!(reveal.update(&element, &viewport_at(0.0)), 0);
        // 顶边位于区间中点
        assert_eq!(reveal.update(&element, &viewport_at(135.0)), 2);
        // 回滚不隐藏
        assert_eq!(reveal.update(&element, &viewport_at(0.0)), 2);
        assert_eq!(reveal.update(&element, &viewport_at(400.0)), 4);
        assert!(reveal.is_complete());
    }

    #[test]
    fn test_render_marks_revealed_words() {
        let mut reveal = ScrollReveal::new("meal prep", RevealBand::default());
        reveal.update(&Rect::new(0.0, 70.0, 10.0, 10.0), &viewport_at(0.0));
        let node = reveal.render();
        assert_eq!(node.find_by_class("word--revealed").len(), 1);
        assert_eq!(node.text_content(), "meal prep");
    }

    #[test]
    fn test_empty_text() {
        let mut reveal = ScrollReveal::new("   ", RevealBand::default());
        assert!(reveal.words().is_empty());
        assert_eq!(reveal.update(&Rect::default(), &viewport_at(0.0)), 0);
        assert!(reveal.is_complete());
    }
}
