//! # Page 模块
//!
//! 页面外壳：首屏（品牌 + 打字标语）、滚动揭示段落、画廊分区。
//!
//! ## 布局（单位：终端行）
//!
//! ```text
//! 0 ──────────────── 首屏，占满一个视口
//!   vh/2 - 1  品牌
//!   vh/2      标语
//! vh ─────────────── 揭示段落（前后各一个空行）
//!   ...       画廊：标题 / 图片 / 空行
//! ```
//!
//! 定时器队列和视口观察者以 `Rc<RefCell<_>>` 共享：页面推进时钟、滚动视口，
//! 组件通过同一份句柄预约定时器和登记观察。

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use text_type::{
    AnimationConfig, AnimatorInput, Element, ElementId, RandomSource, Rect, RenderNode,
    ScrollReveal, TextType, TimerQueue, ViewportTracker,
};
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::frame::{center, fit, inline_text, wrap};
use crate::gallery::{Gallery, ImageCatalog};

/// 共享定时器队列
pub type SharedQueue = Rc<RefCell<TimerQueue>>;

/// 共享视口观察者
pub type SharedTracker = Rc<RefCell<ViewportTracker>>;

/// 首屏标语组件
pub type Tagline<R> = TextType<SharedQueue, SharedTracker, R>;

/// 标语元素
pub const TAGLINE_ELEMENT: ElementId = ElementId(0);

/// 揭示段落元素
pub const REVEAL_ELEMENT: ElementId = ElementId(1);

/// 页面布局
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: usize,
    pub viewport_height: usize,
    /// 品牌所在行
    pub brand_row: usize,
    pub tagline: Rect,
    pub reveal: Rect,
    /// 各画廊起始行
    pub galleries: Vec<usize>,
    /// 页面总行数
    pub height: usize,
}

impl PageLayout {
    pub fn compute(
        width: usize,
        viewport_height: usize,
        reveal_rows: usize,
        galleries: &[Gallery],
    ) -> Self {
        let tagline_row = viewport_height / 2;
        let brand_row = tagline_row.saturating_sub(1);
        let reveal_top = viewport_height + 1;

        let mut row = reveal_top + reveal_rows + 1;
        let mut starts = Vec::with_capacity(galleries.len());
        for gallery in galleries {
            starts.push(row);
            row += gallery.rows();
        }

        Self {
            width,
            viewport_height,
            brand_row,
            tagline: Rect::new(0.0, tagline_row as f32, width as f32, 1.0),
            reveal: Rect::new(0.0, reveal_top as f32, width as f32, reveal_rows as f32),
            galleries: starts,
            height: row.max(viewport_height),
        }
    }

    /// 最大滚动位置
    pub fn max_scroll(&self) -> f32 {
        self.height.saturating_sub(self.viewport_height) as f32
    }
}

/// 页面外壳
pub struct Page<R: RandomSource> {
    brand: String,
    tagline: Tagline<R>,
    reveal: ScrollReveal,
    reveal_lines: usize,
    galleries: Vec<Gallery>,
    layout: PageLayout,
    queue: SharedQueue,
    tracker: SharedTracker,
    completed: Rc<RefCell<Vec<(String, usize)>>>,
}

impl<R: RandomSource> Page<R> {
    /// 组装页面并挂载标语
    pub fn mount(config: &SiteConfig, catalog: &dyn ImageCatalog, random: R) -> Self {
        let width = config.terminal.width;
        let viewport_height = config.terminal.viewport_height;

        let galleries: Vec<Gallery> = config
            .galleries
            .iter()
            .map(|section| Gallery::resolve(section, catalog))
            .collect();
        let reveal = ScrollReveal::new(&config.reveal.text, config.reveal.band);
        let reveal_lines = wrap(&reveal.words().join(" "), width).len();
        let layout = PageLayout::compute(width, viewport_height, reveal_lines, &galleries);

        let queue: SharedQueue = Rc::new(RefCell::new(TimerQueue::new()));
        let tracker: SharedTracker = Rc::new(RefCell::new(ViewportTracker::new(Rect::new(
            0.0,
            0.0,
            width as f32,
            viewport_height as f32,
        ))));
        {
            let mut tracker = tracker.borrow_mut();
            tracker.set_element_rect(TAGLINE_ELEMENT, layout.tagline);
            tracker.set_element_rect(REVEAL_ELEMENT, layout.reveal);
        }

        let mut tagline = TextType::mount(
            config.hero.tagline.clone(),
            TAGLINE_ELEMENT,
            queue.clone(),
            tracker.clone(),
            random,
            Duration::ZERO,
        );
        let completed = Rc::new(RefCell::new(Vec::new()));
        let log = completed.clone();
        tagline.on_complete(move |text, index| {
            info!(index, text, "标语完成一条");
            log.borrow_mut().push((text.to_string(), index));
        });

        debug!(
            height = layout.height,
            galleries = galleries.len(),
            "页面布局完成"
        );

        Self {
            brand: config.hero.brand.clone(),
            tagline,
            reveal,
            reveal_lines,
            galleries,
            layout,
            queue,
            tracker,
            completed,
        }
    }

    /// 推进到 `now`：按截止时间顺序执行到期定时器，再处理视口变化
    ///
    /// 每个截止时间在一帧内只执行一次。零延迟定时器预约在同一时刻，
    /// 留到下一帧执行，否则零速度的循环动画会让本帧永不结束。
    pub fn tick(&mut self, now: Duration) {
        let mut last: Option<Duration> = None;
        loop {
            let due = {
                let mut queue = self.queue.borrow_mut();
                match queue.next_deadline() {
                    Some(deadline) if deadline <= now && last.is_none_or(|t| deadline > t) => {
                        last = Some(deadline);
                        queue.run_next()
                    }
                    _ => None,
                }
            };
            let Some(id) = due else { break };
            self.tagline.handle(AnimatorInput::Timer(id));
        }
        self.queue.borrow_mut().advance_to(now);
        self.observe();
    }

    /// 滚动到 `y`（截断到页面范围）
    pub fn scroll_to(&mut self, y: f32) {
        let y = y.clamp(0.0, self.layout.max_scroll());
        self.tracker.borrow_mut().scroll_to(y);
        self.observe();
    }

    fn observe(&mut self) {
        let entries = self.tracker.borrow_mut().take_entries();
        for entry in entries {
            self.tagline.handle(entry.into());
        }
        let viewport = self.tracker.borrow().viewport();
        self.reveal.update(&self.layout.reveal, &viewport);
    }

    /// 当前滚动位置
    pub fn scroll(&self) -> f32 {
        self.tracker.borrow().viewport().y
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn tagline(&self) -> &Tagline<R> {
        &self.tagline
    }

    /// 用新配置替换标语动画
    pub fn reconfigure_tagline(&mut self, config: AnimationConfig, now: Duration) {
        self.tagline.reconfigure(config, now);
    }

    pub fn reveal(&self) -> &ScrollReveal {
        &self.reveal
    }

    pub fn galleries(&self) -> &[Gallery] {
        &self.galleries
    }

    /// 标语完成回调收到的记录
    pub fn completed(&self) -> Vec<(String, usize)> {
        self.completed.borrow().clone()
    }

    /// 当前时钟
    pub fn now(&self) -> Duration {
        self.queue.borrow().now()
    }

    /// 完整页面的元素树
    pub fn render(&self, now: Duration) -> RenderNode {
        let hero = Element::new("main")
            .with_class("hero")
            .with_child(
                Element::new("h1")
                    .with_class("brand")
                    .with_child(self.brand.as_str()),
            )
            .with_child(
                Element::new("div")
                    .with_class("tagline")
                    .with_child(self.tagline.render(now)),
            );
        let reveal = Element::new("section")
            .with_class("reveal")
            .with_child(self.reveal.render());

        let mut root = Element::new("div")
            .with_class("app-root")
            .with_child(hero)
            .with_child(reveal);
        for gallery in &self.galleries {
            root = root.with_child(gallery.render());
        }
        root.into()
    }

    /// 完整页面的终端行（每行恰好 `width` 列）
    pub fn lines(&self, now: Duration) -> Vec<String> {
        let width = self.layout.width;
        let mut rows = vec![String::new(); self.layout.height];

        rows[self.layout.brand_row] = center(&self.brand, width);
        let tagline = inline_text(&self.tagline.render(now));
        rows[self.layout.tagline.y as usize] = center(&tagline, width);

        let paragraph = inline_text(&self.reveal.render());
        let top = self.layout.reveal.y as usize;
        let lines = wrap(&paragraph, width).into_iter().take(self.reveal_lines);
        for (offset, line) in lines.enumerate() {
            rows[top + offset] = line;
        }

        for (gallery, &start) in self.galleries.iter().zip(&self.layout.galleries) {
            rows[start] = format!("## {}", gallery.title);
            if gallery.images.is_empty() {
                rows[start + 1] = "  (empty)".to_string();
            }
            for (offset, image) in gallery.images.iter().enumerate() {
                rows[start + 1 + offset] = format!("  - {}", image);
            }
        }

        rows.into_iter().map(|row| fit(&row, width)).collect()
    }

    /// 视口内的终端行
    pub fn viewport_lines(&self, now: Duration) -> Vec<String> {
        let top = self.scroll().floor().max(0.0) as usize;
        let lines = self.lines(now);
        lines
            .into_iter()
            .skip(top)
            .take(self.layout.viewport_height)
            .collect()
    }
}

impl<R: RandomSource> std::fmt::Debug for Page<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("tagline", &self.tagline)
            .field("layout", &self.layout)
            .field("revealed", &self.reveal.revealed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GallerySection;
    use crate::gallery::ConfigCatalog;
    use text_type::{FixedSequence, Phase};

    fn site() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.hero.tagline.text = "Hi".into();
        config.hero.tagline.looping = false;
        config.reveal.text = "plan cook eat".to_string();
        config.galleries = vec![GallerySection::new("Eat", vec!["eat.png".to_string()])];
        config.terminal.width = 20;
        config.terminal.viewport_height = 6;
        config
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_layout() {
        let page = Page::mount(&site(), &ConfigCatalog, FixedSequence::default());
        let layout = page.layout();
        assert_eq!(layout.brand_row, 2);
        assert_eq!(layout.tagline.y, 3.0);
        assert_eq!(layout.reveal, Rect::new(0.0, 7.0, 20.0, 1.0));
        assert_eq!(layout.galleries, vec![9]);
        assert_eq!(layout.height, 12);
        assert_eq!(layout.max_scroll(), 6.0);
    }

    #[test]
    fn test_tick_drives_tagline() {
        let mut page = Page::mount(&site(), &ConfigCatalog, FixedSequence::default());
        page.tick(ms(49));
        assert_eq!(page.tagline().state().displayed_text, "");
        page.tick(ms(50));
        assert_eq!(page.tagline().state().displayed_text, "H");
        // 一帧跨过多个截止时间
        page.tick(ms(500));
        assert_eq!(page.tagline().state().displayed_text, "Hi");
        assert_eq!(page.tagline().phase(), Phase::Complete);
        assert_eq!(page.now(), ms(500));
    }

    #[test]
    fn test_scroll_reveals_words() {
        let mut page = Page::mount(&site(), &ConfigCatalog, FixedSequence::default());
        page.tick(Duration::ZERO);
        assert_eq!(page.reveal().revealed(), 0);

        page.scroll_to(100.0);
        assert_eq!(page.scroll(), 6.0);
        assert!(page.reveal().is_complete());

        // 回滚不隐藏
        page.scroll_to(0.0);
        assert!(page.reveal().is_complete());
    }

    #[test]
    fn test_lines() {
        let mut page = Page::mount(&site(), &ConfigCatalog, FixedSequence::default());
        page.tick(ms(100));
        let lines = page.lines(ms(100));
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|l| l.chars().count() == 20));
        assert_eq!(lines[2].trim(), "UPlate");
        assert_eq!(lines[3].trim(), "Hi|");
        assert_eq!(lines[7].trim(), "···· ···· ···");
        assert_eq!(lines[9].trim(), "## Eat");
        assert_eq!(lines[10].trim(), "- eat.png");

        assert_eq!(page.viewport_lines(ms(100)).len(), 6);
    }

    #[test]
    fn test_render_tree() {
        let page = Page::mount(&site(), &ConfigCatalog, FixedSequence::default());
        let node = page.render(Duration::ZERO);
        assert_eq!(node.find_by_class("brand").len(), 1);
        assert_eq!(node.find_by_class("text-type").len(), 1);
        assert_eq!(node.find_by_class("word").len(), 3);
        assert_eq!(node.find_by_class("gallery").len(), 1);
    }
}
