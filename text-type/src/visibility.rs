//! # Visibility 模块
//!
//! 视口可见性：决定动画何时开始。
//!
//! ## 核心概念
//!
//! - [`VisibilityObserver`]：观察元素与视口的交叉情况（能力接口）
//! - [`ViewportTracker`]：基于矩形几何的观察者实现
//! - [`VisibilityGate`]：一次性可见门，交叉比例首次达到阈值后永久打开

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// 可见阈值：交叉比例达到 10% 视为进入视口
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// 轴对齐矩形（文档坐标）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// 与另一个矩形的交叉面积
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// 本矩形落在 `viewport` 内的面积比例
    ///
    /// 零面积元素：位于视口内（含边界）时为 1，否则为 0。
    pub fn intersection_ratio(&self, viewport: &Rect) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            let inside = self.x >= viewport.x
                && self.x <= viewport.right()
                && self.y >= viewport.y
                && self.y <= viewport.bottom();
            return if inside { 1.0 } else { 0.0 };
        }
        (self.intersection_area(viewport) / area).clamp(0.0, 1.0)
    }
}

/// 被观察元素的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// 一次观察的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationId(u64);

impl ObservationId {
    /// 仅供观察者实现分配
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 交叉事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub observation: ObservationId,
    pub element: ElementId,
    /// 交叉比例（0.0 - 1.0）
    pub ratio: f32,
    /// 是否达到观察阈值
    pub is_intersecting: bool,
}

/// 视口观察能力
pub trait VisibilityObserver {
    /// 开始观察元素，交叉比例跨越 `threshold` 时产生事件
    fn observe(&mut self, element: ElementId, threshold: f32) -> ObservationId;

    /// 释放观察（重复释放无操作）
    fn disconnect(&mut self, observation: ObservationId);
}

impl<O: VisibilityObserver + ?Sized> VisibilityObserver for &mut O {
    fn observe(&mut self, element: ElementId, threshold: f32) -> ObservationId {
        (**self).observe(element, threshold)
    }

    fn disconnect(&mut self, observation: ObservationId) {
        (**self).disconnect(observation)
    }
}

impl<O: VisibilityObserver> VisibilityObserver for Rc<RefCell<O>> {
    fn observe(&mut self, element: ElementId, threshold: f32) -> ObservationId {
        self.borrow_mut().observe(element, threshold)
    }

    fn disconnect(&mut self, observation: ObservationId) {
        self.borrow_mut().disconnect(observation)
    }
}

#[derive(Debug, Clone)]
struct Observation {
    element: ElementId,
    threshold: f32,
    /// 上一次上报时是否达到阈值（None 表示尚未上报）
    reported: Option<bool>,
}

/// 基于矩形几何的观察者
///
/// 宿主登记元素布局并更新视口，[`ViewportTracker::take_entries`] 返回
/// 自上次调用以来跨越阈值的观察。每个新观察在第一次检查时必定上报一次。
#[derive(Debug, Default)]
pub struct ViewportTracker {
    viewport: Rect,
    elements: HashMap<ElementId, Rect>,
    observations: BTreeMap<ObservationId, Observation>,
    next_id: u64,
}

impl ViewportTracker {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// 更新视口矩形
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// 垂直滚动到 `y`
    pub fn scroll_to(&mut self, y: f32) {
        self.viewport.y = y;
    }

    /// 登记 / 更新元素布局
    pub fn set_element_rect(&mut self, element: ElementId, rect: Rect) {
        self.elements.insert(element, rect);
    }

    pub fn element_rect(&self, element: ElementId) -> Option<Rect> {
        self.elements.get(&element).copied()
    }

    /// 当前活跃观察数
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// 计算元素当前交叉比例（未登记布局时为 0）
    pub fn ratio_of(&self, element: ElementId) -> f32 {
        self.elements
            .get(&element)
            .map_or(0.0, |rect| rect.intersection_ratio(&self.viewport))
    }

    /// 收集跨越阈值的观察
    pub fn take_entries(&mut self) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for (id, observation) in self.observations.iter_mut() {
            let ratio = self
                .elements
                .get(&observation.element)
                .map_or(0.0, |rect| rect.intersection_ratio(&self.viewport));
            let is_intersecting = ratio > 0.0 && ratio >= observation.threshold;
            if observation.reported != Some(is_intersecting) {
                observation.reported = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    observation: *id,
                    element: observation.element,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

impl VisibilityObserver for ViewportTracker {
    fn observe(&mut self, element: ElementId, threshold: f32) -> ObservationId {
        let id = ObservationId::new(self.next_id);
        self.next_id += 1;
        self.observations.insert(
            id,
            Observation {
                element,
                threshold,
                reported: None,
            },
        );
        id
    }

    fn disconnect(&mut self, observation: ObservationId) {
        self.observations.remove(&observation);
    }
}

/// 一次性可见门
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityGate {
    visible: bool,
    observation: Option<ObservationId>,
}

impl VisibilityGate {
    /// `start_on_visible` 为 false 时一开始就是可见的
    pub fn new(start_on_visible: bool) -> Self {
        Self {
            visible: !start_on_visible,
            observation: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn observation(&self) -> Option<ObservationId> {
        self.observation
    }

    /// 尚不可见时开始观察元素
    pub fn arm<O: VisibilityObserver + ?Sized>(&mut self, observer: &mut O, element: ElementId) {
        if self.visible || self.observation.is_some() {
            return;
        }
        let id = observer.observe(element, VISIBILITY_THRESHOLD);
        debug!(element = element.0, observation = id.value(), "等待元素进入视口");
        self.observation = Some(id);
    }

    /// 处理交叉事件，返回门是否在这一次打开
    pub fn on_intersection(&mut self, observation: ObservationId, ratio: f32) -> bool {
        if self.visible || self.observation != Some(observation) {
            return false;
        }
        if ratio > 0.0 && ratio >= VISIBILITY_THRESHOLD {
            self.visible = true;
            return true;
        }
        false
    }

    /// 不再需要视口门（配置关闭了 startOnVisible）
    pub fn open<O: VisibilityObserver + ?Sized>(&mut self, observer: &mut O) -> bool {
        let opened = !self.visible;
        self.visible = true;
        self.release(observer);
        opened
    }

    /// 释放观察
    pub fn release<O: VisibilityObserver + ?Sized>(&mut self, observer: &mut O) {
        if let Some(id) = self.observation.take() {
            observer.disconnect(id);
        }
    }
}
