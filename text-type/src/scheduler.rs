//! # Scheduler 模块
//!
//! 定时器抽象。状态机的每一步都通过 [`Scheduler`] 预约下一次推进，
//! 自身从不接触真实时钟。
//!
//! ## 设计说明
//!
//! - `schedule` 返回 [`TimerId`]，到期后由宿主把该 ID 作为输入交还给组件
//! - 组件只认最近一次预约的 ID，过期 ID 一律忽略
//! - [`TimerQueue`] 是基于虚拟时钟的实现：测试手动推进时间，宿主按真实耗时推进

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 定时器标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimerId({})", self.0)
    }
}

/// 定时器服务
pub trait Scheduler {
    /// 预约一个在 `delay` 后到期的定时器
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// 取消定时器（已到期或不存在时无操作）
    fn cancel(&mut self, id: TimerId);
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }
}

/// 多个组件共享同一个队列
impl<S: Scheduler> Scheduler for Rc<RefCell<S>> {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.borrow_mut().schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.borrow_mut().cancel(id)
    }
}

/// 虚拟时钟定时器队列
///
/// 到期顺序：先按截止时间，再按预约顺序。
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    queue: BTreeSet<(Duration, TimerId)>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前虚拟时间
    pub fn now(&self) -> Duration {
        self.now
    }

    /// 时钟前进 `dt`
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// 时钟前进到 `t`（不会倒退）
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    /// 最早的截止时间
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first().map(|(deadline, _)| *deadline)
    }

    /// 取出一个已到期的定时器
    pub fn pop_due(&mut self) -> Option<TimerId> {
        let &(deadline, id) = self.queue.first()?;
        if deadline > self.now {
            return None;
        }
        self.queue.remove(&(deadline, id));
        self.deadlines.remove(&id);
        Some(id)
    }

    /// 把时钟拨到下一个截止时间并取出该定时器
    pub fn run_next(&mut self) -> Option<TimerId> {
        let deadline = self.next_deadline()?;
        self.advance_to(deadline);
        self.pop_due()
    }

    /// 挂起中的定时器数量
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// 定时器是否仍在挂起
    pub fn contains(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, id));
        self.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(deadline) = self.deadlines.remove(&id) {
            self.queue.remove(&(deadline, id));
        }
    }
}
