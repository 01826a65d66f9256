//! # Input 模块
//!
//! 定义宿主向 `TextType` 组件传递的输入事件。
//!
//! ## 设计说明
//!
//! - 组件不直接接触定时器或视口 API，只处理语义化的输入
//! - 定时器到期时，宿主把 `Scheduler::schedule` 返回的 ID 原样交回
//! - 交叉事件来自 `VisibilityObserver` 的实现（如 `ViewportTracker`）

use serde::{Deserialize, Serialize};

use crate::scheduler::TimerId;
use crate::visibility::{IntersectionEntry, ObservationId};

/// 宿主传给组件的输入
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimatorInput {
    /// 定时器到期
    Timer(TimerId),

    /// 观察中的元素跨越了可见阈值
    Intersection {
        observation: ObservationId,
        ratio: f32,
    },
}

impl AnimatorInput {
    /// 创建定时器输入
    pub fn timer(id: TimerId) -> Self {
        Self::Timer(id)
    }

    /// 创建交叉输入
    pub fn intersection(observation: ObservationId, ratio: f32) -> Self {
        Self::Intersection { observation, ratio }
    }
}

impl From<IntersectionEntry> for AnimatorInput {
    fn from(entry: IntersectionEntry) -> Self {
        Self::Intersection {
            observation: entry.observation,
            ratio: entry.ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::ElementId;

    #[test]
    fn test_from_intersection_entry() {
        let entry = IntersectionEntry {
            observation: ObservationId::new(4),
            element: ElementId(2),
            ratio: 0.5,
            is_intersecting: true,
        };
        assert_eq!(
            AnimatorInput::from(entry),
            AnimatorInput::intersection(ObservationId::new(4), 0.5)
        );
    }

    #[test]
    fn test_input_serialization() {
        let input = AnimatorInput::intersection(ObservationId::new(1), 0.25);
        let json = serde_json::to_string(&input).unwrap();
        let deserialized: AnimatorInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, deserialized);
    }
}
