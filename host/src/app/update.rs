//! 更新逻辑

use std::time::Duration;

use text_type::RandomSource;
use tracing::trace;

use super::AppState;

/// 更新入口（每帧调用）
///
/// 停留 `scroll_after_ms` 之后，视口每帧向下滚动 `scroll_step` 行，直到页底。
pub fn update<R: RandomSource>(app_state: &mut AppState<R>, now: Duration) {
    app_state.page.tick(now);

    if now < Duration::from_millis(app_state.terminal.scroll_after_ms) {
        return;
    }
    let max_scroll = app_state.page.layout().max_scroll();
    let scroll = app_state.page.scroll();
    if scroll < max_scroll {
        let next = (scroll + app_state.terminal.scroll_step).min(max_scroll);
        trace!(scroll = next, "滚动视口");
        app_state.page.scroll_to(next);
    }
}
