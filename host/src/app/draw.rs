//! 渲染逻辑

use std::io::Write;
use std::time::Duration;

use text_type::RandomSource;

use super::AppState;

/// 把视口内的行写到终端
pub fn draw<R: RandomSource>(
    app_state: &AppState<R>,
    now: Duration,
    out: &mut impl Write,
) -> std::io::Result<()> {
    for line in app_state.page.viewport_lines(now) {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
