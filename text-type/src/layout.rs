//! # Layout 模块
//!
//! 分行模式下把已打出的文本切分到各视觉行，并确定光标所在行。
//!
//! 各行之间不插入分隔符，因此按累计字符数切分没有歧义。

/// 分行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// 每个视觉行当前可见的内容
    pub pieces: Vec<String>,
    /// 光标所在行
    pub cursor_line: usize,
}

/// 各行字符数
pub fn line_lengths(lines: &[String]) -> Vec<usize> {
    lines.iter().map(|line| line.chars().count()).collect()
}

/// 各行的累计字符数
pub fn cumulative_lengths(lines: &[String]) -> Vec<usize> {
    line_lengths(lines)
        .into_iter()
        .scan(0usize, |acc, len| {
            *acc += len;
            Some(*acc)
        })
        .collect()
}

/// 按行长切分 `displayed`
///
/// 超出所有行总长的部分并入最后一行。`lines` 为空时返回空列表。
pub fn partition(displayed: &str, lines: &[String]) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut chars = displayed.chars();
    let mut pieces: Vec<String> = line_lengths(lines)
        .into_iter()
        .map(|len| chars.by_ref().take(len).collect())
        .collect();

    let rest: String = chars.collect();
    if !rest.is_empty()
        && let Some(last) = pieces.last_mut()
    {
        last.push_str(&rest);
    }
    pieces
}

/// 光标所在行：第一个满足 `typed_len <= 累计长度` 的行，超出时落在最后一行
pub fn cursor_line(typed_len: usize, lines: &[String]) -> usize {
    let totals = cumulative_lengths(lines);
    totals
        .iter()
        .position(|&total| typed_len <= total)
        .unwrap_or_else(|| totals.len().saturating_sub(1))
}

/// 完整分行布局
pub fn layout_lines(displayed: &str, lines: &[String]) -> LineLayout {
    LineLayout {
        pieces: partition(displayed, lines),
        cursor_line: cursor_line(displayed.chars().count(), lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partition_mid_second_line() {
        let l = lines(&["ab", "cd"]);
        assert_eq!(partition("abc", &l), vec!["ab", "c"]);
        assert_eq!(cursor_line(3, &l), 1);
    }

    #[test]
    fn test_cursor_line_boundaries() {
        let l = lines(&["ab", "cd"]);
        assert_eq!(cursor_line(0, &l), 0);
        assert_eq!(cursor_line(2, &l), 0);
        assert_eq!(cursor_line(4, &l), 1);
        // 超出总长时固定在最后一行
        assert_eq!(cursor_line(9, &l), 1);
        assert_eq!(cursor_line(0, &[]), 0);
    }

    #[test]
    fn test_partition_never_exceeds_line_length() {
        let l = lines(&["Your new", " college", " meal prep buddy"]);
        let full: String = l.concat();
        let lengths = line_lengths(&l);
        for n in 0..=full.chars().count() {
            let typed: String = full.chars().take(n).collect();
            let pieces = partition(&typed, &l);
            assert_eq!(pieces.concat(), typed);
            for (piece, len) in pieces.iter().zip(&lengths) {
                assert!(piece.chars().count() <= *len);
            }
        }
    }

    #[test]
    fn test_overflow_joins_last_line() {
        let l = lines(&["ab", "c"]);
        assert_eq!(partition("abcde", &l), vec!["ab", "cde"]);
    }

    #[test]
    fn test_multibyte_lines() {
        let l = lines(&["你好", "世界"]);
        let layout = layout_lines("你好世", &l);
        assert_eq!(layout.pieces, vec!["你好", "世"]);
        assert_eq!(layout.cursor_line, 1);
    }

    #[test]
    fn test_empty_leading_line() {
        let l = lines(&["", "ab"]);
        assert_eq!(partition("a", &l), vec!["", "a"]);
        assert_eq!(cursor_line(0, &l), 0);
        assert_eq!(cursor_line(1, &l), 1);
    }
}
