//! # 诊断模块
//!
//! 动画配置的静态检查，不依赖 IO 或时钟。
//!
//! ## 设计原则
//!
//! - 动画核心对非法配置静默降级（停在 Idle），诊断负责把问题说出来
//! - 诊断分级：Error（动画不会运行）、Warn（行为可能不符合预期）、Info（信息提示）
//! - 只报告，不阻塞

use crate::config::AnimationConfig;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（动画不会运行）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 来源（配置文件路径或组件名）
    pub source: String,
    /// 相关字段（camelCase）
    pub field: Option<String>,
    /// 诊断消息
    pub message: String,
}

impl Diagnostic {
    /// 创建错误诊断
    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, source, message)
    }

    /// 创建警告诊断
    pub fn warn(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warn, source, message)
    }

    /// 创建信息诊断
    pub fn info(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Info, source, message)
    }

    fn with_level(
        level: DiagnosticLevel,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            source: source.into(),
            field: None,
            message: message.into(),
        }
    }

    /// 设置字段
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.source)?;
        if let Some(field) = &self.field {
            write!(f, " ({})", field)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 检查一份动画配置
pub fn check_config(source: &str, config: &AnimationConfig) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    let entries = config.entries();

    match config.active_split_lines() {
        Some(lines) => {
            if lines.iter().all(String::is_empty) {
                result.push(
                    Diagnostic::error(source, "所有视觉行都为空，没有可打出的内容")
                        .with_field("splitLines"),
                );
            }
            let joined = entries.join(" ");
            if !joined.is_empty() && joined != lines.concat() {
                result.push(
                    Diagnostic::info(source, "分行模式下 text 被忽略，只打出 splitLines 的拼接")
                        .with_field("text"),
                );
            }
            if config.text_colors.len() > 1 {
                result.push(
                    Diagnostic::info(source, "分行模式只使用第一个颜色").with_field("textColors"),
                );
            }
        }
        None => {
            if entries.is_empty() {
                result.push(
                    Diagnostic::error(source, "文本序列为空，动画将保持空闲")
                        .with_field("text"),
                );
            }
            for (idx, entry) in entries.iter().enumerate() {
                if entry.is_empty() {
                    result.push(
                        Diagnostic::warn(source, format!("第 {} 条文本为空", idx))
                            .with_field("text"),
                    );
                }
            }
            if entries.len() == 1 && config.looping {
                result.push(
                    Diagnostic::info(source, "只有一条文本时 loop 不生效，打完即停止")
                        .with_field("loop"),
                );
            }
            if config.text_colors.len() > entries.len() && !entries.is_empty() {
                result.push(
                    Diagnostic::info(
                        source,
                        format!(
                            "颜色数量（{}）多于文本条目（{}），多余颜色不会被使用",
                            config.text_colors.len(),
                            entries.len()
                        ),
                    )
                    .with_field("textColors"),
                );
            }
        }
    }

    if let Some(speed) = config.variable_speed {
        if !speed.min.is_finite() || !speed.max.is_finite() {
            result.push(
                Diagnostic::error(source, "可变速度区间包含非有限值").with_field("variableSpeed"),
            );
        } else if speed.min > speed.max {
            result.push(
                Diagnostic::warn(
                    source,
                    format!("可变速度区间颠倒（min={} > max={}），将按交换后处理", speed.min, speed.max),
                )
                .with_field("variableSpeed"),
            );
        } else if speed.min < 0.0 {
            result.push(
                Diagnostic::warn(source, "可变速度下限为负，负延迟按 0 处理")
                    .with_field("variableSpeed"),
            );
        }
    }

    let blink = config.cursor_blink_duration;
    if config.show_cursor && !(blink.is_finite() && blink > 0.0) {
        result.push(
            Diagnostic::warn(source, "光标闪烁时长必须为正，光标将保持常亮")
                .with_field("cursorBlinkDuration"),
        );
    }

    if config.show_cursor && config.cursor_character.is_empty() {
        result.push(
            Diagnostic::warn(source, "光标字符为空，光标不可见").with_field("cursorCharacter"),
        );
    }

    if config.tag.trim().is_empty() {
        result.push(Diagnostic::error(source, "容器标签为空").with_field("as"));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariableSpeed;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warn("hero", "光标字符为空").with_field("cursorCharacter");
        assert_eq!(format!("{}", diag), "[WARN] hero (cursorCharacter): 光标字符为空");
    }

    #[test]
    fn test_valid_config_is_clean() {
        let config = AnimationConfig {
            looping: false,
            ..AnimationConfig::new("Your new college meal prep buddy")
        };
        assert!(check_config("hero", &config).is_empty());

        let multi = AnimationConfig::new(vec!["Plan", "Cook", "Eat"]);
        assert!(check_config("hero", &multi).is_empty());
    }

    #[test]
    fn test_empty_sequence_is_error() {
        let result = check_config("hero", &AnimationConfig::default());
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].field.as_deref(), Some("text"));
    }

    #[test]
    fn test_inverted_speed_and_blink() {
        let config = AnimationConfig {
            variable_speed: Some(VariableSpeed::new(80.0, 20.0)),
            cursor_blink_duration: 0.0,
            ..AnimationConfig::new(vec!["a", "b"])
        };
        let result = check_config("hero", &config);
        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 2);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Warn).len(), 2);
    }

    #[test]
    fn test_split_lines_notes() {
        let config = AnimationConfig {
            split_lines: Some(vec!["ab".to_string(), "cd".to_string()]),
            ..AnimationConfig::new("something else")
        };
        let result = check_config("hero", &config);
        assert!(!result.has_errors());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.field.as_deref() == Some("text")));

        let blank = AnimationConfig {
            split_lines: Some(vec![String::new()]),
            ..AnimationConfig::default()
        };
        assert!(check_config("hero", &blank).has_errors());
    }
}
