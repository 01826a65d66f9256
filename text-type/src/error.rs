//! # Error 模块
//!
//! 定义 text-type 中使用的错误类型。
//!
//! 动画核心本身不会失败：非法配置只会让动画停在空闲状态。
//! 这里的错误只出现在边界上（从 JSON 读取配置）。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON 解析失败
    #[error("动画配置解析失败（第 {line} 行第 {column} 列）：{message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// 序列化失败
    #[error("动画配置序列化失败：{message}")]
    Serialize { message: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Self::Parse {
                line: err.line(),
                column: err.column(),
                message: err.to_string(),
            }
        } else {
            Self::Serialize {
                message: err.to_string(),
            }
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
