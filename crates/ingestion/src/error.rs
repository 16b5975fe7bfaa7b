//! Ingestion 错误类型

use thiserror::Error;

/// 单行解码错误
///
/// 不会中断输入流：调用方记录日志后继续读取下一行。
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 结构或类型不匹配
    #[error("malformed reading: {message}")]
    Malformed {
        /// 出错的原始行
        line: String,
        /// 解析器诊断信息
        message: String,
    },

    /// 非 UTF-8 输入
    #[error("line is not valid UTF-8: {message}")]
    InvalidUtf8 {
        /// 出错的原始行（有损转换）
        line: String,
        /// 诊断信息
        message: String,
    },
}

impl DecodeError {
    /// 出错的原始行
    pub fn line(&self) -> &str {
        match self {
            Self::Malformed { line, .. } | Self::InvalidUtf8 { line, .. } => line,
        }
    }
}

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 读取输入流失败
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// 投递 worker 已退出，交接通道关闭
    #[error("handoff channel closed, delivery worker is gone")]
    HandoffClosed,
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
