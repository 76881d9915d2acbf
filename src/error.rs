//! # 统一错误处理模块
//!
//! 定义 imgopt 的错误类型，使用 `thiserror` 派生。
//!
//! - `ImgoptError`: 批处理级错误（参数校验、目录、报告写入），出现即中止整个批次
//! - `TransformError`: 单文件转换错误，只记录到 `BatchResult`，不中止批次
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// imgopt 批处理级错误类型
#[derive(Error, Debug)]
pub enum ImgoptError {
    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 执行环境
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ImgoptError>;

/// 单文件错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Decode,
    Encode,
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not-found"),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Encode => write!(f, "encode"),
            ErrorKind::Io => write!(f, "io"),
        }
    }
}

/// 单文件转换错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("cannot decode image: {0}")]
    Decode(String),

    #[error("cannot encode image: {0}")]
    Encode(String),

    #[error("io error: {0}")]
    Io(String),
}

impl TransformError {
    /// 错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::NotFound(_) => ErrorKind::NotFound,
            TransformError::Decode(_) => ErrorKind::Decode,
            TransformError::Encode(_) => ErrorKind::Encode,
            TransformError::Io(_) => ErrorKind::Io,
        }
    }

    /// 不带分类前缀的原始消息
    pub fn message(&self) -> &str {
        match self {
            TransformError::NotFound(msg)
            | TransformError::Decode(msg)
            | TransformError::Encode(msg)
            | TransformError::Io(msg) => msg,
        }
    }
}
