//! 服务器错误定义
//!
//! 启动和运行期的顶层错误。请求处理期的错误见 [`crate::utils::AppError`]。

use thiserror::Error;

use crate::store::StorageError;

/// 服务器错误类型
#[derive(Error, Debug)]
pub enum ServerError {
    /// 存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 内部服务器错误
    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器结果类型
pub type Result<T> = std::result::Result<T, ServerError>;
