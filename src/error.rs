//! 错误类型：启动期致命 vs 轮内可消化
//!
//! 轮内的网络/解码/限速失败全部在 round 内部按重试处理，不会出现
//! 在这里；这里只收进程级错误，其中配置与存储加载失败仅在启动时致命。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookerError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store io error: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("Store parse error: {0}")]
    StoreParse(#[from] serde_json::Error),

    #[error("Store format error: {0}")]
    StoreFormat(String),

    #[error("Invalid time-of-day '{0}', expected HH:MM")]
    InvalidTime(String),
}
