//! booker - 西电体育馆每日自动抢场地
//!
//! 模块划分：
//! - **classify**: 响应判读（判定顺序是整个设计的核心）
//! - **client**: HTTP 发送层（reqwest，单次请求超时）
//! - **config**: 进程配置加载（TOML + 环境变量）
//! - **encode**: checkdata 负载与请求 URL 编码
//! - **error**: 错误类型
//! - **fields**: 场地目录（编号 -> 展示名）
//! - **round**: 抢票轮次引擎（状态机核心）
//! - **store**: 凭据存储（Webhook 可随时改写的 JSON 文件）
//! - **trigger**: 每日定时触发
//! - **webhook**: Cookie 更新 Webhook（axum）

pub mod classify;
pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod fields;
pub mod round;
pub mod store;
pub mod trigger;
pub mod webhook;

pub use classify::AttemptOutcome;
pub use round::{run_round, RoundConfig, RoundOutcome};
