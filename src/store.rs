//! 凭据存储：可被 Webhook 随时改写的 JSON 文件
//!
//! 引擎每轮开始整体读一次快照（读完即用，不边读边用）；轮内不回读，
//! 所以外部改写最早在下一轮生效。update_cookie 做读-改-写，
//! 保留文件里引擎不认识的键。

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::BookerError;

/// 一次 load() 得到的一致快照
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSnapshot {
    /// 会话凭据，来自浏览器，由 Webhook 更新；内容对引擎不透明
    #[serde(default)]
    pub cookie: String,
    /// 预订时段起点 HH:MM
    #[serde(default = "default_begin_time")]
    pub begin_time: String,
    /// 预订时段终点 HH:MM
    #[serde(default = "default_end_time")]
    pub end_time: String,
    /// 每日触发时刻 HH:MM
    #[serde(default = "default_trigger_time")]
    pub trigger_time: String,
    /// 抢票窗口时长（分钟）
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u64,
    /// 场地总数（JSP001..JSPnnn）
    #[serde(default = "default_field_count")]
    pub field_count: u32,
}

fn default_begin_time() -> String {
    "09:00".to_string()
}

fn default_end_time() -> String {
    "12:00".to_string()
}

fn default_trigger_time() -> String {
    "12:00".to_string()
}

fn default_window_minutes() -> u64 {
    10
}

fn default_field_count() -> u32 {
    30
}

/// 凭据存储句柄。只持有路径，读写都走磁盘，外部写入随时可见。
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读取完整快照。文件缺失或格式错误返回 Err，启动时视为致命。
    pub fn load(&self) -> Result<StoreSnapshot, BookerError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&raw)?;
        info!("成功加载凭据存储 '{}'", self.path.display());
        Ok(snapshot)
    }

    /// 更新 cookie，保留文件中的其他键；文件不存在则新建
    pub fn update_cookie(&self, new_cookie: &str) -> Result<(), BookerError> {
        let mut root: Value = match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Object(Default::default()),
            Err(e) => return Err(e.into()),
        };
        let obj = root
            .as_object_mut()
            .ok_or_else(|| BookerError::StoreFormat("顶层必须是 JSON 对象".to_string()))?;
        obj.insert("cookie".to_string(), Value::String(new_cookie.to_string()));
        std::fs::write(&self.path, serde_json::to_string_pretty(&root)?)?;
        Ok(())
    }
}
