//! 进程配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `BOOKER__*` 覆盖
//! （双下划线表示嵌套，如 `BOOKER__SERVER__BIND=0.0.0.0:8080`）。
//! 这里只承载进程级设置；业务参数（时段、场地数、触发时刻）与
//! Cookie 在凭据存储里，可被外部随时改写（见 store）。

use std::path::PathBuf;

use serde::Deserialize;

/// 进程配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub booking: BookingSection,
}

/// [store] 段：凭据存储文件位置
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "config.json".to_string()
}

impl Default for StoreSection {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

/// [server] 段：Cookie 更新 Webhook
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// X-Auth-Token 校验值，部署前务必改掉默认值
    #[serde(default = "default_auth_token")]
    pub auth_token: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_auth_token() -> String {
    "change-me".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            auth_token: default_auth_token(),
        }
    }
}

/// [http] 段：预订请求的传输参数
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSection {
    /// 单次预订请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for HttpSection {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs() }
    }
}

/// [booking] 段：预订端点
#[derive(Debug, Clone, Deserialize)]
pub struct BookingSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://tybsouthgym.xidian.edu.cn/Field/OrderField".to_string()
}

impl Default for BookingSection {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreSection::default(),
            server: ServerSection::default(),
            http: HttpSection::default(),
            booking: BookingSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 BOOKER__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 BOOKER__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("BOOKER")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.store.path, "config.json");
        assert_eq!(cfg.server.bind, "0.0.0.0:5000");
        assert_eq!(cfg.http.timeout_secs, 5);
        assert!(cfg.booking.base_url.ends_with("/Field/OrderField"));
    }

    #[test]
    fn test_section_defaults_apply_per_field() {
        // 只给 bind 时 auth_token 仍取默认值
        let section: ServerSection =
            serde_json::from_str(r#"{"bind":"127.0.0.1:9000"}"#).unwrap();
        assert_eq!(section.bind, "127.0.0.1:9000");
        assert_eq!(section.auth_token, "change-me");
    }
}
