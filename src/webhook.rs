//! Cookie 更新 Webhook
//!
//! 浏览器端脚本检测到新 Cookie 后 POST 到 /update-cookie；
//! 先校验 X-Auth-Token，再写入凭据存储，下一轮 load() 即可读到。
//! 与抢票循环唯一的共享状态就是存储文件本身。

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::store::CredentialStore;

/// Webhook 服务状态
pub struct WebhookState {
    pub store: CredentialStore,
    pub auth_token: String,
}

/// POST /update-cookie 请求体
#[derive(Debug, Deserialize)]
pub struct UpdateCookieRequest {
    #[serde(default)]
    pub cookie: String,
}

/// 统一响应体
#[derive(Debug, Serialize)]
pub struct UpdateCookieResponse {
    pub status: &'static str,
    pub message: &'static str,
}

fn reply(
    code: StatusCode,
    status: &'static str,
    message: &'static str,
) -> (StatusCode, Json<UpdateCookieResponse>) {
    (code, Json(UpdateCookieResponse { status, message }))
}

/// 创建 Webhook 路由
pub fn create_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/update-cookie", post(update_cookie))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

/// POST /update-cookie - 接收新 Cookie 并写入存储
async fn update_cookie(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    Json(req): Json<UpdateCookieRequest>,
) -> (StatusCode, Json<UpdateCookieResponse>) {
    let token = headers.get("X-Auth-Token").and_then(|v| v.to_str().ok());
    if token != Some(state.auth_token.as_str()) {
        warn!("接收到未授权的 Cookie 更新请求");
        return reply(StatusCode::FORBIDDEN, "error", "Forbidden");
    }

    if req.cookie.is_empty() {
        warn!("接收到的 Cookie 为空");
        return reply(StatusCode::BAD_REQUEST, "error", "Cookie is empty");
    }

    // 只记录尾部，完整凭据不进日志
    let tail: String = req
        .cookie
        .chars()
        .rev()
        .take(20)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    info!("成功接收到新的 Cookie: ...{}", tail);

    match state.store.update_cookie(&req.cookie) {
        Ok(()) => {
            info!("凭据存储中的 Cookie 已更新");
            reply(StatusCode::OK, "success", "Cookie updated successfully")
        }
        Err(e) => {
            error!("写入凭据存储失败: {}", e);
            reply(StatusCode::INTERNAL_SERVER_ERROR, "error", "Internal Server Error")
        }
    }
}
