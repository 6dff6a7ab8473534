//! booker - 西电体育馆每日自动抢场地
//!
//! 入口：初始化日志，加载进程配置，校验凭据存储，
//! 拉起 Cookie 更新 Webhook，进入每日触发循环。
//! `--once` 跳过调度立即执行一轮后退出（联调用）。

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use booker::client::HttpBookingClient;
use booker::config::load_config;
use booker::store::CredentialStore;
use booker::trigger::{run_daily, run_once};
use booker::webhook::{create_router, WebhookState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    tracing::info!("应用启动...");

    let app = load_config(None).context("Failed to load config")?;

    // 启动即校验凭据存储：缺失或格式错误直接退出
    let store = CredentialStore::new(&app.store.path);
    store
        .load()
        .with_context(|| format!("无法启动：请确保凭据存储文件 '{}' 存在且格式正确", app.store.path))?;

    let client = HttpBookingClient::new(app.http.timeout_secs);

    if std::env::args().any(|a| a == "--once") {
        run_once(&app, &store, &client).await;
        return Ok(());
    }

    // Webhook 与调度循环并行；唯一共享状态是存储文件，各自持句柄
    let webhook_state = Arc::new(WebhookState {
        store: CredentialStore::new(&app.store.path),
        auth_token: app.server.auth_token.clone(),
    });
    let router = create_router(webhook_state);
    let bind = app.server.bind.clone();
    tokio::spawn(async move {
        let listener = match tokio::net::TcpListener::bind(&bind).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Cookie 更新 Webhook 监听 {} 失败: {}", bind, e);
                return;
            }
        };
        tracing::info!("Cookie 更新 Webhook 已监听 {}", bind);
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Webhook 服务终止: {}", e);
        }
    });

    run_daily(&app, &store, &client).await;
    Ok(())
}
