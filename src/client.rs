//! HTTP 发送层：对预订端点的一次 GET 尝试
//!
//! 只带 Cookie 头，与线上抓包用例一致；单次请求有超时上限，
//! 挂起的连接最多拖住一次尝试，不会拖垮整轮。

use async_trait::async_trait;
use reqwest::header::COOKIE;

/// 一次请求的原始响应。编码问题交给判读层，这里保留原始字节。
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// 预订请求发送端。线上用 HttpBookingClient，测试用脚本化 Mock。
#[async_trait]
pub trait BookingClient: Send + Sync {
    /// 发送一次预订请求；Err 表示传输层失败（超时/连接错误），
    /// 由调用方按网络错误处理
    async fn send(&self, url: &str, cookie: &str) -> Result<RawResponse, String>;
}

/// 基于 reqwest 的线上实现
pub struct HttpBookingClient {
    client: reqwest::Client,
}

impl HttpBookingClient {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl BookingClient for HttpBookingClient {
    async fn send(&self, url: &str, cookie: &str) -> Result<RawResponse, String> {
        let resp = self
            .client
            .get(url)
            .header(COOKIE, cookie)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| e.to_string())?.to_vec();
        Ok(RawResponse { status, body })
    }
}
