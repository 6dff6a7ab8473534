//! 响应判读：把一次预订请求的原始响应归成一个明确结论
//!
//! 判定顺序是刻意的：过期 Cookie 下服务端会以 HTTP 200 返回登录页
//! HTML，若先走 JSON 解析就会被误判成普通解析失败，所以登录标记
//! 永远最先检查。

use serde::Deserialize;
use tracing::warn;

/// 一次预订尝试的结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 预订成功（type == 1），每轮至多出现一次
    Success,
    /// 已被他人抢走，本轮内不再尝试该场地
    AlreadyTaken,
    /// 服务端限速，冷却后再试
    RateLimited,
    /// 其他业务失败，短暂延迟后再试
    TransientRetry,
    /// 响应是登录页，Cookie 已失效，终止本轮
    CredentialInvalid,
    /// UTF-8 与 GBK 都无法解码响应体
    DecodeError,
    /// 传输失败 / 非 200 / 响应体不是合法 JSON
    NetworkError,
}

/// 登录页标记：命中任一即视为未登录
const NOT_LOGGED_IN_MARKERS: [&str; 2] = ["用户类型选择", "统一身份认证"];
/// 业务失败消息：场地被抢
const TAKEN_MARKER: &str = "已被其他人抢跑";
/// 业务失败消息：下单过快（限速）
const RATE_MARKER: &str = "下单速度过快";

/// 服务端业务结果。type == 1 表示成功，其余看 message。
#[derive(Debug, Deserialize)]
struct ServerResult {
    #[serde(rename = "type")]
    kind: Option<i64>,
    #[serde(default)]
    message: String,
}

/// 两步解码：先 UTF-8，再 GBK。线上登录页与错误页编码并不一致，
/// 两个标记依赖不同编码才能命中，不能合并成一次"尽力"解码。
pub fn decode_body(body: &[u8]) -> Option<String> {
    if let Ok(s) = std::str::from_utf8(body) {
        return Some(s.to_string());
    }
    let (text, _, had_errors) = encoding_rs::GBK.decode(body);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// 判读一次响应。纯函数：只看状态码与响应体字节。
pub fn classify(status: u16, body: &[u8]) -> AttemptOutcome {
    let Some(text) = decode_body(body) else {
        return AttemptOutcome::DecodeError;
    };

    if NOT_LOGGED_IN_MARKERS.iter().any(|m| text.contains(m)) {
        return AttemptOutcome::CredentialInvalid;
    }

    if status != 200 {
        return AttemptOutcome::NetworkError;
    }

    let result: ServerResult = match serde_json::from_str(&text) {
        Ok(r) => r,
        Err(e) => {
            warn!("响应体不是合法 JSON，按网络类失败处理: {}", e);
            return AttemptOutcome::NetworkError;
        }
    };

    if result.kind == Some(1) {
        return AttemptOutcome::Success;
    }
    if result.message.contains(TAKEN_MARKER) {
        AttemptOutcome::AlreadyTaken
    } else if result.message.contains(RATE_MARKER) {
        AttemptOutcome::RateLimited
    } else {
        AttemptOutcome::TransientRetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let body = r#"{"type":1,"message":"预订成功"}"#;
        assert_eq!(classify(200, body.as_bytes()), AttemptOutcome::Success);
    }

    #[test]
    fn test_already_taken() {
        let body = r#"{"type":0,"message":"该场地已被其他人抢跑，请选择其他场地"}"#;
        assert_eq!(classify(200, body.as_bytes()), AttemptOutcome::AlreadyTaken);
    }

    #[test]
    fn test_rate_limited() {
        let body = r#"{"type":0,"message":"下单速度过快，请稍后再试"}"#;
        assert_eq!(classify(200, body.as_bytes()), AttemptOutcome::RateLimited);
    }

    #[test]
    fn test_other_business_failure_is_transient() {
        let body = r#"{"type":0,"message":"系统繁忙"}"#;
        assert_eq!(classify(200, body.as_bytes()), AttemptOutcome::TransientRetry);
    }

    #[test]
    fn test_missing_type_is_not_success() {
        let body = r#"{"message":"预订成功"}"#;
        assert_eq!(classify(200, body.as_bytes()), AttemptOutcome::TransientRetry);
    }

    #[test]
    fn test_non_200_status() {
        assert_eq!(classify(502, b"Bad Gateway"), AttemptOutcome::NetworkError);
    }

    #[test]
    fn test_unparseable_json_on_200() {
        let body = b"<html><body>Oops</body></html>";
        assert_eq!(classify(200, body), AttemptOutcome::NetworkError);
    }

    #[test]
    fn test_login_marker_wins_over_status() {
        // 登录标记的优先级高于状态码与 JSON 可解析性
        let body = "<html><title>用户类型选择</title></html>";
        assert_eq!(classify(500, body.as_bytes()), AttemptOutcome::CredentialInvalid);
        assert_eq!(classify(200, body.as_bytes()), AttemptOutcome::CredentialInvalid);
    }

    #[test]
    fn test_login_marker_wins_over_parseable_json() {
        let body = r#"{"type":1,"message":"统一身份认证"}"#;
        assert_eq!(classify(200, body.as_bytes()), AttemptOutcome::CredentialInvalid);
    }

    #[test]
    fn test_gbk_fallback_decode() {
        // 登录页偶见 GBK 编码：这些字节不是合法 UTF-8，必须走第二步解码
        let (gbk, _, _) = encoding_rs::GBK.encode("<html>用户类型选择</html>");
        assert!(std::str::from_utf8(&gbk).is_err());
        assert_eq!(classify(200, &gbk), AttemptOutcome::CredentialInvalid);
    }

    #[test]
    fn test_undecodable_body() {
        // 0xFF 在 UTF-8 与 GBK 下都非法
        assert_eq!(classify(200, &[0xff, 0xff, 0xff]), AttemptOutcome::DecodeError);
    }

    #[test]
    fn test_empty_body_is_transient_path() {
        // 空体可解码为空串，200 下 JSON 解析失败 -> 网络类失败
        assert_eq!(classify(200, b""), AttemptOutcome::NetworkError);
    }
}
