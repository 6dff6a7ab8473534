//! 预订请求编码：checkdata 负载构造与完整 URL 拼装
//!
//! 与线上抓包用例保持一致：checkdata 是单元素 JSON 数组，整体百分号
//! 转义后作为一个查询参数，再拼上固定的 dateadd 与 VenueNo。
//! 相同输入必须产生字节级一致的 URL。

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// 要预订的当日时刻区间（注意：不是抢票轮询窗口）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWindow {
    pub begin_time: String,
    pub end_time: String,
}

/// 固定场地类型编号（健身房）
const FIELD_TYPE_NO: &str = "006";
/// 固定单价
const PRICE: &str = "2.00";
/// 固定偏移天数：抢后天的场
const DATE_ADD: &str = "2";
/// 固定场馆编号
const VENUE_NO: &str = "01";

/// 与 urllib.parse.quote 的默认行为对齐：字母数字与 "_.-~/" 之外全部转义
const CHECKDATA_QUOTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// 服务端要求的 checkdata 单项。字段名与 `Endtime` 的大小写是线上
/// 格式，不能改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckData {
    #[serde(rename = "FieldNo")]
    pub field_no: String,
    #[serde(rename = "FieldTypeNo")]
    pub field_type_no: String,
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "BeginTime")]
    pub begin_time: String,
    #[serde(rename = "Endtime")]
    pub end_time: String,
    #[serde(rename = "Price")]
    pub price: String,
}

impl CheckData {
    pub fn new(field_no: &str, field_name: &str, window: &BookingWindow) -> Self {
        Self {
            field_no: field_no.to_string(),
            field_type_no: FIELD_TYPE_NO.to_string(),
            field_name: field_name.to_string(),
            begin_time: window.begin_time.clone(),
            end_time: window.end_time.clone(),
            price: PRICE.to_string(),
        }
    }
}

/// 序列化并转义 checkdata 查询参数值
pub fn encode_checkdata(field_no: &str, field_name: &str, window: &BookingWindow) -> String {
    let items = [CheckData::new(field_no, field_name, window)];
    let json = serde_json::to_string(&items).expect("checkdata 只含字符串字段，序列化不会失败");
    utf8_percent_encode(&json, CHECKDATA_QUOTE).to_string()
}

/// 构造一次预订尝试的完整请求 URL
pub fn booking_url(base_url: &str, field_no: &str, field_name: &str, window: &BookingWindow) -> String {
    format!(
        "{}?checkdata={}&dateadd={}&VenueNo={}",
        base_url,
        encode_checkdata(field_no, field_name, window),
        DATE_ADD,
        VENUE_NO,
    )
}

/// encode_checkdata 的逆：测试用，回解结构化字段
pub fn decode_checkdata(param: &str) -> Result<Vec<CheckData>, serde_json::Error> {
    let json = percent_decode_str(param).decode_utf8_lossy();
    serde_json::from_str(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> BookingWindow {
        BookingWindow {
            begin_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = booking_url("https://example.com/Field/OrderField", "JSP014", "健身房14", &window());
        let b = booking_url("https://example.com/Field/OrderField", "JSP014", "健身房14", &window());
        assert_eq!(a, b);
    }

    #[test]
    fn test_url_shape() {
        let url = booking_url("https://example.com/Field/OrderField", "JSP001", "健身房01", &window());
        assert!(url.starts_with("https://example.com/Field/OrderField?checkdata="));
        assert!(url.ends_with("&dateadd=2&VenueNo=01"));
        // JSON 结构字符与中文必须全部被转义
        let query = url.split_once('?').unwrap().1;
        assert!(query.is_ascii());
        assert!(!query.contains('{'));
        assert!(!query.contains('"'));
        assert!(!query.contains(' '));
    }

    #[test]
    fn test_checkdata_round_trip() {
        let encoded = encode_checkdata("JSP014", "健身房14", &window());
        let decoded = decode_checkdata(&encoded).unwrap();
        assert_eq!(decoded, vec![CheckData::new("JSP014", "健身房14", &window())]);
    }

    #[test]
    fn test_wire_field_names() {
        let encoded = encode_checkdata("JSP002", "健身房02", &window());
        let json = percent_decode_str(&encoded).decode_utf8().unwrap();
        // 服务端字段名大小写（含 Endtime 的小写 t）必须原样保留
        assert!(json.contains("\"FieldNo\":\"JSP002\""));
        assert!(json.contains("\"FieldTypeNo\":\"006\""));
        assert!(json.contains("\"Endtime\":\"12:00\""));
        assert!(json.contains("\"Price\":\"2.00\""));
        assert!(json.starts_with('[') && json.ends_with(']'));
    }

    #[test]
    fn test_unknown_field_still_encodable() {
        let encoded = encode_checkdata("WHAT", "未知场地", &window());
        let decoded = decode_checkdata(&encoded).unwrap();
        assert_eq!(decoded[0].field_no, "WHAT");
        assert_eq!(decoded[0].field_name, "未知场地");
    }
}
