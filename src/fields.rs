//! 场地目录：编号与展示名的纯映射
//!
//! 不做存在性校验——场地是否可订由服务端裁决，这里只负责命名；
//! 无法解析的编号映射到哨兵名，日志里可与正常场地区分。

/// 无法解析的场地编号对应的哨兵展示名
pub const UNKNOWN_FIELD: &str = "未知场地";

/// 第 index 块场地的编号（1 起算），如 1 -> "JSP001"
pub fn field_no(index: u32) -> String {
    format!("JSP{:03}", index)
}

/// 场地编号 -> 展示名，如 "JSP014" -> "健身房14"
pub fn field_name(field_no: &str) -> String {
    match field_no
        .strip_prefix("JSP")
        .and_then(|n| n.parse::<u32>().ok())
    {
        Some(n) => format!("健身房{:02}", n),
        None => UNKNOWN_FIELD.to_string(),
    }
}
