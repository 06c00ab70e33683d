// ==========================================
// 农场周期订单排产系统 - 边界数据规范化
// ==========================================
// 职责: 把数据库中形态松散的字段解析为领域类型
// 红线: 别名/兜底解析只在这里做,引擎只接受规范化后的值
// ==========================================

use crate::domain::types::{DurationUnit, Frequency, WeekdayMask};
use chrono::{NaiveDate, NaiveDateTime, Weekday};
use rusqlite::types::Value;

/// 解析星期别名
///
/// 支持: "Mon" / "monday" / "MONDAY" / "周一" / "1"（ISO 编号,1=周一）
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(day) = s.parse::<Weekday>() {
        return Some(day);
    }

    match s {
        "周一" | "星期一" => return Some(Weekday::Mon),
        "周二" | "星期二" => return Some(Weekday::Tue),
        "周三" | "星期三" => return Some(Weekday::Wed),
        "周四" | "星期四" => return Some(Weekday::Thu),
        "周五" | "星期五" => return Some(Weekday::Fri),
        "周六" | "星期六" => return Some(Weekday::Sat),
        "周日" | "星期日" | "星期天" => return Some(Weekday::Sun),
        _ => {}
    }

    match s.to_lowercase().as_str() {
        "tues" => Some(Weekday::Tue),
        "weds" => Some(Weekday::Wed),
        "thur" | "thurs" => Some(Weekday::Thu),
        _ => match s.parse::<u32>() {
            Ok(n @ 1..=7) => Weekday::try_from((n - 1) as u8).ok(),
            _ => None,
        },
    }
}

/// 解析星期列表
///
/// 接受 JSON 数组（`["Mon","Thu"]`）或逗号分隔串（`Mon,Thu`）
/// 无法识别的元素跳过,返回 (集合, 被跳过的原值)
pub fn parse_weekday_list(raw: &str) -> (WeekdayMask, Vec<String>) {
    let trimmed = raw.trim();
    let parts: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<serde_json::Value>>(trimmed)
            .map(|values| {
                values
                    .into_iter()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_else(|_| vec![trimmed.to_string()])
    } else {
        trimmed
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    let mut mask = WeekdayMask::EMPTY;
    let mut rejected = Vec::new();
    for part in parts {
        match parse_weekday(&part) {
            Some(day) => mask.insert(day),
            None => rejected.push(part),
        }
    }
    (mask, rejected)
}

/// 解析频率别名
pub fn parse_frequency(raw: &str) -> Option<Frequency> {
    let key: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    match key.as_str() {
        "weekly" | "week" | "1w" => Some(Frequency::Weekly),
        "biweekly" | "fortnightly" | "2w" | "everyotherweek" => Some(Frequency::BiWeekly),
        _ => None,
    }
}

/// 解析时长单位,未知/缺失一律按天
pub fn parse_duration_unit(raw: Option<&str>) -> DurationUnit {
    match raw.map(|s| s.trim().to_lowercase()) {
        Some(s) if matches!(s.as_str(), "hours" | "hour" | "hrs" | "hr" | "h") => {
            DurationUnit::Hours
        }
        _ => DurationUnit::Days,
    }
}

/// 解析日期,兼容 "YYYY-MM-DD" 与带时间的 "YYYY-MM-DD HH:MM:SS" / RFC3339
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// 解析布尔标志（整数 / "true" / "yes" / "Y"）
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on" | "active"
    )
}

// ==========================================
// 列值规范化（SQLite 动态类型）
// ==========================================
// 同一列可能混存 INTEGER / REAL / TEXT,按值而非按声明类型解析

/// 列值转文本;NULL / BLOB 视为缺失
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(v) => Some(v.to_string()),
        Value::Real(v) => Some(v.to_string()),
        Value::Null | Value::Blob(_) => None,
    }
}

/// 列值转非空文本（去除首尾空白后为空视为缺失）
pub fn value_as_non_empty_text(value: &Value) -> Option<String> {
    value_as_text(value)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 列值转有限浮点数,文本按数字解析
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Integer(v) => *v as f64,
        Value::Real(v) => *v,
        Value::Text(s) => s.trim().parse::<f64>().ok()?,
        Value::Null | Value::Blob(_) => return None,
    };
    v.is_finite().then_some(v)
}

/// 列值转 i32;实数必须为整数值
pub fn value_as_i32(value: &Value) -> Option<i32> {
    match value {
        Value::Integer(v) => i32::try_from(*v).ok(),
        Value::Real(v) if v.fract() == 0.0 => i32::try_from(*v as i64).ok(),
        Value::Text(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

/// 列值转布尔标志;NULL / BLOB 视为 false
pub fn value_as_flag(value: &Value) -> bool {
    match value {
        Value::Integer(v) => *v != 0,
        Value::Real(v) => *v != 0.0,
        Value::Text(s) => parse_flag(s),
        Value::Null | Value::Blob(_) => false,
    }
}
