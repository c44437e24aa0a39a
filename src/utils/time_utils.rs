// time_utils.rs
//
// 提供日期解析相關的工具函數，用於把 CSV 中的日期字串轉為領域模型的日期。
// 上游匯出的日期可能帶有時間部分（例如 00:00:00），
// 這裡統一截取日期部分。

use chrono::{NaiveDate, NaiveDateTime};

/// 預設嘗試的日期格式
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// 預設嘗試的日期時間格式
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// 解析日期字串
///
/// 先使用指定格式，失敗時依序嘗試預設的日期與日期時間格式。
pub fn parse_date(value: &str, preferred_format: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, preferred_format) {
        return Some(date);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// 解析命令列或配置中的可選日期
pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match value {
        None => Ok(None),
        Some(raw) => parse_date(raw, DATE_FORMATS[0])
            .map(Some)
            .ok_or_else(|| format!("無法解析日期: {}", raw)),
    }
}
