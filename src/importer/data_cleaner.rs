// ==========================================
// 加热炉周期核验系统 - 数据清洗器实现
// ==========================================
// 职责: 时间戳解析 / 数值解析 / 千分位逗号清理
// 规则: 解析失败返回 None，由调用方丢弃整行并计数
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// 支持的日期时间格式
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M",
];

/// 支持的纯日期格式（时间取 00:00）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

/// Excel 序列日的合理范围（1900-01-01 ~ 2173 年左右）
const EXCEL_SERIAL_MIN: f64 = 1.0;
const EXCEL_SERIAL_MAX: f64 = 100_000.0;

pub struct DataCleaner;

impl DataCleaner {
    /// 解析时间戳
    ///
    /// # 支持
    /// - 文本日期时间（-、/、. 分隔，空格或 T 连接）
    /// - 纯日期（取零点）
    /// - Excel 序列日（含小数部分的时间）
    pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(ts);
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        value
            .parse::<f64>()
            .ok()
            .and_then(Self::excel_serial_to_datetime)
    }

    /// Excel 序列日 → 时间（基准 1899-12-30，精确到秒）
    pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || !(EXCEL_SERIAL_MIN..EXCEL_SERIAL_MAX).contains(&serial) {
            return None;
        }
        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let seconds = (serial * 86_400.0).round() as i64;
        base.checked_add_signed(Duration::seconds(seconds))
    }

    /// 解析数值（必须为有限值）
    pub fn parse_number(value: &str) -> Option<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// 解析装炉量：去除千分位逗号后解析
    pub fn parse_weight(value: &str) -> Option<f64> {
        Self::parse_number(&value.replace(',', ""))
    }

    /// 机组号清洗（TRIM + UPPER）
    pub fn clean_unit(value: &str) -> String {
        value.trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(
            DataCleaner::parse_timestamp("2025-03-10 08:30:15"),
            Some(dt(2025, 3, 10, 8, 30, 15))
        );
        assert_eq!(
            DataCleaner::parse_timestamp("2025/03/10 08:30"),
            Some(dt(2025, 3, 10, 8, 30, 0))
        );
        assert_eq!(
            DataCleaner::parse_timestamp("2025.03.10 08:30"),
            Some(dt(2025, 3, 10, 8, 30, 0))
        );
        assert_eq!(
            DataCleaner::parse_timestamp("2025-03-10T08:30:00"),
            Some(dt(2025, 3, 10, 8, 30, 0))
        );
        assert_eq!(
            DataCleaner::parse_timestamp(" 2025-03-10 "),
            Some(dt(2025, 3, 10, 0, 0, 0))
        );
        assert_eq!(
            DataCleaner::parse_timestamp("20250310"),
            Some(dt(2025, 3, 10, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_excel_serial() {
        // 45726 = 2025-03-10，0.5 = 12:00
        assert_eq!(
            DataCleaner::parse_timestamp("45726.5"),
            Some(dt(2025, 3, 10, 12, 0, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert_eq!(DataCleaner::parse_timestamp(""), None);
        assert_eq!(DataCleaner::parse_timestamp("점검중"), None);
        assert_eq!(DataCleaner::parse_timestamp("-3"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(DataCleaner::parse_number(" 1250.5 "), Some(1250.5));
        assert_eq!(DataCleaner::parse_number("NaN"), None);
        assert_eq!(DataCleaner::parse_number("inf"), None);
        assert_eq!(DataCleaner::parse_number(""), None);
    }

    #[test]
    fn test_parse_weight_strips_thousands_separator() {
        assert_eq!(DataCleaner::parse_weight("20,000"), Some(20000.0));
        assert_eq!(DataCleaner::parse_weight("1,234,567.5"), Some(1234567.5));
        assert_eq!(DataCleaner::parse_weight("abc"), None);
    }

    #[test]
    fn test_clean_unit() {
        assert_eq!(DataCleaner::clean_unit(" f5 "), "F5");
    }
}
