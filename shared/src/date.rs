//! 时间类型模块
//!
//! API 中的时间字段是 ISO 8601 字符串，可能带时区（`Z` / `+00:00`），
//! 也可能是不带时区的本地表示（按 UTC 解释）。
//! - `Timestamp`: 可序列化的 UTC 时间点
//! - `Timestamp::now()`: 当前时间，wasm 下通过 chrono 的 `wasmbind` 读取 JS Date

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 不带时区的时间字符串可能出现的格式
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// UTC 时间点
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    #[inline]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    #[inline]
    pub const fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// 解析 API 返回的时间字符串
    ///
    /// 返回 None 如果解析失败
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }

    /// 解析 `<input type="datetime-local">` 的值（浏览器本地时区）
    pub fn from_local_input(s: &str) -> Option<Self> {
        let s = s.trim();
        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    #[inline]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    #[inline]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// 与 JS `toISOString()` 一致的格式，如 `2024-06-01T12:00:00.000Z`
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// 界面展示用（本地时区）
    pub fn to_display(&self) -> String {
        self.0
            .with_timezone(&Local)
            .format("%d.%m.%Y %H:%M")
            .to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zulu_and_offset_forms() {
        let a = Timestamp::parse("2024-06-01T12:00:00Z").unwrap();
        let b = Timestamp::parse("2024-06-01T15:00:00+03:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn naive_strings_are_read_as_utc() {
        let naive = Timestamp::parse("2024-06-01T12:00:00.123456").unwrap();
        let zulu = Timestamp::parse("2024-06-01T12:00:00.123456Z").unwrap();
        assert_eq!(naive, zulu);
        assert!(Timestamp::parse("2024-06-01T12:00").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Timestamp::parse("").is_none());
        assert!(Timestamp::parse("yesterday").is_none());
        assert!(Timestamp::from_local_input("").is_none());
    }

    #[test]
    fn iso_output_matches_js_format() {
        let ts = Timestamp::parse("2024-06-01T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso(), "2024-06-01T12:00:00.000Z");
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-06-01T12:00:00.000Z\"");
    }
}
