/// Wire format for timestamps
///
/// Task timestamps and error-body times are rendered as `yyyy-MM-dd HH:mm`
/// (minute precision, no timezone suffix). This module provides the chrono
/// format string, a serde adapter for model fields, and a helper for
/// error responses.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{self, Deserialize, Deserializer, Serializer};

/// chrono format string for `yyyy-MM-dd HH:mm`
pub const FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats the current instant for error bodies
pub fn now_string() -> String {
    Utc::now().format(FORMAT).to_string()
}

/// Serializes a `DateTime<Utc>` as `yyyy-MM-dd HH:mm`
pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(FORMAT).to_string())
}

/// Deserializes a `yyyy-MM-dd HH:mm` string back into a `DateTime<Utc>`
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let naive = NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)?;
    Ok(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_serializes_minute_precision() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        let stamped = Stamped {
            at: Utc.from_utc_datetime(&naive),
        };

        let json = serde_json::to_string(&stamped).unwrap();
        assert_eq!(json, r#"{"at":"2024-03-07 09:05"}"#);
    }

    #[test]
    fn test_roundtrip_drops_seconds() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        let stamped = Stamped {
            at: Utc.from_utc_datetime(&naive),
        };

        let json = serde_json::to_string(&stamped).unwrap();
        let back: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at.format("%S").to_string(), "00");
    }

    #[test]
    fn test_now_string_shape() {
        let s = now_string();
        // "2024-03-07 09:05" is 16 chars
        assert_eq!(s.len(), 16);
        assert_eq!(&s[10..11], " ");
    }
}
