use crate::{LastFmError, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One week of a weekly chart list, bounded by unix timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyChart {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeeklyChart {
    pub(crate) fn from_json(data: &Value) -> Result<Self> {
        Ok(Self {
            start: Self::timestamp(data, "from")?,
            end: Self::timestamp(data, "to")?,
        })
    }

    fn timestamp(data: &Value, key: &str) -> Result<DateTime<Utc>> {
        let raw = match data.get(key) {
            Some(Value::String(text)) => text.parse::<i64>().ok(),
            Some(Value::Number(number)) => number.as_i64(),
            _ => None,
        };
        raw.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .ok_or_else(|| LastFmError::Parse(format!("chart is missing `{key}` timestamp")))
    }
}
