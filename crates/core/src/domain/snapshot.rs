use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted market data, keyed by asset id (e.g. `^GSPC`).
pub type SnapshotStore = BTreeMap<String, AssetSnapshot>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    pub name: String,
    pub current_price: f64,
    pub change_percent: f64,
    /// Chronological daily closes.
    #[serde(default)]
    pub history: Vec<PricePoint>,
    #[serde(with = "timestamp_format")]
    pub last_updated: NaiveDateTime,
    pub currency: String,
    pub source: String,
}

impl AssetSnapshot {
    pub fn last_history_date(&self) -> Option<NaiveDate> {
        self.history.last().map(|p| p.date)
    }
}

/// Dashboard-facing timestamp, `YYYY-MM-DD HH:MM:SS` without zone.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
