use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily row as returned by a history provider, before cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl DailyBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}
