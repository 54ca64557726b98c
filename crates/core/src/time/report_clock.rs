use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

/// Zone used for `last_updated` stamps and report dates. An explicit hour offset wins;
/// otherwise the host's local offset.
pub fn report_offset(hours: Option<i32>) -> anyhow::Result<FixedOffset> {
    match hours {
        Some(h) => {
            anyhow::ensure!((-23..=23).contains(&h), "REPORT_TZ_OFFSET_HOURS out of range: {h}");
            FixedOffset::east_opt(h * 3600).context("invalid report offset")
        }
        None => Ok(chrono::Local::now().offset().fix()),
    }
}

pub fn local_stamp(now_utc: DateTime<Utc>, offset: FixedOffset) -> NaiveDateTime {
    now_utc.with_timezone(&offset).naive_local()
}

pub fn resolve_report_date(
    date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
    offset: FixedOffset,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = date_arg {
        return NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date {s:?}; expected YYYY-MM-DD"));
    }
    Ok(now_utc.with_timezone(&offset).date_naive())
}
