use crate::domain::snapshot::PricePoint;
use crate::ingest::types::DailyBar;
use anyhow::{ensure, Result};

/// How much shorter than the stored history a fetched series may be and still be trusted
/// as authoritative.
///
/// Heuristic: the value is arbitrary and not derived from any provider guarantee. A
/// provider that returns a truncated window (rate limits, partial outages) typically comes
/// back far shorter than this, which is what the slack is meant to catch.
pub const HISTORY_SLACK: usize = 10;

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Sorts bars chronologically and collapses rows sharing a date, keeping the last one the
/// provider sent for that date.
pub fn normalize_bars(mut bars: Vec<DailyBar>) -> Vec<DailyBar> {
    // Stable sort so that "last occurrence" below still means provider order.
    bars.sort_by_key(|b| b.date);

    let mut out: Vec<DailyBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}

pub fn to_history(bars: &[DailyBar]) -> Vec<PricePoint> {
    bars.iter()
        .map(|b| PricePoint {
            date: b.date,
            close: round2(b.close),
        })
        .collect()
}

pub fn change_percent(previous: f64, current: f64) -> Result<f64> {
    ensure!(
        previous != 0.0 && previous.is_finite(),
        "previous close must be non-zero (got {previous})"
    );
    Ok((current - previous) / previous * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestQuote {
    pub current_price: f64,
    pub previous_close: f64,
    pub change_percent: f64,
}

/// Current price and session change from the last two bars of a chronologically sorted
/// series.
pub fn latest_quote(bars: &[DailyBar]) -> Result<LatestQuote> {
    ensure!(
        bars.len() >= 2,
        "need at least two closes to compute a change (got {})",
        bars.len()
    );
    let current_price = bars[bars.len() - 1].close;
    let previous_close = bars[bars.len() - 2].close;
    Ok(LatestQuote {
        current_price,
        previous_close,
        change_percent: change_percent(previous_close, current_price)?,
    })
}

/// Combines stored and freshly fetched history.
///
/// Heuristic: when `new` is at most [`HISTORY_SLACK`] points shorter than `old` it replaces
/// `old` wholesale, since the provider may have corrected past closes. Otherwise `new` is
/// treated as truncated and only its points dated strictly after the last stored date are
/// appended. No deduplication, gap detection or date-order validation happens here.
pub fn merge_history(old: &[PricePoint], new: Vec<PricePoint>) -> Vec<PricePoint> {
    if old.len() <= new.len() + HISTORY_SLACK {
        return new;
    }

    let Some(last_old) = old.last().map(|p| p.date) else {
        return new;
    };

    let mut merged = old.to_vec();
    merged.extend(new.into_iter().filter(|p| p.date > last_old));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(n)
    }

    fn series(start: i64, len: usize, base: f64) -> Vec<PricePoint> {
        (0..len)
            .map(|i| PricePoint {
                date: day(start + i as i64),
                close: base + i as f64,
            })
            .collect()
    }

    #[test]
    fn replaces_when_new_is_within_slack() {
        let old = series(0, 100, 1.0);
        let new = series(5, 90, 500.0);
        let merged = merge_history(&old, new.clone());
        assert_eq!(merged, new);
    }

    #[test]
    fn replaces_when_new_is_longer() {
        let old = series(0, 5, 1.0);
        let new = series(0, 8, 2.0);
        assert_eq!(merge_history(&old, new.clone()), new);
    }

    #[test]
    fn appends_only_newer_points_when_new_is_truncated() {
        let old = series(0, 100, 1.0);
        // 30 points overlapping the tail of old, the last 3 are new dates.
        let new = series(73, 30, 900.0);
        let merged = merge_history(&old, new);

        assert_eq!(merged.len(), 103);
        assert_eq!(&merged[..100], &old[..]);
        assert_eq!(merged[100].date, day(100));
        assert_eq!(merged[100].close, 927.0);
        assert_eq!(merged[102].date, day(102));
    }

    #[test]
    fn boundary_at_exact_slack_replaces() {
        let old = series(0, 20, 1.0);
        let new = series(0, 10, 7.0);
        assert_eq!(merge_history(&old, new.clone()), new);

        let shorter = series(0, 9, 7.0);
        assert_eq!(merge_history(&old, shorter), old);
    }

    #[test]
    fn empty_new_against_long_old_keeps_old() {
        let old = series(0, 40, 1.0);
        assert_eq!(merge_history(&old, Vec::new()), old);
    }

    #[test]
    fn normalize_sorts_and_keeps_last_duplicate() {
        let bars = vec![
            DailyBar::new(day(2), 12.0),
            DailyBar::new(day(0), 10.0),
            DailyBar::new(day(2), 12.5),
            DailyBar::new(day(1), 11.0),
        ];
        let norm = normalize_bars(bars);
        assert_eq!(
            norm,
            vec![
                DailyBar::new(day(0), 10.0),
                DailyBar::new(day(1), 11.0),
                DailyBar::new(day(2), 12.5),
            ]
        );
    }

    #[test]
    fn latest_quote_uses_last_two_closes() {
        let bars = vec![
            DailyBar::new(day(0), 95.0),
            DailyBar::new(day(1), 100.0),
            DailyBar::new(day(2), 110.0),
        ];
        let q = latest_quote(&bars).unwrap();
        assert_eq!(q.current_price, 110.0);
        assert_eq!(q.previous_close, 100.0);
        assert!((q.change_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn latest_quote_needs_two_points() {
        assert!(latest_quote(&[DailyBar::new(day(0), 1.0)]).is_err());
    }

    #[test]
    fn change_percent_rejects_zero_previous() {
        assert!(change_percent(0.0, 10.0).is_err());
        assert!((change_percent(100.0, 90.0).unwrap() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn to_history_rounds_to_cents() {
        let h = to_history(&[DailyBar::new(day(0), 4512.3456)]);
        assert_eq!(h[0].close, 4512.35);
    }
}
