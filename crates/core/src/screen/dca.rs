use crate::domain::snapshot::{PricePoint, SnapshotStore};
use crate::ingest::merge::round2;

pub const PER_SESSION_AMOUNT: f64 = 100.0;
pub const WINDOW_SESSIONS: usize = 30;

/// Assets shown in the DCA table, in display order.
pub const DCA_ASSETS: &[&str] = &["BTC-USD", "^GSPC", "GC=F"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcaOutcome {
    pub sessions: usize,
    pub invested: f64,
    pub current_value: f64,
    /// Percent gain over `invested`.
    pub return_rate: f64,
}

/// Buys `amount` at every close in the last `window` points and marks the position to
/// `current_price`. Non-positive closes are skipped. `None` when nothing was bought.
pub fn backtest(
    history: &[PricePoint],
    current_price: f64,
    amount: f64,
    window: usize,
) -> Option<DcaOutcome> {
    let start = history.len().saturating_sub(window);
    let mut invested = 0.0;
    let mut units = 0.0;
    let mut sessions = 0;

    for point in &history[start..] {
        if point.close > 0.0 && point.close.is_finite() {
            invested += amount;
            units += amount / point.close;
            sessions += 1;
        }
    }

    if sessions == 0 {
        return None;
    }

    let current_value = units * current_price;
    Some(DcaOutcome {
        sessions,
        invested,
        current_value,
        return_rate: (current_value - invested) / invested * 100.0,
    })
}

/// Markdown table over [`DCA_ASSETS`]. Assets missing from the store or without usable
/// history are left out; `None` when no row remains.
pub fn dca_table(store: &SnapshotStore) -> Option<String> {
    let mut rows = Vec::new();
    for id in DCA_ASSETS {
        let Some(snap) = store.get(*id) else {
            continue;
        };
        let Some(outcome) = backtest(
            &snap.history,
            snap.current_price,
            PER_SESSION_AMOUNT,
            WINDOW_SESSIONS,
        ) else {
            continue;
        };
        rows.push(format!(
            "| {} | {:.0} | {:.2} | **{:.2}%** |",
            snap.name,
            outcome.invested,
            round2(outcome.current_value),
            round2(outcome.return_rate)
        ));
    }

    if rows.is_empty() {
        return None;
    }

    let mut out = String::from("| Asset | Invested | Value now | Return |\n|---|---|---|---|\n");
    out.push_str(&rows.join("\n"));
    out.push('\n');
    Some(out)
}
