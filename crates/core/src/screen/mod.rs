use crate::domain::report::{ReportDocument, QUANT_SOURCE};
use crate::domain::snapshot::SnapshotStore;
use crate::screen::filters::{top_gainers, ScreenFilter};
use crate::screen::spot::{Board, SpotProvider, SpotQuote};
use chrono::NaiveDate;
use std::fmt::Write as _;

pub mod dca;
pub mod filters;
pub mod spot;

const A_SHARE_TOP: usize = 5;
const HK_TOP: usize = 3;
const VALUE_TOP: usize = 5;
const UNAVAILABLE: &str = "- Data temporarily unavailable\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breadth {
    pub advancing: usize,
    pub declining: usize,
    pub unchanged: usize,
}

impl Breadth {
    pub fn sentiment(&self) -> Sentiment {
        match self.advancing.cmp(&self.declining) {
            std::cmp::Ordering::Greater => Sentiment::Bullish,
            std::cmp::Ordering::Less => Sentiment::Bearish,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

pub fn market_breadth(store: &SnapshotStore) -> Breadth {
    let mut b = Breadth {
        advancing: 0,
        declining: 0,
        unchanged: 0,
    };
    for snap in store.values() {
        if snap.change_percent > 0.0 {
            b.advancing += 1;
        } else if snap.change_percent < 0.0 {
            b.declining += 1;
        } else {
            b.unchanged += 1;
        }
    }
    b
}

/// Builds the rule-driven screening report. Each section degrades to a placeholder on its
/// own; this never fails.
pub async fn generate_quant_report(
    spot: &dyn SpotProvider,
    store: Option<&SnapshotStore>,
    date: NaiveDate,
) -> ReportDocument {
    let a_share = fetch_board(spot, Board::AShare).await;
    let hk = fetch_board(spot, Board::HkMain).await;

    let mut content = String::from("### Daily Quant Picks (rule-driven)\n\n");

    content.push_str("#### A-share top gainers (Top 5)\n");
    push_gainers(&mut content, a_share.as_deref().map(|q| top_gainers(q, A_SHARE_TOP)));

    content.push_str("\n#### HK main board top gainers (Top 3)\n");
    push_gainers(&mut content, hk.as_deref().map(|q| top_gainers(q, HK_TOP)));

    content.push_str("\n#### Large-cap value movers (market cap > 50B, 0 < P/E < 60)\n");
    let value_filter = ScreenFilter::large_cap_value();
    match a_share.as_deref() {
        Some(quotes) => {
            let picks = top_gainers(value_filter.apply(quotes), VALUE_TOP);
            if picks.is_empty() {
                content.push_str("- No stock passed the screen today\n");
            }
            for q in picks {
                let _ = writeln!(
                    content,
                    "- {} ({}): {}, P/E {}",
                    q.name,
                    q.code,
                    fmt_change(q.change_percent),
                    q.pe_ratio.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into())
                );
            }
        }
        None => content.push_str(UNAVAILABLE),
    }

    content.push_str("\n#### Market breadth\n");
    match store.filter(|s| !s.is_empty()) {
        Some(store) => {
            let b = market_breadth(store);
            let _ = writeln!(
                content,
                "Tracked assets: {} up, {} down, {} flat. Sentiment: **{}**",
                b.advancing,
                b.declining,
                b.unchanged,
                b.sentiment().as_str()
            );
        }
        None => content.push_str(UNAVAILABLE),
    }

    let _ = write!(
        content,
        "\n#### DCA backtest (last {} sessions)\n",
        dca::WINDOW_SESSIONS
    );
    match store.and_then(dca::dca_table) {
        Some(table) => {
            content.push_str(&table);
            let _ = writeln!(
                content,
                "\n*(Assumes {} invested per session, no fees.)*",
                dca::PER_SESSION_AMOUNT
            );
        }
        None => content.push_str(UNAVAILABLE),
    }

    content.push_str(
        "\n*(Generated by rule-based scripts, not AI advice. For reference only.)*",
    );

    ReportDocument::new(date, content, QUANT_SOURCE)
}

async fn fetch_board(spot: &dyn SpotProvider, board: Board) -> Option<Vec<SpotQuote>> {
    match spot.fetch_spot(board).await {
        Ok(quotes) if quotes.is_empty() => {
            tracing::warn!(board = board.label(), provider = spot.provider_name(), "spot board returned no quotes");
            None
        }
        Ok(quotes) => Some(quotes),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(
                board = board.label(),
                provider = spot.provider_name(),
                error = %err,
                "spot fetch failed"
            );
            None
        }
    }
}

fn push_gainers(content: &mut String, picks: Option<Vec<&SpotQuote>>) {
    match picks {
        Some(picks) => {
            for q in picks {
                let _ = writeln!(content, "- {} ({}): {}", q.name, q.code, fmt_change(q.change_percent));
            }
        }
        None => content.push_str(UNAVAILABLE),
    }
}

fn fmt_change(pct: Option<f64>) -> String {
    match pct {
        Some(v) => format!("{v:+.2}%"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{AssetSnapshot, PricePoint};

    struct FakeSpot {
        a_share: Option<Vec<SpotQuote>>,
        hk: Option<Vec<SpotQuote>>,
    }

    #[async_trait::async_trait]
    impl SpotProvider for FakeSpot {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_spot(&self, board: Board) -> anyhow::Result<Vec<SpotQuote>> {
            let canned = match board {
                Board::AShare => &self.a_share,
                Board::HkMain => &self.hk,
            };
            canned
                .clone()
                .ok_or_else(|| anyhow::anyhow!("upstream down"))
        }
    }

    fn quote(code: &str, pct: f64, cap: f64, pe: f64) -> SpotQuote {
        SpotQuote {
            code: code.to_string(),
            name: format!("N{code}"),
            price: Some(10.0),
            change_percent: Some(pct),
            market_cap: Some(cap),
            pe_ratio: Some(pe),
        }
    }

    fn snap(name: &str, pct: f64, history: &[f64]) -> AssetSnapshot {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        AssetSnapshot {
            name: name.to_string(),
            current_price: 100.0,
            change_percent: pct,
            history: history
                .iter()
                .enumerate()
                .map(|(i, c)| PricePoint {
                    date: start + chrono::Days::new(i as u64),
                    close: *c,
                })
                .collect(),
            last_updated: start.and_hms_opt(9, 0, 0).unwrap(),
            currency: "USD".to_string(),
            source: "test".to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
    }

    #[test]
    fn breadth_follows_majority() {
        let mut store = SnapshotStore::new();
        store.insert("a".into(), snap("A", 1.0, &[]));
        store.insert("b".into(), snap("B", 2.0, &[]));
        store.insert("c".into(), snap("C", -1.0, &[]));
        store.insert("d".into(), snap("D", 0.0, &[]));

        let b = market_breadth(&store);
        assert_eq!((b.advancing, b.declining, b.unchanged), (2, 1, 1));
        assert_eq!(b.sentiment(), Sentiment::Bullish);

        store.insert("e".into(), snap("E", -3.0, &[]));
        assert_eq!(market_breadth(&store).sentiment(), Sentiment::Neutral);
    }

    #[tokio::test]
    async fn full_report_has_every_section() {
        let spot = FakeSpot {
            a_share: Some(vec![
                quote("600001", 9.98, 6e11, 20.0),
                quote("600002", 5.0, 1e9, 15.0),
                quote("600003", 3.0, 8e11, 70.0),
            ]),
            hk: Some(vec![quote("00700", 2.5, 3e12, 18.0)]),
        };
        let mut store = SnapshotStore::new();
        store.insert("GC=F".into(), snap("Gold (COMEX)", 0.5, &[50.0, 50.0]));

        let report = generate_quant_report(&spot, Some(&store), date()).await;
        assert_eq!(report.source, QUANT_SOURCE);
        assert_eq!(report.date, date());

        let c = &report.content;
        assert!(c.contains("- N600001 (600001): +9.98%"));
        assert!(c.contains("- N00700 (00700): +2.50%"));
        assert!(c.contains("- N600001 (600001): +9.98%, P/E 20.0"));
        assert!(!c.contains("N600003 (600003): +3.00%, P/E"));
        assert!(!c.contains("N600002 (600002): +5.00%, P/E"));
        assert!(c.contains("1 up, 0 down, 0 flat. Sentiment: **Bullish**"));
        assert!(c.contains("| Gold (COMEX) | 200 | 400.00 | **100.00%** |"));
        assert!(c.ends_with("For reference only.)*"));
    }

    #[tokio::test]
    async fn failed_sections_degrade_to_placeholders() {
        let spot = FakeSpot {
            a_share: None,
            hk: Some(Vec::new()),
        };
        let report = generate_quant_report(&spot, None, date()).await;
        assert_eq!(report.content.matches(UNAVAILABLE).count(), 5);
        assert!(report.content.contains("not AI advice"));
    }
}
