use crate::domain::report::{ReportDocument, MOCK_SOURCE};
use crate::domain::snapshot::{AssetSnapshot, SnapshotStore};
use chrono::NaiveDate;

/// Highest and lowest change in store order. Ties keep the first asset, so a flat market
/// names the same asset twice.
pub fn best_and_worst(store: &SnapshotStore) -> Option<(&AssetSnapshot, &AssetSnapshot)> {
    let best = store
        .values()
        .reduce(|acc, s| if s.change_percent > acc.change_percent { s } else { acc })?;
    let worst = store
        .values()
        .reduce(|acc, s| if s.change_percent < acc.change_percent { s } else { acc })?;
    Some((best, worst))
}

/// Deterministic commentary used when no LLM is configured or the LLM call failed.
pub fn mock_report(store: &SnapshotStore, date: NaiveDate) -> ReportDocument {
    let content = match best_and_worst(store) {
        Some((best, worst)) => format!(
            "**Market Summary (Mock Generated)**\n\n\
Today's market shows mixed signals. The top performer is **{}** with a change of {}%, \
showing strong momentum. Conversely, **{}** lagged behind at {}%.\n\n\
Investors should monitor volatility in the coming days. \
(Note: configure GEMINI_API_KEY to unlock real AI analysis.)",
            best.name, best.change_percent, worst.name, worst.change_percent
        ),
        None => "**Market Summary (Mock Generated)**\n\n\
No market data is available yet. The next scheduled run will fill this in."
            .to_string(),
    };

    ReportDocument::new(date, content, MOCK_SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(name: &str, pct: f64) -> AssetSnapshot {
        AssetSnapshot {
            name: name.to_string(),
            current_price: 1.0,
            change_percent: pct,
            history: Vec::new(),
            last_updated: NaiveDate::from_ymd_opt(2026, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            currency: "USD".to_string(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn names_best_and_worst() {
        let mut store = SnapshotStore::new();
        store.insert("a".into(), snap("Alpha", 0.5));
        store.insert("b".into(), snap("Beta", -2.25));
        store.insert("c".into(), snap("Gamma", 4.0));

        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let report = mock_report(&store, date);
        assert_eq!(report.source, MOCK_SOURCE);
        assert_eq!(report.date, date);
        assert!(report.content.contains("top performer is **Gamma** with a change of 4%"));
        assert!(report.content.contains("**Beta** lagged behind at -2.25%"));
    }

    #[test]
    fn single_asset_is_both_best_and_worst() {
        let mut store = SnapshotStore::new();
        store.insert("a".into(), snap("Solo", 1.0));
        let (best, worst) = best_and_worst(&store).unwrap();
        assert_eq!(best.name, "Solo");
        assert_eq!(worst.name, "Solo");
    }

    #[test]
    fn ties_pick_the_first_asset() {
        let mut store = SnapshotStore::new();
        store.insert("a".into(), snap("Alpha", 5.0));
        store.insert("b".into(), snap("Beta", 5.0));
        store.insert("c".into(), snap("Gamma", 5.0));

        let (best, worst) = best_and_worst(&store).unwrap();
        assert_eq!(best.name, "Alpha");
        assert_eq!(worst.name, "Alpha");
    }

    #[test]
    fn empty_store_still_produces_a_report() {
        let report = mock_report(&SnapshotStore::new(), NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert!(report.content.contains("No market data"));
        assert_eq!(report.source, MOCK_SOURCE);
    }
}
