use crate::domain::asset::AssetSpec;
use crate::domain::snapshot::{AssetSnapshot, SnapshotStore};
use crate::ingest::merge::{self, HISTORY_SLACK};
use crate::ingest::provider::HistoryProvider;
use anyhow::Result;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    /// Assets whose previous record was carried over after an empty or failed fetch.
    pub kept: usize,
    /// Assets with neither fresh data nor a previous record.
    pub missing: usize,
}

/// Fetches every asset in `catalog` and merges it with `existing`.
///
/// Each asset is fetched and merged on its own; a failure for one asset is logged, keeps
/// that asset's stored record and never stops the others. Records for assets that are not
/// in the catalog are not carried over.
pub async fn refresh_snapshots(
    provider: &dyn HistoryProvider,
    catalog: &[&AssetSpec],
    existing: &SnapshotStore,
    now: NaiveDateTime,
) -> (SnapshotStore, RefreshSummary) {
    let mut out = SnapshotStore::new();
    let mut summary = RefreshSummary::default();

    for asset in catalog {
        let previous = existing.get(asset.id);
        tracing::info!(ticker = asset.id, name = asset.name, "fetching history");

        let refreshed = match provider.fetch_daily_history(asset).await {
            Ok(bars) if bars.is_empty() => {
                tracing::warn!(ticker = asset.id, "provider returned no rows; keeping stored data");
                None
            }
            Ok(bars) => match build_snapshot(provider.provider_name(), asset, bars, previous, now) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    sentry_anyhow::capture_anyhow(&err);
                    tracing::error!(ticker = asset.id, error = %err, "failed to build snapshot; keeping stored data");
                    None
                }
            },
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(ticker = asset.id, error = %err, "history fetch failed; keeping stored data");
                None
            }
        };

        match (refreshed, previous) {
            (Some(snapshot), _) => {
                tracing::info!(
                    ticker = asset.id,
                    price = snapshot.current_price,
                    change_percent = snapshot.change_percent,
                    history_len = snapshot.history.len(),
                    "updated asset"
                );
                out.insert(asset.id.to_string(), snapshot);
                summary.updated += 1;
            }
            (None, Some(prev)) => {
                out.insert(asset.id.to_string(), prev.clone());
                summary.kept += 1;
            }
            (None, None) => summary.missing += 1,
        }
    }

    (out, summary)
}

fn build_snapshot(
    source: &str,
    asset: &AssetSpec,
    bars: Vec<crate::ingest::types::DailyBar>,
    previous: Option<&AssetSnapshot>,
    now: NaiveDateTime,
) -> Result<AssetSnapshot> {
    let bars = merge::normalize_bars(bars);
    let quote = merge::latest_quote(&bars)?;
    let fetched = merge::to_history(&bars);

    let history = match previous {
        Some(prev) => {
            if prev.history.len() > fetched.len() + HISTORY_SLACK {
                tracing::info!(
                    ticker = asset.id,
                    fetched = fetched.len(),
                    stored = prev.history.len(),
                    "provider returned less history than stored; appending newer points only"
                );
            }
            merge::merge_history(&prev.history, fetched)
        }
        None => fetched,
    };

    Ok(AssetSnapshot {
        name: asset.name.to_string(),
        current_price: merge::round2(quote.current_price),
        change_percent: merge::round2(quote.change_percent),
        history,
        last_updated: now,
        currency: asset.currency.to_string(),
        source: source.to_string(),
    })
}
