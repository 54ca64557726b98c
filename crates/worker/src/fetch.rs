use marketpulse_core::config::Settings;
use marketpulse_core::domain::asset;
use marketpulse_core::ingest::provider::HistoryProvider;
use marketpulse_core::ingest::refresh::refresh_snapshots;
use marketpulse_core::ingest::yahoo::YahooChartProvider;
use marketpulse_core::storage::snapshots::{load_snapshot_store, save_snapshot_store};
use marketpulse_core::time::report_clock::{local_stamp, report_offset};

pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let offset = report_offset(settings.report_tz_offset_hours)?;
    let now = local_stamp(chrono::Utc::now(), offset);

    let catalog = asset::select(settings.market_assets.as_deref());
    let provider = YahooChartProvider::from_settings(settings)?;

    let path = settings.market_data_path();
    let existing = load_snapshot_store(&path);

    tracing::info!(
        assets = catalog.len(),
        stored = existing.len(),
        provider = provider.provider_name(),
        "refreshing market data"
    );

    let (store, summary) = refresh_snapshots(&provider, &catalog, &existing, now).await;
    save_snapshot_store(&path, &store)?;

    tracing::info!(
        updated = summary.updated,
        kept = summary.kept,
        missing = summary.missing,
        "market data refresh done"
    );
    Ok(())
}
