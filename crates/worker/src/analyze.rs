use marketpulse_core::config::Settings;
use marketpulse_core::llm;
use marketpulse_core::report::generate_report;
use marketpulse_core::storage::reports::save_report;
use marketpulse_core::storage::snapshots::read_snapshot_store;
use marketpulse_core::time::report_clock::{report_offset, resolve_report_date};

pub async fn run(settings: &Settings, date_arg: Option<&str>) -> anyhow::Result<()> {
    let offset = report_offset(settings.report_tz_offset_hours)?;
    let date = resolve_report_date(date_arg, chrono::Utc::now(), offset)?;

    let store = match read_snapshot_store(&settings.market_data_path())? {
        Some(store) if !store.is_empty() => store,
        _ => {
            tracing::warn!(%date, "no market data found; skipping report");
            return Ok(());
        }
    };

    let client = llm::client_from_settings(settings)?;
    let report = generate_report(client.as_deref(), &store, date).await;

    save_report(&settings.report_path(), &report)?;
    tracing::info!(%date, source = %report.source, "daily report written");
    Ok(())
}
