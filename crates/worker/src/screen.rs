use marketpulse_core::config::Settings;
use marketpulse_core::screen::generate_quant_report;
use marketpulse_core::screen::spot::EastMoneySpotProvider;
use marketpulse_core::storage::reports::save_report;
use marketpulse_core::storage::snapshots::read_snapshot_store;
use marketpulse_core::time::report_clock::{report_offset, resolve_report_date};

pub async fn run(settings: &Settings, date_arg: Option<&str>) -> anyhow::Result<()> {
    let offset = report_offset(settings.report_tz_offset_hours)?;
    let date = resolve_report_date(date_arg, chrono::Utc::now(), offset)?;

    let spot = EastMoneySpotProvider::from_settings(settings)?;

    // Stored history only feeds the breadth and DCA sections.
    let store = match read_snapshot_store(&settings.market_data_path()) {
        Ok(store) => store,
        Err(err) => {
            tracing::warn!(error = %err, "market data unreadable; screening without it");
            None
        }
    };

    let report = generate_quant_report(&spot, store.as_ref(), date).await;

    save_report(&settings.report_path(), &report)?;
    tracing::info!(%date, source = %report.source, "screening report written");
    Ok(())
}
