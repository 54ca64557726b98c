use crate::domain::report::ReportDocument;
use crate::domain::snapshot::SnapshotStore;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::LlmClient;
use chrono::NaiveDate;

pub mod mock;
pub mod prompt;

/// Produces the daily commentary. Any LLM failure degrades to the mock report; this never
/// fails.
pub async fn generate_report(
    llm: Option<&dyn LlmClient>,
    store: &SnapshotStore,
    date: NaiveDate,
) -> ReportDocument {
    let Some(llm) = llm else {
        tracing::warn!("no LLM credential configured; generating mock report");
        return mock::mock_report(store, date);
    };

    let provider = llm.provider();
    tracing::info!(?provider, assets = store.len(), "requesting LLM commentary");

    match llm.generate_commentary(prompt::generate_input(store, date)).await {
        Ok(content) => ReportDocument::new(date, content, provider.source_label()),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            if let Some(diag) = err.downcast_ref::<LlmDiagnosticsError>() {
                tracing::error!(
                    ?provider,
                    stage = diag.stage,
                    raw_output = diag.raw_output.as_deref().unwrap_or(""),
                    error = %err,
                    "LLM commentary failed; falling back to mock report"
                );
            } else {
                tracing::error!(?provider, error = %err, "LLM commentary failed; falling back to mock report");
            }
            mock::mock_report(store, date)
        }
    }
}
