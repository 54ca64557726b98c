use crate::domain::report::ReportDocument;
use anyhow::Context;
use std::path::Path;

pub fn save_report(path: &Path, report: &ReportDocument) -> anyhow::Result<()> {
    super::write_json_atomic(path, report)?;
    tracing::info!(source = %report.source, date = %report.date, path = %path.display(), "saved report");
    Ok(())
}

pub fn read_report(path: &Path) -> anyhow::Result<ReportDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid report document", path.display()))
}
