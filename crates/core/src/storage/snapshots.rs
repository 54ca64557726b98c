use crate::domain::snapshot::SnapshotStore;
use anyhow::Context;
use std::path::Path;

/// Loads the store for an incremental refresh. A missing or unreadable file starts from an
/// empty store; the refresh rebuilds whatever it can.
pub fn load_snapshot_store(path: &Path) -> SnapshotStore {
    match read_snapshot_store(path) {
        Ok(Some(store)) => store,
        Ok(None) => SnapshotStore::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to load existing market data; starting empty");
            SnapshotStore::new()
        }
    }
}

/// Reads the store for consumers. `Ok(None)` when no file exists yet.
pub fn read_snapshot_store(path: &Path) -> anyhow::Result<Option<SnapshotStore>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let store = serde_json::from_str::<SnapshotStore>(&text)
        .with_context(|| format!("{} is not a valid market data document", path.display()))?;
    Ok(Some(store))
}

pub fn save_snapshot_store(path: &Path, store: &SnapshotStore) -> anyhow::Result<()> {
    super::write_json_atomic(path, store)?;
    tracing::info!(assets = store.len(), path = %path.display(), "saved market data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{AssetSnapshot, PricePoint};
    use chrono::NaiveDate;

    fn sample_store() -> SnapshotStore {
        let d = |day| NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
        let mut store = SnapshotStore::new();
        store.insert(
            "000300.SS".to_string(),
            AssetSnapshot {
                name: "CSI 300 (000300)".to_string(),
                current_price: 3921.07,
                change_percent: -0.42,
                history: vec![
                    PricePoint { date: d(2), close: 3937.61 },
                    PricePoint { date: d(3), close: 3921.07 },
                ],
                last_updated: d(3).and_hms_opt(16, 5, 0).unwrap(),
                currency: "CNY".to_string(),
                source: "Yahoo Finance".to_string(),
            },
        );
        store
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("market_data.json");
        let store = sample_store();

        save_snapshot_store(&path, &store).unwrap();
        let back = read_snapshot_store(&path).unwrap().unwrap();
        assert_eq!(back, store);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_reads_as_none_and_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market_data.json");
        assert!(read_snapshot_store(&path).unwrap().is_none());
        assert!(load_snapshot_store(&path).is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error_for_readers_but_empty_for_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market_data.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(read_snapshot_store(&path).is_err());
        assert!(load_snapshot_store(&path).is_empty());
    }
}
