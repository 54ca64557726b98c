use crate::domain::asset::AssetSpec;
use crate::ingest::types::DailyBar;
use anyhow::Result;

#[async_trait::async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Label stored as `source` on every snapshot this provider produced.
    fn provider_name(&self) -> &'static str;

    /// Daily closes for `asset`, as long a series as the provider offers. Order and
    /// uniqueness are not guaranteed; callers normalize.
    async fn fetch_daily_history(&self, asset: &AssetSpec) -> Result<Vec<DailyBar>>;
}
