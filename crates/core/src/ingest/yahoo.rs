use crate::config::{non_empty_var, Settings};
use crate::domain::asset::AssetSpec;
use crate::ingest::provider::HistoryProvider;
use crate::ingest::types::DailyBar;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_RANGE: &str = "5y";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 1;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    http: reqwest::Client,
    base_url: String,
    range: String,
    retries: u32,
}

impl YahooChartProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .market_data_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let range =
            non_empty_var("MARKET_DATA_RANGE").unwrap_or_else(|| DEFAULT_RANGE.to_string());

        let timeout_secs = non_empty_var("MARKET_DATA_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = attempts_from(non_empty_var("MARKET_DATA_RETRIES").as_deref());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url,
            range,
            retries,
        })
    }

    fn url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            encode_symbol(symbol)
        )
    }

    async fn fetch_once(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let res = self
            .http
            .get(self.url(symbol))
            .query(&[("range", self.range.as_str()), ("interval", "1d")])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<ChartResponse>(&text)
            .with_context(|| format!("market data response is not a chart document: {text}"))?;
        parse_chart(parsed)
    }
}

#[async_trait::async_trait]
impl HistoryProvider for YahooChartProvider {
    fn provider_name(&self) -> &'static str {
        "Yahoo Finance"
    }

    async fn fetch_daily_history(&self, asset: &AssetSpec) -> Result<Vec<DailyBar>> {
        with_retries(self.retries, asset.id, move || self.fetch_once(asset.id)).await
    }
}

/// Total attempts per asset. Unset or unparsable means a single attempt; `0` is clamped
/// to one.
fn attempts_from(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_RETRIES)
        .max(1)
}

/// Runs `op` up to `attempts` times, sleeping 1s, 2s, 4s, ... between failures. Returns the
/// last error once attempts run out.
async fn with_retries<T, F, Fut>(attempts: u32, ticker: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(v) => return Ok(v),
            Err(err) => {
                if attempt >= attempts {
                    return Err(err);
                }
                let backoff = Duration::from_secs(1u64 << (attempt - 1).min(16));
                tracing::warn!(
                    attempt,
                    ?backoff,
                    ticker,
                    error = %err,
                    "market data fetch failed; retrying"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

// Index symbols start with '^', which Yahoo expects percent-encoded in the path.
fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E").replace('=', "%3D")
}

fn parse_chart(res: ChartResponse) -> Result<Vec<DailyBar>> {
    if let Some(err) = res.chart.error {
        anyhow::bail!("market data error: {} - {}", err.code, err.description);
    }

    let result = res
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .context("market data response has no result")?;

    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    let mut out = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        if !close.is_finite() {
            continue;
        }
        let date = exchange_date(*ts, offset)
            .with_context(|| format!("invalid bar timestamp {ts}"))?;
        out.push(DailyBar::new(date, close));
    }
    Ok(out)
}

// Bars are stamped at the session open in UTC; shift into exchange time before taking the
// calendar date so Asian sessions don't land on the previous day.
fn exchange_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(ts + gmtoffset, 0).map(|dt| dt.date_naive())
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Option<Vec<Option<f64>>>,
}
