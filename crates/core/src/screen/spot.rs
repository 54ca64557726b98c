use crate::config::{non_empty_var, Settings};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://push2.eastmoney.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UNIVERSE_SIZE: usize = 200;
const CLIST_PATH: &str = "/api/qt/clist/get";

// f2 price, f3 change %, f9 dynamic P/E, f12 code, f14 name, f20 total market cap.
const FIELDS: &str = "f2,f3,f9,f12,f14,f20";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// Shanghai + Shenzhen main boards, ChiNext and STAR.
    AShare,
    HkMain,
}

impl Board {
    fn filter_spec(&self) -> &'static str {
        match self {
            Board::AShare => "m:0 t:6,m:0 t:80,m:1 t:2,m:1 t:23",
            Board::HkMain => "m:128 t:3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Board::AShare => "A-share",
            Board::HkMain => "HK main board",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotQuote {
    pub code: String,
    pub name: String,
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
}

#[async_trait::async_trait]
pub trait SpotProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Latest session quotes for `board`, biggest gainers first.
    async fn fetch_spot(&self, board: Board) -> Result<Vec<SpotQuote>>;
}

#[derive(Debug, Clone)]
pub struct EastMoneySpotProvider {
    http: reqwest::Client,
    base_url: String,
    universe_size: usize,
}

impl EastMoneySpotProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .spot_data_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = non_empty_var("SPOT_DATA_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let universe_size = non_empty_var("SCREEN_UNIVERSE_SIZE")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_UNIVERSE_SIZE);
        anyhow::ensure!(
            (1..=5000).contains(&universe_size),
            "SCREEN_UNIVERSE_SIZE must be 1..=5000 (got {universe_size})"
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build spot data http client")?;

        Ok(Self {
            http,
            base_url,
            universe_size,
        })
    }
}

#[async_trait::async_trait]
impl SpotProvider for EastMoneySpotProvider {
    fn provider_name(&self) -> &'static str {
        "East Money"
    }

    async fn fetch_spot(&self, board: Board) -> Result<Vec<SpotQuote>> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), CLIST_PATH);
        let page_size = self.universe_size.to_string();
        let params = [
            ("pn", "1"),
            ("pz", page_size.as_str()),
            ("po", "1"),
            ("np", "1"),
            ("fltt", "2"),
            ("invt", "2"),
            ("fid", "f3"),
            ("fs", board.filter_spec()),
            ("fields", FIELDS),
        ];

        let res = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .context("spot data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read spot data response")?;
        if !status.is_success() {
            anyhow::bail!("spot data HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<ClistResponse>(&text)
            .with_context(|| format!("spot data response is not a clist document: {text}"))?;
        let quotes = parse_clist(parsed);
        tracing::debug!(board = board.label(), quotes = quotes.len(), "spot quotes fetched");
        Ok(quotes)
    }
}

fn parse_clist(res: ClistResponse) -> Vec<SpotQuote> {
    let Some(data) = res.data else {
        return Vec::new();
    };

    data.diff
        .iter()
        .filter_map(|row| {
            let code = text_field(row, "f12")?;
            let name = text_field(row, "f14")?;
            Some(SpotQuote {
                code,
                name,
                price: num_field(row, "f2"),
                change_percent: num_field(row, "f3"),
                market_cap: num_field(row, "f20"),
                pe_ratio: num_field(row, "f9"),
            })
        })
        .collect()
}

fn text_field(row: &Value, key: &str) -> Option<String> {
    let s = match row.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

// Suspended or unlisted rows carry "-" instead of a number.
fn num_field(row: &Value, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

#[derive(Debug, Deserialize)]
struct ClistResponse {
    #[serde(default)]
    data: Option<ClistData>,
}

#[derive(Debug, Deserialize)]
struct ClistData {
    #[serde(default)]
    diff: Vec<Value>,
}
