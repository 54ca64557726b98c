#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    /// Key in the snapshot store; also the chart symbol at the history provider.
    pub id: &'static str,
    pub name: &'static str,
    pub currency: &'static str,
}

pub const CATALOG: &[AssetSpec] = &[
    AssetSpec {
        id: "^GSPC",
        name: "S&P 500 (SPX)",
        currency: "USD",
    },
    AssetSpec {
        id: "^IXIC",
        name: "Nasdaq Composite (IXIC)",
        currency: "USD",
    },
    AssetSpec {
        id: "000001.SS",
        name: "SSE Composite (000001)",
        currency: "CNY",
    },
    AssetSpec {
        id: "000300.SS",
        name: "CSI 300 (000300)",
        currency: "CNY",
    },
    AssetSpec {
        id: "^HSI",
        name: "Hang Seng Index (HSI)",
        currency: "HKD",
    },
    AssetSpec {
        id: "GC=F",
        name: "Gold (COMEX)",
        currency: "USD",
    },
    AssetSpec {
        id: "BTC-USD",
        name: "Bitcoin (BTC)",
        currency: "USD",
    },
];

pub fn find(id: &str) -> Option<&'static AssetSpec> {
    CATALOG.iter().find(|a| a.id == id)
}

/// Restricts the catalog to a comma-separated list of ids (`MARKET_ASSETS`).
/// Unknown ids are ignored; an empty or fully unknown list yields the whole catalog.
pub fn select(filter: Option<&str>) -> Vec<&'static AssetSpec> {
    let Some(filter) = filter else {
        return CATALOG.iter().collect();
    };

    let mut out = Vec::new();
    for part in filter.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match find(part) {
            Some(spec) if !out.contains(&spec) => out.push(spec),
            Some(_) => {}
            None => tracing::warn!(asset = part, "unknown asset id in MARKET_ASSETS; ignoring"),
        }
    }

    if out.is_empty() {
        return CATALOG.iter().collect();
    }
    out
}
