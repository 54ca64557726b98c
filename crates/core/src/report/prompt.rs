use crate::domain::snapshot::SnapshotStore;
use crate::llm::GenerateInput;
use chrono::NaiveDate;

pub const SYSTEM_PROMPT: &str = "You are a senior financial analyst writing a daily \
market note for a personal dashboard. Be factual, concise and avoid investment advice \
disclaimers beyond one short sentence.";

/// One line per asset: `- {name}: Price {price} {currency}, Change {pct}%`.
pub fn data_summary(store: &SnapshotStore) -> String {
    let mut out = String::new();
    for snap in store.values() {
        out.push_str(&format!(
            "- {}: Price {} {}, Change {}%\n",
            snap.name, snap.current_price, snap.currency, snap.change_percent
        ));
    }
    out
}

pub fn build_prompt(store: &SnapshotStore) -> String {
    format!(
        "Based on the following daily market data, provide a concise market summary and \
investment outlook.\n\n\
Market Data:\n{}\n\
Requirements:\n\
1. Keep it under 150 words.\n\
2. Highlight the best and worst performers.\n\
3. Provide a brief sentiment analysis (Bullish/Bearish/Neutral).\n\
4. Output format: plain text or simple Markdown (no complex headers).",
        data_summary(store)
    )
}

pub fn generate_input(store: &SnapshotStore, report_date: NaiveDate) -> GenerateInput {
    GenerateInput {
        report_date,
        system: SYSTEM_PROMPT.to_string(),
        prompt: build_prompt(store),
    }
}
