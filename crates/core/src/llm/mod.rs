use crate::config::Settings;

pub mod anthropic;
pub mod error;
pub mod gemini;
pub mod text;

#[derive(Debug, Clone)]
pub struct GenerateInput {
    pub report_date: chrono::NaiveDate,
    /// Persona and output rules.
    pub system: String,
    /// Task plus the market data it is about.
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Anthropic,
}

impl Provider {
    /// Written to the report's `source` field.
    pub fn source_label(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Anthropic => "Anthropic Claude",
        }
    }
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Markdown commentary, already stripped of wrapping code fences.
    async fn generate_commentary(&self, input: GenerateInput) -> anyhow::Result<String>;
}

/// Picks the configured LLM: Gemini when `GEMINI_API_KEY` is set, else Anthropic when
/// `ANTHROPIC_API_KEY` is set, else none (callers fall back to the local report).
pub fn client_from_settings(settings: &Settings) -> anyhow::Result<Option<Box<dyn LlmClient>>> {
    if settings.gemini_api_key.is_some() {
        return Ok(Some(Box::new(gemini::GeminiClient::from_settings(settings)?)));
    }
    if settings.anthropic_api_key.is_some() {
        return Ok(Some(Box::new(anthropic::AnthropicClient::from_settings(
            settings,
        )?)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(gemini: Option<&str>, anthropic: Option<&str>) -> Settings {
        Settings {
            data_dir: "data".into(),
            gemini_api_key: gemini.map(str::to_string),
            anthropic_api_key: anthropic.map(str::to_string),
            sentry_dsn: None,
            market_data_base_url: None,
            spot_data_base_url: None,
            market_assets: None,
            report_tz_offset_hours: None,
        }
    }

    #[test]
    fn gemini_wins_when_both_keys_are_set() {
        let client = client_from_settings(&settings(Some("g"), Some("a"))).unwrap();
        assert_eq!(client.map(|c| c.provider()), Some(Provider::Gemini));
    }

    #[test]
    fn anthropic_is_used_without_gemini_key() {
        let client = client_from_settings(&settings(None, Some("a"))).unwrap();
        assert_eq!(client.map(|c| c.provider()), Some(Provider::Anthropic));
    }

    #[test]
    fn no_keys_means_no_client() {
        assert!(client_from_settings(&settings(None, None)).unwrap().is_none());
    }
}
