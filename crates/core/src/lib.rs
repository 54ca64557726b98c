pub mod domain;
pub mod ingest;
pub mod llm;
pub mod report;
pub mod screen;
pub mod storage;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_DATA_DIR: &str = "data";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub data_dir: PathBuf,
        pub gemini_api_key: Option<String>,
        pub anthropic_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub market_data_base_url: Option<String>,
        pub spot_data_base_url: Option<String>,
        pub market_assets: Option<String>,
        pub report_tz_offset_hours: Option<i32>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let report_tz_offset_hours = match non_empty_var("REPORT_TZ_OFFSET_HOURS") {
                Some(s) => Some(
                    s.parse::<i32>()
                        .with_context(|| format!("REPORT_TZ_OFFSET_HOURS is not an integer: {s}"))?,
                ),
                None => None,
            };

            Ok(Self {
                data_dir: non_empty_var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
                gemini_api_key: non_empty_var("GEMINI_API_KEY"),
                anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                market_data_base_url: non_empty_var("MARKET_DATA_BASE_URL"),
                spot_data_base_url: non_empty_var("SPOT_DATA_BASE_URL"),
                market_assets: non_empty_var("MARKET_ASSETS"),
                report_tz_offset_hours,
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }

        pub fn market_data_path(&self) -> PathBuf {
            self.data_dir.join(crate::storage::MARKET_DATA_FILE)
        }

        pub fn report_path(&self) -> PathBuf {
            self.data_dir.join(crate::storage::REPORT_FILE)
        }
    }

    // CI secrets are often exported as empty strings when unset.
    pub fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn paths_live_under_data_dir() {
            let settings = Settings {
                data_dir: PathBuf::from("/tmp/pulse"),
                gemini_api_key: None,
                anthropic_api_key: None,
                sentry_dsn: None,
                market_data_base_url: None,
                spot_data_base_url: None,
                market_assets: None,
                report_tz_offset_hours: None,
            };
            assert_eq!(
                settings.market_data_path(),
                PathBuf::from("/tmp/pulse/market_data.json")
            );
            assert_eq!(settings.report_path(), PathBuf::from("/tmp/pulse/ai_report.json"));
            assert!(settings.require_gemini_api_key().is_err());
        }

        #[test]
        fn blank_variables_count_as_unset() {
            std::env::set_var("MARKETPULSE_CONFIG_TEST_BLANK", "   ");
            std::env::set_var("MARKETPULSE_CONFIG_TEST_PADDED", " gemini-2.0-flash ");
            assert_eq!(non_empty_var("MARKETPULSE_CONFIG_TEST_BLANK"), None);
            assert_eq!(
                non_empty_var("MARKETPULSE_CONFIG_TEST_PADDED").as_deref(),
                Some("gemini-2.0-flash")
            );
            assert_eq!(non_empty_var("MARKETPULSE_CONFIG_TEST_MISSING"), None);
        }
    }
}
