pub mod chart;
pub mod dashboard;
pub mod domain;
pub mod kpi;
pub mod metrics;
pub mod present;

pub mod config {
    use crate::metrics::{ClientConfig, DEFAULT_FORECAST_DAYS, DEFAULT_TIMEOUT_SECS};
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub backend_url: Option<String>,
        pub origin: String,
        pub timeout_secs: u64,
        pub forecast_days: u32,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

            let timeout_secs = match non_empty("PROFITDASH_TIMEOUT_SECS") {
                Some(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("PROFITDASH_TIMEOUT_SECS is not a number: {s}"))?,
                None => DEFAULT_TIMEOUT_SECS,
            };

            let forecast_days = match non_empty("PROFITDASH_FORECAST_DAYS") {
                Some(s) => s
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("PROFITDASH_FORECAST_DAYS is not a number: {s}"))?,
                None => DEFAULT_FORECAST_DAYS,
            };

            Ok(Self {
                backend_url: non_empty("PROFITDASH_BACKEND_URL"),
                origin: non_empty("PROFITDASH_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
                timeout_secs,
                forecast_days,
                sentry_dsn: non_empty("SENTRY_DSN"),
            })
        }

        /// The explicit backend override, falling back to same-origin.
        pub fn backend_base_url(&self) -> String {
            self.backend_url
                .as_deref()
                .unwrap_or(self.origin.as_str())
                .trim_end_matches('/')
                .to_string()
        }

        pub fn client_config(&self) -> ClientConfig {
            ClientConfig::new(self.backend_base_url())
                .with_timeout(Duration::from_secs(self.timeout_secs))
        }
    }

}
