use crate::domain::filter::QueryFilter;
use crate::domain::summary::{DailySummary, ForecastResult};
use std::time::Duration;

pub mod error;
pub mod http;

pub use error::{FailureKind, MetricsError};

pub const DEFAULT_FORECAST_DAYS: u32 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub type MetricsResult<T> = Result<T, MetricsError>;

/// Stateless access to the metrics backend. Implementations never retry.
#[async_trait::async_trait]
pub trait MetricsClient: Send + Sync {
    async fn fetch_summary(&self, filter: &QueryFilter) -> MetricsResult<DailySummary>;

    async fn fetch_forecast(
        &self,
        filter: &QueryFilter,
        horizon_days: u32,
    ) -> MetricsResult<ForecastResult>;

    /// Advisory list; implementations return an empty list instead of failing.
    async fn fetch_markets(&self) -> Vec<String>;

    async fn seed_demo_data(&self) -> MetricsResult<()>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
