use crate::domain::contract::{WireDailySummary, WireForecastResult};
use crate::domain::filter::QueryFilter;
use crate::domain::summary::{DailySummary, ForecastResult};
use crate::metrics::{ClientConfig, MetricsClient, MetricsError, MetricsResult};
use anyhow::Context;
use serde::de::DeserializeOwned;

const SUMMARY_PATH: &str = "/api/daily-summary";
const FORECAST_PATH: &str = "/api/mrr-forecast";
const MARKETS_PATH: &str = "/api/markets";
const SEED_PATH: &str = "/api/seed-demo";

#[derive(Debug, Clone)]
pub struct HttpMetricsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMetricsClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build metrics http client")?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn get_json<W: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&'static str, String)],
    ) -> MetricsResult<W> {
        let res = self
            .http
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|e| log_failure(MetricsError::transport(endpoint, e.to_string())))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| log_failure(MetricsError::transport(endpoint, e.to_string())))?;

        if !status.is_success() {
            return Err(log_failure(MetricsError::response(
                endpoint,
                status.as_u16(),
                format!("HTTP {status}"),
            )));
        }

        decode_body(endpoint, &text).map_err(log_failure)
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn decode_body<W: DeserializeOwned>(endpoint: &'static str, text: &str) -> MetricsResult<W> {
    serde_json::from_str::<W>(text)
        .map_err(|e| MetricsError::decode(endpoint, format!("malformed response: {e}")))
}

fn log_failure(err: MetricsError) -> MetricsError {
    tracing::warn!(
        endpoint = err.endpoint,
        kind = ?err.kind,
        detail = %err.detail,
        "metrics request failed"
    );
    err
}

#[async_trait::async_trait]
impl MetricsClient for HttpMetricsClient {
    async fn fetch_summary(&self, filter: &QueryFilter) -> MetricsResult<DailySummary> {
        let wire: WireDailySummary = self.get_json(SUMMARY_PATH, &filter.summary_query()).await?;
        wire.validate_and_into_summary()
            .map_err(|e| log_failure(MetricsError::decode(SUMMARY_PATH, format!("{e:#}"))))
    }

    async fn fetch_forecast(
        &self,
        filter: &QueryFilter,
        horizon_days: u32,
    ) -> MetricsResult<ForecastResult> {
        let wire: WireForecastResult = self
            .get_json(FORECAST_PATH, &filter.forecast_query(horizon_days))
            .await?;
        wire.validate_and_into_forecast(horizon_days)
            .map_err(|e| log_failure(MetricsError::decode(FORECAST_PATH, format!("{e:#}"))))
    }

    async fn fetch_markets(&self) -> Vec<String> {
        self.get_json::<Vec<String>>(MARKETS_PATH, &[])
            .await
            .unwrap_or_default()
    }

    async fn seed_demo_data(&self) -> MetricsResult<()> {
        let res = self
            .http
            .post(self.url(SEED_PATH))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| log_failure(MetricsError::transport(SEED_PATH, e.to_string())))?;

        let status = res.status();
        if !status.is_success() {
            return Err(log_failure(MetricsError::response(
                SEED_PATH,
                status.as_u16(),
                format!("HTTP {status}"),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FailureKind;

    #[test]
    fn joins_base_url_and_path() {
        assert_eq!(
            join_url("http://localhost:8000/", "/api/markets"),
            "http://localhost:8000/api/markets"
        );
        assert_eq!(join_url("", "api/markets"), "/api/markets");
    }

    #[test]
    fn decodes_market_list() {
        let markets: Vec<String> = decode_body(MARKETS_PATH, r#"["US","EU"]"#).unwrap();
        assert_eq!(markets, vec!["US".to_string(), "EU".to_string()]);
    }

    #[test]
    fn malformed_body_is_a_decode_failure() {
        let err = decode_body::<WireDailySummary>(SUMMARY_PATH, "<html>oops</html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
        assert_eq!(err.endpoint, SUMMARY_PATH);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_failure() {
        // Grab a free loopback port, then close it so nothing is listening there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpMetricsClient::new(
            ClientConfig::new(format!("http://127.0.0.1:{port}"))
                .with_timeout(std::time::Duration::from_secs(2)),
        )
        .unwrap();

        let err = client.fetch_summary(&QueryFilter::default()).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::Transport);
        assert!(client.fetch_markets().await.is_empty());
    }
}
