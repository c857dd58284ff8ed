//! Long-lived dashboard controller.
//!
//! `DashboardState` holds every transition. `Dashboard` drives it against a `MetricsClient`,
//! taking the state lock only between suspension points so new operator input is accepted
//! while a fetch is in flight.

use crate::domain::filter::QueryFilter;
use crate::metrics::MetricsClient;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, PoisonError};

pub mod state;

pub use state::{
    DashboardState, FetchState, FetchTicket, Notification, NotificationKind, NOTIFICATION_TTL,
};

#[derive(Clone)]
pub struct Dashboard {
    client: Arc<dyn MetricsClient>,
    state: Arc<Mutex<DashboardState>>,
}

impl Dashboard {
    pub fn new(client: Arc<dyn MetricsClient>, filter: QueryFilter) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(DashboardState::new(filter))),
        }
    }

    pub fn with_horizon_days(self, horizon_days: u32) -> Self {
        self.with_state(|s| s.horizon_days = horizon_days);
        self
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn snapshot(&self) -> DashboardState {
        self.with_state(|s| s.clone())
    }

    /// Initial load: data and the market list, independently.
    pub async fn mount(&self) {
        tokio::join!(self.refresh(), self.refresh_markets());
    }

    /// Summary, then the dependent forecast. Results from a superseded run are dropped.
    pub async fn refresh(&self) {
        let (ticket, horizon_days) = self.with_state(|s| (s.begin_fetch(), s.horizon_days));
        tracing::debug!(seq = ticket.seq, filter = ?ticket.filter, "fetch started");

        let summary = self.client.fetch_summary(&ticket.filter).await;
        if !self.with_state(|s| s.apply_summary(&ticket, summary)) {
            return;
        }

        let forecast = self
            .client
            .fetch_forecast(&ticket.filter, horizon_days)
            .await;
        self.with_state(|s| s.apply_forecast(&ticket, forecast, chrono::Utc::now()));
    }

    pub async fn refresh_markets(&self) {
        let markets = self.client.fetch_markets().await;
        self.with_state(|s| s.set_markets(markets));
    }

    /// Market changes apply immediately.
    pub async fn set_market(&self, market: Option<String>) {
        if self.with_state(|s| s.set_market(market)) {
            self.refresh().await;
        }
    }

    /// The "Apply" action for a date range.
    pub async fn apply_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.with_state(|s| s.set_range(start, end));
        self.refresh().await;
    }

    pub async fn seed(&self) {
        let ticket = self.with_state(DashboardState::begin_seed);
        let result = self.client.seed_demo_data().await;
        let succeeded = result.is_ok();

        let id = self.with_state(|s| s.finish_seed(ticket, result));
        self.schedule_expiry(id);

        if succeeded {
            tracing::info!("demo data seeded; reloading");
            tokio::join!(self.refresh(), self.refresh_markets());
        }
    }

    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        let id = self.with_state(|s| s.notify(kind, message));
        self.schedule_expiry(id);
    }

    fn schedule_expiry(&self, id: u64) {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_TTL).await;
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .expire_notification(id);
        });
    }
}
