use crate::chart::{Canvas, Sparkline};
use crate::domain::filter::QueryFilter;
use crate::domain::summary::{DailySummary, ForecastResult, Metric, Totals};
use crate::kpi::{self, KpiResult};
use crate::metrics::{MetricsError, DEFAULT_FORECAST_DAYS};
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// Identifies one summary+forecast run. Only the most recently issued ticket may apply results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub filter: QueryFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTicket {
    seq_at_start: u64,
    previous: FetchState,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub filter: QueryFilter,
    pub phase: FetchState,
    pub summary: Option<DailySummary>,
    pub forecast: Option<ForecastResult>,
    pub markets: Vec<String>,
    pub notification: Option<Notification>,
    pub last_updated: Option<DateTime<Utc>>,
    pub horizon_days: u32,
    latest_seq: u64,
    next_notification_id: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(QueryFilter::default())
    }
}

impl DashboardState {
    pub fn new(filter: QueryFilter) -> Self {
        Self {
            filter,
            phase: FetchState::Idle,
            summary: None,
            forecast: None,
            markets: Vec::new(),
            notification: None,
            last_updated: None,
            horizon_days: DEFAULT_FORECAST_DAYS,
            latest_seq: 0,
            next_notification_id: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchState::Loading
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.phase = FetchState::Loading;
        if self.filter.is_inverted() {
            tracing::warn!(
                start = ?self.filter.start,
                end = ?self.filter.end,
                "date range start is after end; sending as-is"
            );
        }
        FetchTicket {
            seq: self.latest_seq,
            filter: self.filter.clone(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.latest_seq
    }

    fn discard_if_stale(&self, ticket: &FetchTicket, step: &'static str) -> bool {
        if self.is_current(ticket) {
            return false;
        }
        tracing::debug!(
            seq = ticket.seq,
            latest_seq = self.latest_seq,
            step,
            "discarding superseded result"
        );
        true
    }

    /// Returns `true` when the dependent forecast fetch should be issued.
    pub fn apply_summary(
        &mut self,
        ticket: &FetchTicket,
        result: Result<DailySummary, MetricsError>,
    ) -> bool {
        if self.discard_if_stale(ticket, "summary") {
            return false;
        }
        match result {
            Ok(summary) => {
                self.summary = Some(summary);
                true
            }
            Err(err) => {
                self.phase = FetchState::Error(err.to_string());
                false
            }
        }
    }

    pub fn apply_forecast(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ForecastResult, MetricsError>,
        now: DateTime<Utc>,
    ) {
        if self.discard_if_stale(ticket, "forecast") {
            return;
        }
        match result {
            Ok(forecast) => {
                self.forecast = Some(forecast);
                self.phase = FetchState::Success;
                self.last_updated = Some(now);
            }
            Err(err) => {
                self.phase = FetchState::Error(err.to_string());
            }
        }
    }

    pub fn set_markets(&mut self, markets: Vec<String>) {
        self.markets = markets;
    }

    /// Returns `true` when the filter actually changed.
    pub fn set_market(&mut self, market: Option<String>) -> bool {
        let next = self.filter.clone().with_market(market);
        let changed = next != self.filter;
        self.filter = next;
        changed
    }

    pub fn set_range(
        &mut self,
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    ) {
        self.filter = self.filter.clone().with_range(start, end);
    }

    pub fn begin_seed(&mut self) -> SeedTicket {
        let previous = std::mem::replace(&mut self.phase, FetchState::Loading);
        SeedTicket {
            seq_at_start: self.latest_seq,
            previous,
        }
    }

    /// Seed failures never touch summary/forecast. The pre-seed phase comes back unless a fetch
    /// has started or finished in the meantime. Returns the notification id.
    pub fn finish_seed(
        &mut self,
        ticket: SeedTicket,
        result: Result<(), MetricsError>,
    ) -> u64 {
        match result {
            Ok(()) => self.notify(NotificationKind::Success, "Demo data seeded"),
            Err(err) => {
                if self.latest_seq == ticket.seq_at_start && self.is_loading() {
                    self.phase = ticket.previous;
                }
                self.notify(
                    NotificationKind::Error,
                    format!("Seeding failed: {err}"),
                )
            }
        }
    }

    /// Replaces any active notification. Returns the id the expiry timer must present.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.next_notification_id += 1;
        let id = self.next_notification_id;
        self.notification = Some(Notification {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn expire_notification(&mut self, id: u64) {
        if self.notification.as_ref().is_some_and(|n| n.id == id) {
            self.notification = None;
        }
    }

    pub fn totals(&self) -> Totals {
        self.summary.as_ref().map(|s| s.totals).unwrap_or_default()
    }

    pub fn kpis(&self) -> Vec<KpiResult> {
        kpi::evaluate(&self.totals(), self.is_loading())
    }

    /// One sparkline per daily metric, then the MRR forecast.
    pub fn sparklines(&self, canvas: Canvas) -> Vec<Sparkline> {
        let mut out: Vec<Sparkline> = Metric::ALL
            .iter()
            .map(|m| {
                let series = self
                    .summary
                    .as_ref()
                    .map(|s| s.series(*m))
                    .unwrap_or_default();
                Sparkline::new(m.title(), &series, canvas)
            })
            .collect();

        let forecast_series = self
            .forecast
            .as_ref()
            .map(ForecastResult::series)
            .unwrap_or_default();
        let title = format!("Next {} days", self.horizon_days);
        out.push(Sparkline::new(title, &forecast_series, canvas));
        out
    }
}
