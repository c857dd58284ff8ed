//! Wire shapes returned by the metrics backend.
//!
//! Every numeric field is optional on the wire; absent or `null` resolves to 0 here and
//! nowhere else. Conversion also enforces the ordering and sign invariants of the domain types.

use crate::domain::summary::{DailyPoint, DailySummary, ForecastPoint, ForecastResult, Totals};
use anyhow::{bail, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireTotals {
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub ad_spend: Option<f64>,
    #[serde(default)]
    pub cogs: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(default)]
    pub orders: Option<f64>,
    #[serde(default)]
    pub processing_fees: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDailyPoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub ad_spend: Option<f64>,
    #[serde(default)]
    pub cogs: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireDailySummary {
    #[serde(default)]
    pub totals: Option<WireTotals>,
    #[serde(default)]
    pub days: Option<Vec<WireDailyPoint>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireForecastPoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub mrr: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireForecastResult {
    #[serde(default)]
    pub today_mrr: Option<f64>,
    #[serde(default)]
    pub daily_net_new_avg: Option<f64>,
    #[serde(default)]
    pub forecast: Option<Vec<WireForecastPoint>>,
}

fn finite(name: &str, value: Option<f64>) -> anyhow::Result<f64> {
    let v = value.unwrap_or(0.0);
    ensure!(v.is_finite(), "{name} must be finite (got {v})");
    Ok(v)
}

fn non_negative(name: &str, value: Option<f64>) -> anyhow::Result<f64> {
    let v = finite(name, value)?;
    ensure!(v >= 0.0, "{name} must be non-negative (got {v})");
    Ok(v)
}

fn ensure_ascending(dates: impl Iterator<Item = NaiveDate>) -> anyhow::Result<()> {
    let mut prev: Option<NaiveDate> = None;
    for date in dates {
        if let Some(p) = prev {
            if date <= p {
                bail!("dates must be strictly increasing ({p} followed by {date})");
            }
        }
        prev = Some(date);
    }
    Ok(())
}

impl WireTotals {
    pub fn validate_and_into_totals(self) -> anyhow::Result<Totals> {
        Ok(Totals {
            revenue: non_negative("totals.revenue", self.revenue)?,
            ad_spend: non_negative("totals.ad_spend", self.ad_spend)?,
            cogs: non_negative("totals.cogs", self.cogs)?,
            // Profit is the only total allowed to go negative.
            profit: finite("totals.profit", self.profit)?,
            orders: non_negative("totals.orders", self.orders)?,
            processing_fees: non_negative("totals.processing_fees", self.processing_fees)?,
        })
    }
}

impl WireDailySummary {
    pub fn validate_and_into_summary(self) -> anyhow::Result<DailySummary> {
        let totals = self.totals.unwrap_or_default().validate_and_into_totals()?;
        let wire_days = self.days.unwrap_or_default();
        ensure_ascending(wire_days.iter().map(|d| d.date))?;

        let mut days = Vec::with_capacity(wire_days.len());
        for d in wire_days {
            days.push(DailyPoint {
                date: d.date,
                revenue: finite("days.revenue", d.revenue)?,
                ad_spend: finite("days.ad_spend", d.ad_spend)?,
                cogs: finite("days.cogs", d.cogs)?,
                profit: finite("days.profit", d.profit)?,
            });
        }

        Ok(DailySummary { totals, days })
    }
}

impl WireForecastResult {
    pub fn validate_and_into_forecast(self, horizon_days: u32) -> anyhow::Result<ForecastResult> {
        let wire_points = self.forecast.unwrap_or_default();
        ensure!(
            wire_points.len() == horizon_days as usize,
            "forecast must contain exactly {horizon_days} points (got {})",
            wire_points.len()
        );
        ensure_ascending(wire_points.iter().map(|p| p.date))?;

        let mut forecast = Vec::with_capacity(wire_points.len());
        for p in wire_points {
            forecast.push(ForecastPoint {
                date: p.date,
                mrr: finite("forecast.mrr", p.mrr)?,
            });
        }

        Ok(ForecastResult {
            today_mrr: finite("today_mrr", self.today_mrr)?,
            daily_net_new_avg: finite("daily_net_new_avg", self.daily_net_new_avg)?,
            forecast,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_fields_default_to_zero() {
        let v = json!({
            "totals": {"revenue": 120.5, "orders": null},
            "days": [
                {"date": "2026-01-01", "revenue": 60.0},
                {"date": "2026-01-02", "revenue": 60.5, "profit": -3.0}
            ]
        });

        let wire: WireDailySummary = serde_json::from_value(v).unwrap();
        let summary = wire.validate_and_into_summary().unwrap();
        assert_eq!(summary.totals.revenue, 120.5);
        assert_eq!(summary.totals.orders, 0.0);
        assert_eq!(summary.totals.cogs, 0.0);
        assert_eq!(summary.days.len(), 2);
        assert_eq!(summary.days[0].profit, 0.0);
        assert_eq!(summary.days[1].profit, -3.0);
    }

    #[test]
    fn empty_object_is_an_empty_summary() {
        let wire: WireDailySummary = serde_json::from_value(json!({})).unwrap();
        let summary = wire.validate_and_into_summary().unwrap();
        assert_eq!(summary, DailySummary::default());
    }

    #[test]
    fn negative_profit_is_allowed_but_negative_revenue_is_not() {
        let ok: WireDailySummary =
            serde_json::from_value(json!({"totals": {"profit": -50.0}})).unwrap();
        assert_eq!(ok.validate_and_into_summary().unwrap().totals.profit, -50.0);

        let bad: WireDailySummary =
            serde_json::from_value(json!({"totals": {"revenue": -1.0}})).unwrap();
        assert!(bad.validate_and_into_summary().is_err());
    }

    #[test]
    fn rejects_out_of_order_days() {
        let wire: WireDailySummary = serde_json::from_value(json!({
            "days": [
                {"date": "2026-01-02"},
                {"date": "2026-01-01"}
            ]
        }))
        .unwrap();
        assert!(wire.validate_and_into_summary().is_err());
    }

    fn forecast_points(n: usize) -> Vec<serde_json::Value> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                json!({
                    "date": start + chrono::Duration::days(i as i64),
                    "mrr": 100.0 + i as f64,
                })
            })
            .collect()
    }

    #[test]
    fn accepts_forecast_matching_horizon() {
        let wire: WireForecastResult = serde_json::from_value(json!({
            "today_mrr": 100.0,
            "daily_net_new_avg": 1.0,
            "forecast": forecast_points(60),
        }))
        .unwrap();
        let forecast = wire.validate_and_into_forecast(60).unwrap();
        assert_eq!(forecast.forecast.len(), 60);
        assert_eq!(forecast.forecast[59].mrr, 159.0);
    }

    #[test]
    fn rejects_forecast_shorter_than_horizon() {
        let wire: WireForecastResult = serde_json::from_value(json!({
            "today_mrr": 100.0,
            "forecast": forecast_points(2),
        }))
        .unwrap();
        assert!(wire.validate_and_into_forecast(60).is_err());
    }

    #[test]
    fn rejects_duplicate_forecast_dates() {
        let wire: WireForecastResult = serde_json::from_value(json!({
            "today_mrr": 10.0,
            "forecast": [
                {"date": "2026-01-01", "mrr": 10.0},
                {"date": "2026-01-01", "mrr": 11.0}
            ]
        }))
        .unwrap();
        assert!(wire.validate_and_into_forecast(2).is_err());
    }

    #[test]
    fn rejects_malformed_dates_via_deserialize() {
        let res = serde_json::from_value::<WireDailySummary>(json!({
            "days": [{"date": "not-a-date"}]
        }));
        assert!(res.is_err());
    }
}
