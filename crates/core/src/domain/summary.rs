use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Period totals. Missing wire fields resolve to 0 in `contract`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub revenue: f64,
    pub ad_spend: f64,
    pub cogs: f64,
    pub profit: f64,
    pub orders: f64,
    pub processing_fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub ad_spend: f64,
    pub cogs: f64,
    pub profit: f64,
}

/// Totals plus per-day samples, `days` strictly ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub totals: Totals,
    pub days: Vec<DailyPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub mrr: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub today_mrr: f64,
    pub daily_net_new_avg: f64,
    pub forecast: Vec<ForecastPoint>,
}

/// One dated sample of a single series, the input to the sparkline normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Revenue,
    AdSpend,
    Cogs,
    Profit,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Revenue, Metric::AdSpend, Metric::Cogs, Metric::Profit];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Revenue => "Daily Revenue",
            Metric::AdSpend => "Daily Ad Spend",
            Metric::Cogs => "Daily COGS",
            Metric::Profit => "Daily Profit",
        }
    }

    fn value(self, day: &DailyPoint) -> f64 {
        match self {
            Metric::Revenue => day.revenue,
            Metric::AdSpend => day.ad_spend,
            Metric::Cogs => day.cogs,
            Metric::Profit => day.profit,
        }
    }
}

impl DailySummary {
    pub fn series(&self, metric: Metric) -> Vec<SeriesPoint> {
        self.days
            .iter()
            .map(|d| SeriesPoint {
                date: d.date,
                value: metric.value(d),
            })
            .collect()
    }
}

impl ForecastResult {
    pub fn series(&self) -> Vec<SeriesPoint> {
        self.forecast
            .iter()
            .map(|p| SeriesPoint {
                date: p.date,
                value: p.mrr,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, revenue: f64, profit: f64) -> DailyPoint {
        DailyPoint {
            date: NaiveDate::from_ymd_opt(2026, 1, d).unwrap(),
            revenue,
            ad_spend: 0.0,
            cogs: 0.0,
            profit,
        }
    }

    #[test]
    fn series_preserves_day_order_and_picks_metric() {
        let summary = DailySummary {
            totals: Totals::default(),
            days: vec![day(1, 10.0, -2.0), day(2, 20.0, 5.0)],
        };

        let profit = summary.series(Metric::Profit);
        assert_eq!(profit.len(), 2);
        assert_eq!(profit[0].value, -2.0);
        assert_eq!(profit[1].value, 5.0);
        assert!(profit[0].date < profit[1].date);
    }
}
