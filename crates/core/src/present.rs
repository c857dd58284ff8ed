use crate::domain::summary::{ForecastResult, Totals};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

pub fn money(value: f64) -> String {
    let cents = (value * 100.0).round();
    if cents < 0.0 {
        format!("-${:.2}", -cents / 100.0)
    } else {
        format!("${:.2}", cents.abs() / 100.0)
    }
}

/// The four range totals shown above the charts.
pub fn headline_stats(totals: &Totals) -> [Stat; 4] {
    [
        Stat {
            label: "Revenue (range)",
            value: money(totals.revenue),
        },
        Stat {
            label: "Ad Spend (range)",
            value: money(totals.ad_spend),
        },
        Stat {
            label: "COGS (range)",
            value: money(totals.cogs),
        },
        Stat {
            label: "Profit (range)",
            value: money(totals.profit),
        },
    ]
}

pub fn forecast_headline(forecast: Option<&ForecastResult>) -> [Stat; 2] {
    let (today, net_new) = forecast
        .map(|f| (f.today_mrr, f.daily_net_new_avg))
        .unwrap_or_default();
    [
        Stat {
            label: "Today",
            value: money(today),
        },
        Stat {
            label: "Avg Daily Net New",
            value: money(net_new),
        },
    ]
}
