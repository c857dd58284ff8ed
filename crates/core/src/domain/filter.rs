use chrono::NaiveDate;

/// Operator-controlled query parameters. `None` means unbounded / all markets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub market: Option<String>,
}

impl QueryFilter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>, market: Option<String>) -> Self {
        Self {
            start,
            end,
            market: normalize_market(market),
        }
    }

    pub fn with_market(mut self, market: Option<String>) -> Self {
        self.market = normalize_market(market);
        self
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    /// Query pairs for the summary endpoint. Unset fields are omitted.
    pub fn summary_query(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(start) = self.start {
            out.push(("start", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            out.push(("end", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(market) = &self.market {
            out.push(("market", market.clone()));
        }
        out
    }

    /// Query pairs for the forecast endpoint. Only the market carries over from the filter.
    pub fn forecast_query(&self, days_ahead: u32) -> Vec<(&'static str, String)> {
        let mut out = vec![("days_ahead", days_ahead.to_string())];
        if let Some(market) = &self.market {
            out.push(("market", market.clone()));
        }
        out
    }
}

fn normalize_market(market: Option<String>) -> Option<String> {
    market
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_sends_no_params() {
        assert!(QueryFilter::default().summary_query().is_empty());
    }

    #[test]
    fn blank_market_is_treated_as_all() {
        let f = QueryFilter::default().with_market(Some("   ".to_string()));
        assert_eq!(f.market, None);
    }

    #[test]
    fn summary_query_includes_only_set_fields() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let f = QueryFilter::new(Some(start), None, Some(" US ".to_string()));
        assert_eq!(
            f.summary_query(),
            vec![("start", "2026-01-01".to_string()), ("market", "US".to_string())]
        );
    }

    #[test]
    fn forecast_query_always_has_horizon() {
        let f = QueryFilter::default();
        assert_eq!(f.forecast_query(60), vec![("days_ahead", "60".to_string())]);
    }

    #[test]
    fn detects_inverted_range() {
        let a = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(QueryFilter::new(Some(a), Some(b), None).is_inverted());
        assert!(!QueryFilter::new(Some(b), Some(a), None).is_inverted());
    }
}
