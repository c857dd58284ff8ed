//! Derived KPIs and their pass/fail verdicts against fixed business targets.

use crate::domain::summary::Totals;
use serde::Serialize;

pub const AOV_TARGET: f64 = 70.0;
pub const GROSS_MARGIN_TARGET: f64 = 80.0;
pub const CHURN_TARGET: f64 = 70.0;
pub const PROCESSING_FEES_TARGET: f64 = 5.0;
pub const CPA_TARGET: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Pass,
    Fail,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiResult {
    pub label: &'static str,
    pub target_text: String,
    pub value_text: String,
    pub verdict: Verdict,
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    AtLeast,
    AtMost,
}

#[derive(Debug, Clone, Copy)]
enum Unit {
    Dollars,
    Percent,
}

struct KpiDef {
    label: &'static str,
    target: f64,
    direction: Direction,
    unit: Unit,
    note: &'static str,
    /// `None` when no data source exists for this KPI.
    compute: Option<fn(&Totals) -> f64>,
}

const KPIS: [KpiDef; 5] = [
    KpiDef {
        label: "AOV",
        target: AOV_TARGET,
        direction: Direction::AtLeast,
        unit: Unit::Dollars,
        note: "revenue / orders",
        compute: Some(aov),
    },
    KpiDef {
        label: "Gross Margin %",
        target: GROSS_MARGIN_TARGET,
        direction: Direction::AtLeast,
        unit: Unit::Percent,
        note: "(revenue - COGS) / revenue",
        compute: Some(gross_margin_pct),
    },
    KpiDef {
        label: "Churn Rate %",
        target: CHURN_TARGET,
        direction: Direction::AtMost,
        unit: Unit::Percent,
        note: "no subscription-event feed yet",
        compute: None,
    },
    KpiDef {
        label: "Processing Fees %",
        target: PROCESSING_FEES_TARGET,
        direction: Direction::AtMost,
        unit: Unit::Percent,
        note: "processing fees / revenue",
        compute: Some(processing_fees_pct),
    },
    KpiDef {
        label: "CPA",
        target: CPA_TARGET,
        direction: Direction::AtMost,
        unit: Unit::Dollars,
        note: "ad spend / orders",
        compute: Some(cpa),
    },
];

/// Division where a zero denominator yields zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn aov(t: &Totals) -> f64 {
    ratio(t.revenue, t.orders)
}

pub fn gross_margin_pct(t: &Totals) -> f64 {
    ratio(t.revenue - t.cogs, t.revenue) * 100.0
}

pub fn processing_fees_pct(t: &Totals) -> f64 {
    ratio(t.processing_fees, t.revenue) * 100.0
}

pub fn cpa(t: &Totals) -> f64 {
    ratio(t.ad_spend, t.orders)
}

fn format_value(unit: Unit, value: f64) -> String {
    match unit {
        Unit::Dollars => format!("${value:.2}"),
        Unit::Percent => format!("{value:.1}%"),
    }
}

fn format_target(direction: Direction, unit: Unit, target: f64) -> String {
    let op = match direction {
        Direction::AtLeast => ">=",
        Direction::AtMost => "<=",
    };
    match unit {
        Unit::Dollars => format!("{op} ${target:.0}"),
        Unit::Percent => format!("{op} {target:.0}%"),
    }
}

/// Evaluates every KPI in display order. While `loading`, all verdicts are `Pending`.
pub fn evaluate(totals: &Totals, loading: bool) -> Vec<KpiResult> {
    KPIS.iter()
        .map(|def| {
            let target_text = format_target(def.direction, def.unit, def.target);
            let Some(compute) = def.compute else {
                return KpiResult {
                    label: def.label,
                    target_text,
                    value_text: "n/a".to_string(),
                    verdict: Verdict::Pending,
                    note: def.note,
                };
            };

            if loading {
                return KpiResult {
                    label: def.label,
                    target_text,
                    value_text: "...".to_string(),
                    verdict: Verdict::Pending,
                    note: def.note,
                };
            }

            let value = compute(totals);
            let passed = match def.direction {
                Direction::AtLeast => value >= def.target,
                Direction::AtMost => value <= def.target,
            };

            KpiResult {
                label: def.label,
                target_text,
                value_text: format_value(def.unit, value),
                verdict: if passed { Verdict::Pass } else { Verdict::Fail },
                note: def.note,
            }
        })
        .collect()
}
