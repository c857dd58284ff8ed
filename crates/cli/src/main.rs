use anyhow::Context;
use clap::{Parser, Subcommand};
use profitdash_core::chart::Canvas;
use profitdash_core::dashboard::{Dashboard, DashboardState, FetchState, NotificationKind};
use profitdash_core::domain::filter::QueryFilter;
use profitdash_core::metrics::http::HttpMetricsClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "profitdash")]
struct Args {
    /// Range start (YYYY-MM-DD). Unbounded when omitted.
    #[arg(long)]
    start: Option<String>,

    /// Range end (YYYY-MM-DD). Unbounded when omitted.
    #[arg(long)]
    end: Option<String>,

    /// Market identifier. All markets when omitted.
    #[arg(long)]
    market: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch summary and forecast, then print stats, KPIs and sparklines.
    Report,
    /// List selectable markets.
    Markets,
    /// Seed demo data, then print the refreshed report.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = profitdash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let filter = QueryFilter::new(
        parse_date(args.start.as_deref())?,
        parse_date(args.end.as_deref())?,
        args.market.clone(),
    );

    let client = HttpMetricsClient::new(settings.client_config())?;
    let dashboard = Dashboard::new(Arc::new(client), filter).with_horizon_days(settings.forecast_days);

    tracing::info!(backend = %settings.backend_base_url(), "profitdash starting");

    match args.command.unwrap_or(Command::Report) {
        Command::Report => {
            dashboard.mount().await;
            let state = dashboard.snapshot();
            print_report(&state);
            exit_on_error(&state)
        }
        Command::Markets => {
            dashboard.refresh_markets().await;
            if dashboard.snapshot().markets.is_empty() {
                dashboard.notify(NotificationKind::Info, "No markets available; showing all");
            }
            let state = dashboard.snapshot();
            print_notification(&state);
            for market in &state.markets {
                println!("{market}");
            }
            Ok(())
        }
        Command::Seed => {
            dashboard.seed().await;
            let state = dashboard.snapshot();
            print_notification(&state);
            if state.summary.is_some() {
                print_report(&state);
            }
            exit_on_error(&state)
        }
    }
}

fn print_notification(state: &DashboardState) {
    if let Some(n) = &state.notification {
        println!("[{:?}] {}", n.kind, n.message);
    }
}

fn exit_on_error(state: &DashboardState) -> anyhow::Result<()> {
    if let FetchState::Error(message) = &state.phase {
        let err = anyhow::anyhow!(message.clone()).context("dashboard fetch failed");
        sentry_anyhow::capture_anyhow(&err);
        return Err(err);
    }
    Ok(())
}

fn print_report(state: &DashboardState) {
    let totals = state.totals();
    for stat in profitdash_core::present::headline_stats(&totals) {
        println!("{:<20} {}", stat.label, stat.value);
    }

    println!();
    println!("{:<20} {:<10} {:<10} {:<8} {}", "KPI", "Target", "Value", "Status", "Note");
    for k in state.kpis() {
        println!(
            "{:<20} {:<10} {:<10} {:<8} {}",
            k.label,
            k.target_text,
            k.value_text,
            format!("{:?}", k.verdict),
            k.note
        );
    }

    println!();
    for line in state.sparklines(Canvas::default()) {
        println!("{}: {}", line.title, line.polyline());
    }

    println!();
    let forecast = profitdash_core::present::forecast_headline(state.forecast.as_ref());
    println!("MRR Forecast  {}: {}", forecast[0].label, forecast[0].value);
    println!("              {}: {}", forecast[1].label, forecast[1].value);

    if let Some(at) = state.last_updated {
        println!("Last updated {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

fn parse_date(arg: Option<&str>) -> anyhow::Result<Option<chrono::NaiveDate>> {
    arg.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid date (expected YYYY-MM-DD): {s}"))
        })
        .transpose()
}

fn init_sentry(settings: &profitdash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_optional_dates() {
        assert_eq!(parse_date(None).unwrap(), None);
        assert_eq!(parse_date(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_date(Some("2026-03-01")).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert!(parse_date(Some("03/01/2026")).is_err());
    }

    #[test]
    fn defaults_to_report() {
        let args = Args::parse_from(["profitdash", "--market", "US"]);
        assert!(args.command.is_none());
        assert_eq!(args.market.as_deref(), Some("US"));
    }
}
