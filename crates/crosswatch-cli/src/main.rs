mod cli;
mod error;
mod output;
mod universe;

use std::future::Future;
use std::pin::Pin;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crosswatch_client::{
    BarsProvider, FetchPolicy, FetchWindow, MarketDataClient, ProviderError, RawBar,
    ReqwestHttpClient, Throttle, YahooChartProvider,
};
use crosswatch_core::{Interval, MacdParams, Symbol};
use crosswatch_engine::{AcquireSettings, ChartWriter, Pipeline, SeriesAcquirer};
use crosswatch_store::{SeriesStore, StoreConfig};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let universe = universe::load_universe(&cli.universe)?;
    for (line, error) in &universe.rejected {
        tracing::warn!(%line, %error, "ignoring invalid universe entry");
    }

    // Daily and weekly series never share cache files.
    let store = SeriesStore::open(StoreConfig {
        root: cli.cache_dir.join(cli.interval.as_str()),
    })?;

    let client = build_client(&cli);
    let acquirer = SeriesAcquirer::new(
        store,
        client,
        AcquireSettings {
            interval: cli.interval,
            refresh_lookback_days: cli.lookback_days,
        },
    );
    let charts = ChartWriter::new(&cli.report_dir);
    let pipeline = Pipeline::new(acquirer, MacdParams::default(), charts);

    let summary = pipeline.run(&universe.symbols).await;

    print!("{}", output::render_summary(&summary));
    let report_path = output::write_report(&cli.report_dir, &summary, cli.pretty)?;
    tracing::info!(report = %report_path.display(), "run report written");

    // Nothing produced at all: every instrument failed.
    if !universe.symbols.is_empty() && summary.skipped.len() == universe.symbols.len() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}

fn build_client(cli: &Cli) -> MarketDataClient {
    if cli.offline {
        return MarketDataClient::new(Arc::new(OfflineProvider), FetchPolicy::single_attempt());
    }

    let provider = YahooChartProvider::new(Arc::new(ReqwestHttpClient::new()))
        .with_full_range(cli.full_range.clone());
    let policy = FetchPolicy {
        max_attempts: cli.max_attempts,
        base_delay: Duration::from_secs(cli.base_delay_secs),
        rate_limit_floor: Duration::from_secs(cli.rate_limit_floor_secs),
        ..FetchPolicy::default()
    };

    MarketDataClient::new(Arc::new(provider), policy)
        .with_throttle(Throttle::new(Duration::from_secs(60), 30))
}

/// Provider used by `--offline`: every fetch fails immediately, so the
/// acquirer falls back to cached series and cold instruments are skipped.
struct OfflineProvider;

impl BarsProvider for OfflineProvider {
    fn fetch_bars<'a>(
        &'a self,
        _symbol: &'a Symbol,
        _window: FetchWindow,
        _interval: Interval,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawBar>, ProviderError>> + Send + 'a>> {
        Box::pin(async { Err(ProviderError::Transient("offline mode".to_owned())) })
    }
}
