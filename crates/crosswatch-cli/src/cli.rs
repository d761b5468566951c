//! CLI argument definitions for crosswatch.
//!
//! One invocation performs one scan of the universe; daily or weekly
//! cadence is left to an external scheduler (cron, CI, launchd).
//!
//! # Examples
//!
//! ```bash
//! # Daily scan over a universe file
//! crosswatch --universe tickers.txt
//!
//! # Weekly bars, custom directories
//! crosswatch --universe tickers.txt --interval 1wk --cache-dir /var/cache/crosswatch
//!
//! # Re-scan cached data without touching the provider
//! crosswatch --universe tickers.txt --offline
//! ```

use std::path::PathBuf;

use clap::Parser;

use crosswatch_core::Interval;

/// Scan an instrument universe for MACD/signal-line crossovers on the
/// latest bar.
///
/// Price series are cached per symbol and refreshed incrementally; the
/// upstream provider is retried with exponential backoff and a minimum
/// wait after rate-limit signals. The run emits one chart per surfaced
/// symbol plus a JSON report, and prints a summary table.
#[derive(Debug, Parser)]
#[command(name = "crosswatch", version, about = "MACD crossover scanner")]
pub struct Cli {
    /// Newline-delimited instrument universe file. Symbols are
    /// upper-cased; blank lines are ignored.
    #[arg(long)]
    pub universe: PathBuf,

    /// Bar interval to scan (1d or 1wk).
    #[arg(long, default_value = "1d")]
    pub interval: Interval,

    /// Directory holding per-symbol cached series.
    #[arg(long, default_value = ".crosswatch/cache")]
    pub cache_dir: PathBuf,

    /// Directory receiving per-symbol charts and the JSON run report.
    #[arg(long, default_value = ".crosswatch/reports")]
    pub report_dir: PathBuf,

    /// Calendar days fetched when refreshing an already-cached series.
    #[arg(long, default_value_t = 10)]
    pub lookback_days: u32,

    /// Provider history range fetched on a cold start.
    #[arg(long, default_value = "2y")]
    pub full_range: String,

    /// Retry budget per instrument (total attempts).
    #[arg(long, default_value_t = 5)]
    pub max_attempts: u32,

    /// Base retry delay in seconds; doubles after every failed attempt.
    #[arg(long, default_value_t = 5)]
    pub base_delay_secs: u64,

    /// Minimum wait in seconds after an upstream rate-limit signal.
    #[arg(long, default_value_t = 60)]
    pub rate_limit_floor_secs: u64,

    /// Scan cached series only; never contact the provider.
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Pretty-print the JSON run report.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}
