//! CLI argument definitions for goldview.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `spot` | Combined domestic/global/FX snapshot |
//! | `history` | Aligned history for one range |
//! | `chart` | Rebased indices and SVG paths for one range |
//! | `watch` | Poll spot and report which fields moved |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--source` | `GOLDVIEW_DOMESTIC_SOURCE` | Domestic strategy override |
//! | `--timeout-ms` | `GOLDVIEW_TIMEOUT_MS` | Request timeout override |
//!
//! # Examples
//!
//! ```bash
//! goldview spot --pretty
//! goldview history --range 10y
//! goldview chart --range 1y --width 800 --height 300
//! goldview watch --interval-secs 60 --count 10 --source sidebar
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use goldview_core::DomesticSourceKind;

#[derive(Debug, Parser)]
#[command(
    name = "goldview",
    author,
    version,
    about = "Domestic and global gold prices in one view"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Domestic price strategy; overrides GOLDVIEW_DOMESTIC_SOURCE.
    #[arg(long, global = true, value_enum)]
    pub source: Option<SourceSelector>,

    /// Request timeout in milliseconds; overrides GOLDVIEW_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Scrape the domestic HTML page.
    Scrape,
    /// Read the sidebar JSON feed.
    Sidebar,
    /// Read the tabular JSON feed.
    Table,
}

impl SourceSelector {
    pub const fn kind(self) -> DomesticSourceKind {
        match self {
            Self::Scrape => DomesticSourceKind::Scrape,
            Self::Sidebar => DomesticSourceKind::Sidebar,
            Self::Table => DomesticSourceKind::Table,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the combined spot record.
    Spot,

    /// Fetch aligned gold/FX history.
    ///
    /// Ranges: 1mo, 6mo, 1y, 10y, 20y.
    History(HistoryArgs),

    /// Rebase a history range to 100 and project it into SVG paths.
    Chart(ChartArgs),

    /// Poll spot repeatedly, flagging fields that moved since the last poll.
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long, default_value = "1mo")]
    pub range: String,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[arg(long, default_value = "1mo")]
    pub range: String,

    #[arg(long, default_value_t = 640.0)]
    pub width: f64,

    #[arg(long, default_value_t = 240.0)]
    pub height: f64,

    #[arg(long, default_value_t = 12.0)]
    pub inset: f64,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Stop after this many polls; runs until interrupted when omitted.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}
