//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use pricewatch_core::types::Timeframe;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pricewatch")]
#[command(author, version, about = "Live market-price tracking and RSI trend alerts")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PRICEWATCH_CONFIG", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level, overriding `logging.level` from the config file
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track live prices: stream ingestion, indexing and the ranking API
    Tracker,
    /// Evaluate stored candles and deliver trend alerts
    Evaluator,
    /// Run the tracker and the evaluator in one process
    Run,
    /// Import a CSV candle file into the price store
    ImportCandles(ImportArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ImportArgs {
    /// Symbol the candles belong to, e.g. BTCUSDT
    #[arg(short, long)]
    pub symbol: String,

    /// Candle timeframe
    #[arg(short, long, default_value = "15m")]
    pub timeframe: Timeframe,

    /// CSV file with open time, OHLC and volume columns
    #[arg(short, long)]
    pub file: PathBuf,
}
