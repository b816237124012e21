//! Stock Analyzer CLI
//!
//! Command-line shell: one run is one analysis of a ticker against a target
//! strike. Prints a summary and the horizon table, and can write the chart
//! options and HTML table to files.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stock_analyzer::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "stock-analyzer", about = "Chip distribution and call horizons for one ticker")]
struct Args {
    /// Ticker symbol
    #[arg(short, long, default_value = "TSLA")]
    ticker: String,

    /// Target strike price
    #[arg(long, default_value_t = 530.0)]
    target: f64,

    /// JSON config file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analyze a saved market snapshot instead of fetching from Yahoo
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write ECharts options JSON here
    #[arg(long)]
    chart_out: Option<PathBuf>,

    /// Write the HTML horizon table here
    #[arg(long)]
    html_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG directives when present and valid, otherwise `info`
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn run(args: &Args) -> AnalysisResult<()> {
    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)?,
        None => AnalyzerConfig::default(),
    };

    let provider: Box<dyn MarketDataProvider> = match &args.snapshot {
        Some(path) => Box::new(SnapshotProvider::new(MarketSnapshot::load(path)?)),
        None => Box::new(YahooClient::with_timeout(Duration::from_secs(
            config.request_timeout_secs,
        ))?),
    };

    let mut analyzer = StockAnalyzer::new(provider, config);
    let analysis = analyzer.analyze(&args.ticker, args.target)?;
    let history = &analysis.history;
    let tiers = &analyzer.config().cost_tiers;

    println!("{} Analysis", analysis.ticker);
    println!("==========================\n");
    println!(
        "  Window:  {} .. {} ({} bars)",
        history.first_date().unwrap_or("-"),
        history.last_date().unwrap_or("-"),
        history.bar_count()
    );
    println!("  Current: ${:.2}", history.current_price);
    println!("  Target:  ${:.2}", analysis.target_strike);
    if let Some(peak) = history.chips.peak() {
        println!("  Peak chip bucket: ${} ({} shares)", peak.label(), peak.total_volume);
    }

    println!("\nCall horizons:");
    println!("{}", text_table(&analysis.horizons.rows, tiers));

    if let Some(path) = &args.chart_out {
        let options = chart_options(history, analysis.target_strike);
        let json = serde_json::to_string_pretty(&options)
            .map_err(|e| AnalysisError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        println!("Chart options written to {}", path.display());
    }

    if let Some(path) = &args.html_out {
        let html = format!(
            "<style>{}</style>\n{}",
            stock_analyzer::render::TABLE_CSS,
            html_table(&analysis.horizons.rows, analysis.target_strike, tiers)
        );
        fs::write(path, html)?;
        println!("Horizon table written to {}", path.display());
    }

    Ok(())
}
