//! Check command - read the expiry date from a photo.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use expiry_core::models::config::FilterVariant;
use expiry_core::{ExpiryConfig, ExpiryScanner, PureOcrEngine, RecognitionMode, ScanResult};

use super::{format_report, load_config, OutputFormat};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Input image
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Recognition mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Preprocessing filter chain
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,

    /// Check against this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print the recognized text
    #[arg(long)]
    show_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ModeArg {
    Auto,
    SingleLine,
    Sparse,
}

impl From<ModeArg> for RecognitionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => RecognitionMode::Auto,
            ModeArg::SingleLine => RecognitionMode::SingleLine,
            ModeArg::Sparse => RecognitionMode::Sparse,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum FilterArg {
    Adaptive,
    Grayscale,
    None,
}

impl From<FilterArg> for FilterVariant {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::Adaptive => FilterVariant::Adaptive,
            FilterArg::Grayscale => FilterVariant::Grayscale,
            FilterArg::None => FilterVariant::None,
        }
    }
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.model_dir {
        config.ocr.model_dir = dir.clone();
    }
    if let Some(mode) = args.mode {
        config.ocr.mode = mode.into();
    }
    if let Some(filter) = args.filter {
        config.preprocessing.variant = filter.into();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing image: {}", args.input.display());

    let image = image::open(&args.input)?;
    let today = args.today.unwrap_or_else(expiry_core::today);
    let timeout_secs = config.ocr.timeout_secs;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Running OCR...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
    let result = run_blocking(move || scan(&config, &image, today), timeout).await?;

    pb.finish_and_clear();

    if args.show_text {
        eprintln!("{}", style("Recognized text:").blue());
        eprintln!("{}", result.text);
        eprintln!();
    }

    println!("{}", format_report(&result.report, args.format)?);

    debug!(
        "Total time {:?} (OCR {}ms)",
        start.elapsed(),
        result.processing_time_ms
    );

    Ok(())
}

/// Run `job` on the blocking pool, giving up after `timeout`.
///
/// A timed-out job keeps running on its thread. The runtime must be shut down
/// with `shutdown_background` so the process does not wait for it.
pub(crate) async fn run_blocking<T, F>(job: F, timeout: Option<Duration>) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);

    match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| anyhow::anyhow!("OCR timed out after {:?}", limit))??,
        None => task.await?,
    }
}

fn scan(
    config: &ExpiryConfig,
    image: &image::DynamicImage,
    today: NaiveDate,
) -> anyhow::Result<ScanResult> {
    let engine = PureOcrEngine::from_config(&config.ocr).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load OCR models from {}: {}",
            config.ocr.model_dir.display(),
            e
        )
    })?;

    let scanner = ExpiryScanner::from_config(config, engine);
    Ok(scanner.scan(image, today)?)
}
