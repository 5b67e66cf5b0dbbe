//! Text command - find the expiry date in OCR text.

use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use tracing::debug;

use expiry_core::{ExpiryDetector, ExpiryFinder};

use super::{format_report, load_config, OutputFormat};

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Text file to read ("-" or omitted for stdin)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Check against this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

pub async fn run(args: TextArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            std::fs::read_to_string(path)?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    debug!("Read {} bytes of text", text.len());

    let today = args.today.unwrap_or_else(expiry_core::today);
    let finder = ExpiryFinder::from_config(&config.extraction);
    let report = finder.report(&text, today);

    println!("{}", format_report(&report, args.format)?);

    Ok(())
}
