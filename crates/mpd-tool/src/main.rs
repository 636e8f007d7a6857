//! mpd-tool
//!
//! Small utility around `mpd-core`:
//!
//! - `format` renders a tick count or seconds value as an XML duration
//! - `parse` reads an XML duration and reports its value in each unit
//! - `inspect` summarizes the periods and segment timelines of an MPD file

mod config;
mod inspect;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use mpd_core::{Duration, SECOND};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::config::{OutputFormat, ToolConfig};
use crate::inspect::ManifestSummary;

/// MPD manifest and XML duration utility.
#[derive(Parser, Debug)]
#[command(name = "mpd-tool", about = "Inspect MPD manifests and convert XML durations")]
struct Cli {
    /// Path to TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON regardless of the configured output format.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a duration as PnDTnHnMnS text.
    #[command(group(ArgGroup::new("value").required(true).args(["nanos", "seconds"])))]
    Format {
        /// Duration in nanoseconds.
        #[arg(long, allow_negative_numbers = true)]
        nanos: Option<i64>,

        /// Duration in (fractional) seconds.
        #[arg(long, allow_negative_numbers = true)]
        seconds: Option<f64>,
    },
    /// Parse PnDTnHnMnS text.
    Parse {
        /// Duration text, e.g. PT1H30M.
        text: String,
    },
    /// Summarize an MPD manifest.
    Inspect {
        /// Path to the .mpd file.
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = ToolConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = if cli.json {
        OutputFormat::Json
    } else {
        cfg.output
    };
    tracing::debug!(?output, command = ?cli.command, "mpd-tool starting");

    match cli.command {
        Command::Format { nanos, seconds } => {
            let d = match nanos {
                Some(n) => Duration::from_nanos(n),
                None => seconds_to_duration(
                    seconds.context("one of --nanos or --seconds is required")?,
                )?,
            };
            if d.is_negative() {
                tracing::warn!(nanos = d.as_nanos(), "negative durations are not valid MPD attributes");
            }
            match output {
                OutputFormat::Text => println!("{d}"),
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "nanos": d.as_nanos(), "text": d.to_string() })
                ),
            }
        }
        Command::Parse { text } => {
            let d: Duration = text
                .parse()
                .with_context(|| format!("invalid duration {text:?}"))?;
            match output {
                OutputFormat::Text => println!(
                    "{d}\t{} ns\t{} s\t{} min\t{} h",
                    d.as_nanos(),
                    d.seconds(),
                    d.minutes(),
                    d.hours()
                ),
                OutputFormat::Json => println!(
                    "{}",
                    json!({
                        "input": text,
                        "normalized": d.to_string(),
                        "nanos": d.as_nanos(),
                        "seconds": d.seconds(),
                        "minutes": d.minutes(),
                        "hours": d.hours(),
                    })
                ),
            }
        }
        Command::Inspect { path } => {
            let mpd = mpd_core::xml::read_file(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            let summary = ManifestSummary::from_mpd(&mpd);
            tracing::info!(
                path = %path.display(),
                periods = summary.periods.len(),
                "manifest loaded"
            );
            match output {
                OutputFormat::Text => print!("{summary}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }
    }

    Ok(())
}

/// Convert fractional seconds to the nearest tick.
fn seconds_to_duration(secs: f64) -> anyhow::Result<Duration> {
    let nanos = (secs * SECOND.as_nanos() as f64).round();
    if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
        anyhow::bail!("{secs} seconds is outside the duration range");
    }
    Ok(Duration::from_nanos(nanos as i64))
}
