use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::application::{require_full_spend, AppError, PointsService};
use crate::domain::{parse_amount, SpendOutcome};
use crate::io::{write_report, OutputFormat};

/// pointspend - spend reward points oldest-first
#[derive(Parser, Debug)]
#[command(name = "pointspend")]
#[command(about = "Spend points across a payer ledger, oldest grants first, and report what is left")]
#[command(version)]
pub struct Cli {
    /// Number of points to spend (a whole, non-negative number)
    #[arg(allow_negative_numbers = true)]
    pub points: String,

    /// Ledger CSV with payer, points and timestamp columns ("-" reads stdin)
    pub ledger: PathBuf,

    /// Output format: text, json, csv
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Fail when the ledger cannot cover the full amount
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Install the tracing subscriber. Logs go to stderr so stdout only carries the report.
    /// `RUST_LOG` takes precedence over `--verbose`.
    pub fn init_logging(&self) {
        let default_filter = if self.verbose {
            "pointspend=debug"
        } else {
            "pointspend=warn"
        };

        // Ignore the error if a subscriber is already set (e.g. in tests)
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }

    pub fn run(self) -> Result<()> {
        let stdout = std::io::stdout();
        let outcome = self.execute(stdout.lock())?;

        if outcome.is_shortfall() {
            eprintln!(
                "Warning: only {} of {} points could be spent; {} points are not covered by the ledger",
                outcome.spent, outcome.requested, outcome.shortfall
            );
        }

        Ok(())
    }

    /// Validate arguments, load the ledger, spend and write the report to `out`.
    /// The report is written even when the spend falls short; with `--strict`
    /// the shortfall is then returned as `AppError::Shortfall`.
    pub fn execute<W: Write>(&self, out: W) -> Result<SpendOutcome> {
        let format: OutputFormat = self
            .format
            .parse()
            .map_err(|e: String| anyhow::anyhow!("Invalid --format: {}", e))?;

        let amount = parse_amount(&self.points)
            .map_err(AppError::from)
            .context("Points to spend must be a whole, non-negative number")?;

        let service = PointsService::open(&self.ledger)
            .with_context(|| format!("Failed to load ledger '{}'", self.ledger.display()))?;

        let outcome = service.spend(amount)?;
        write_report(&outcome.balances, format, out).context("Failed to write report")?;

        if self.strict {
            require_full_spend(&outcome)?;
        }

        Ok(outcome)
    }
}
