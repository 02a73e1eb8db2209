use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Result;

use crate::domain::BalanceReport;

/// How a balance report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Brace-delimited block, one `"payer": points` line per payer
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "unknown format '{}'. Valid formats: text, json, csv",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render balances as the brace-delimited text block.
pub fn render_text(report: &BalanceReport) -> String {
    let mut out = String::from("{\n");
    for (payer, points) in report.iter() {
        out.push_str(&format!("     \"{}\": {}\n", payer, points));
    }
    out.push('}');
    out
}

/// Write balances in the requested format. Returns the number of payers written.
pub fn write_report<W: Write>(
    report: &BalanceReport,
    format: OutputFormat,
    mut writer: W,
) -> Result<usize> {
    match format {
        OutputFormat::Text => {
            writeln!(writer, "{}", render_text(report))?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)?;
            writeln!(writer, "{}", json)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut writer);
            csv_writer.write_record(["payer", "points"])?;
            for (payer, points) in report.iter() {
                csv_writer.write_record([payer, points.to_string().as_str()])?;
            }
            csv_writer.flush()?;
        }
    }
    writer.flush()?;
    Ok(report.len())
}
