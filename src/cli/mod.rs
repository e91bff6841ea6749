//! CLI command definitions and handlers

mod analyze;
mod export;
mod report;
mod risk;
mod search;
mod settings;
mod simplify;

use crate::risk::Indicator;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// creditlens - credit memo analysis from the terminal
#[derive(Parser, Debug)]
#[command(name = "creditlens")]
#[command(
    version,
    about = "Analyze credit memo PDFs, render Markdown and Word reports, and score borrower risk",
    after_help = "\
Examples:
  creditlens analyze memo.pdf -o analysis.json     Send a PDF to the analysis service
  creditlens report analysis.json                  Print the Markdown credit memo
  creditlens export docx --record analysis.json    Convert to .docx via the Word service
  creditlens risk --record analysis.json --liquidity 0.8   Stress-test the borrower
  creditlens settings set riskThresholds.debtToEquity 3.0"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a PDF to the analysis service and save the analysis record
    Analyze {
        /// PDF to analyze
        pdf: PathBuf,

        /// Where to write the analysis record JSON
        #[arg(long, short = 'o', default_value = "analysis.json")]
        output: PathBuf,
    },

    /// Render a saved analysis record as a credit memo
    #[command(after_help = "\
Examples:
  creditlens report analysis.json                        Markdown to stdout
  creditlens report analysis.json -f html -o memo.doc    Word-compatible HTML
  creditlens report analysis.json --edits edits.json     Apply summary edits first")]
    Report {
        /// Analysis record JSON
        record: PathBuf,

        /// Output format: markdown (or md), html (or word)
        #[arg(long, short = 'f', default_value = "markdown", value_parser = ["markdown", "md", "html", "word"])]
        format: String,

        /// Summary edits to overlay (JSON patch)
        #[arg(long)]
        edits: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Leave out sections switched off in settings.reportPreferences
        #[arg(long)]
        respect_preferences: bool,
    },

    /// Export a credit memo file: markdown, doc (local Word HTML) or docx (remote)
    #[command(after_help = "\
Examples:
  creditlens export markdown --record analysis.json
  creditlens export doc --html edited.html
  creditlens export docx --record analysis.json --fallback-local")]
    Export {
        /// Export kind: markdown (or md), doc, docx
        #[arg(value_parser = ["markdown", "md", "doc", "docx"])]
        kind: String,

        /// Analysis record JSON (required for markdown and docx)
        #[arg(long)]
        record: Option<PathBuf>,

        /// Summary edits to overlay (JSON patch)
        #[arg(long)]
        edits: Option<PathBuf>,

        /// Edited HTML body for `doc` (default: render the record)
        #[arg(long)]
        html: Option<PathBuf>,

        /// Directory to write the file into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Override the file name
        #[arg(long)]
        filename: Option<String>,

        /// If the Word service fails, write the local .doc rendition instead
        #[arg(long)]
        fallback_local: bool,
    },

    /// Classify borrower risk, optionally with what-if adjustments
    Risk {
        /// Analysis record JSON to take the baseline from (default: built-in baseline)
        #[arg(long)]
        record: Option<PathBuf>,

        /// Simulated current ratio
        #[arg(long, allow_hyphen_values = true)]
        liquidity: Option<f64>,

        /// Simulated EBITDA margin (%)
        #[arg(long, allow_hyphen_values = true)]
        ebitda_margin: Option<f64>,

        /// Simulated debt-to-equity
        #[arg(long, allow_hyphen_values = true)]
        debt_to_equity: Option<f64>,

        /// Simulated net profit margin (%)
        #[arg(long, allow_hyphen_values = true)]
        net_profit_margin: Option<f64>,

        /// Simulated cash balance
        #[arg(long, allow_hyphen_values = true)]
        cash: Option<f64>,
    },

    /// Rewrite text in plain language (returns the input if the service fails)
    Simplify {
        /// Text to simplify
        text: String,
    },

    /// Search extracted page text (pages separated by form feeds)
    Search {
        /// Page text file, e.g. from `pdftotext memo.pdf pages.txt`
        pages: PathBuf,

        /// Text to find (at least 3 characters)
        query: String,
    },

    /// Manage analyst settings (risk thresholds, report sections, model)
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage service endpoint configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show current settings
    Show,
    /// Set one setting
    Set {
        /// Dotted key (e.g., riskThresholds.liquidityRatio, apiSettings.model)
        key: String,
        /// Value to set
        value: String,
    },
    /// Restore default settings
    Reset,
    /// Print the settings file path
    Path,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize config file with example settings
    Init,
    /// Show resolved endpoints and config paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze { pdf, output } => analyze::run(&pdf, &output),

        Commands::Report {
            record,
            format,
            edits,
            output,
            respect_preferences,
        } => report::run(
            &record,
            &format,
            edits.as_deref(),
            output.as_deref(),
            respect_preferences,
        ),

        Commands::Export {
            kind,
            record,
            edits,
            html,
            out_dir,
            filename,
            fallback_local,
        } => export::run(export::ExportArgs {
            kind: kind.parse()?,
            record,
            edits,
            html,
            out_dir,
            filename,
            fallback_local,
        }),

        Commands::Risk {
            record,
            liquidity,
            ebitda_margin,
            debt_to_equity,
            net_profit_margin,
            cash,
        } => risk::run(
            record.as_deref(),
            &[
                (Indicator::Liquidity, liquidity),
                (Indicator::EbitdaMargin, ebitda_margin),
                (Indicator::DebtToEquity, debt_to_equity),
                (Indicator::NetProfitMargin, net_profit_margin),
                (Indicator::Cash, cash),
            ],
        ),

        Commands::Simplify { text } => simplify::run(&text),

        Commands::Search { pages, query } => search::run(&pages, &query),

        Commands::Settings { action } => settings::run(action),

        Commands::Config { action } => settings::run_config_action(action),
    }
}

/// Settings store at the default location.
fn open_settings() -> Result<crate::config::SettingsStore<crate::config::JsonFileBackend>> {
    let backend = crate::config::JsonFileBackend::default_location()?;
    Ok(crate::config::SettingsStore::open(backend))
}

/// Client for the configured endpoints.
fn service_client() -> Result<crate::client::ServiceClient> {
    let config = crate::config::UserConfig::load()?;
    Ok(crate::client::ServiceClient::new(config.endpoints()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from(["creditlens", "report", "a.json", "-f", "html"]).unwrap();
        match cli.command {
            Commands::Report { format, .. } => assert_eq!(format, "html"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_parse_negative_margin() {
        let cli = Cli::try_parse_from(["creditlens", "risk", "--net-profit-margin", "-4.5"]).unwrap();
        match cli.command {
            Commands::Risk {
                net_profit_margin, ..
            } => assert_eq!(net_profit_margin, Some(-4.5)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_export_kind() {
        assert!(Cli::try_parse_from(["creditlens", "export", "pdf"]).is_err());
    }
}
