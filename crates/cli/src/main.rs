// courtsync - reconcile federal court locations against government data

mod exit_codes;
mod fetch;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "courtsync")]
#[command(about = "Reconcile federal court locations against the government court locator")]
#[command(version)]
struct Cli {
    /// Only log warnings and errors (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile, write the audit files and optionally apply the updates
    #[command(after_help = "\
Examples:
  courtsync run courts.courtsync.toml
  courtsync run courts.courtsync.toml --strict
  courtsync run courts.courtsync.toml --apply
  courtsync run courts.courtsync.toml --json --out /tmp/audit")]
    Run {
        /// Path to the .courtsync.toml config file
        config: PathBuf,

        /// Write audit files here instead of the configured output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Apply the update plan to the federal database
        #[arg(long)]
        apply: bool,

        /// Exit 5 when any record has a mismatch or needs manual review
        #[arg(long)]
        strict: bool,

        /// Print the summary as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a config and check that its sources exist
    #[command(after_help = "\
Examples:
  courtsync validate courts.courtsync.toml")]
    Validate {
        /// Path to the .courtsync.toml config file
        config: PathBuf,
    },

    /// Apply a previously written update plan to the federal database
    #[command(after_help = "\
Examples:
  courtsync apply courts.courtsync.toml --plan out/2024-03-07/update_plan.json")]
    Apply {
        /// Path to the .courtsync.toml config file (names the database)
        config: PathBuf,

        /// update_plan.json written by `courtsync run`
        #[arg(long)]
        plan: PathBuf,
    },

    /// Download the government location list
    #[command(after_help = "\
Examples:
  courtsync fetch --url https://locator.example.gov/api/search --out data/
  COURTSYNC_GOV_URL=https://locator.example.gov/api/search courtsync fetch --no-xlsx")]
    Fetch {
        /// Location search endpoint
        #[arg(long, env = "COURTSYNC_GOV_URL")]
        url: String,

        /// Directory for locations_data.json and Gov_location_data.xlsx
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Skip the Excel copy of the location list
        #[arg(long)]
        no_xlsx: bool,
    },
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = match cli.command {
        Commands::Run {
            config,
            out,
            apply,
            strict,
            json,
        } => recon::cmd_run(recon::RunOptions {
            config,
            out,
            apply,
            strict,
            json,
        }),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Apply { config, plan } => recon::cmd_apply(config, plan),
        Commands::Fetch { url, out, no_xlsx } => fetch::cmd_fetch(&url, &out, !no_xlsx),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
