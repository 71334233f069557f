//! relsnap - tiered ZFS snapshot scheduler

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use cli_lib::{logging, Invocation, Operation, Settings};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Keep quarterly, monthly, weekly, daily and hourly ZFS snapshots
///
/// Meant to be run from cron: `create` hourly, `destroy` after it.
#[derive(Parser)]
#[command(name = "relsnap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Operation to run
    #[arg(value_enum)]
    operation: Operation,

    /// Filesystem to operate on
    ///
    /// create and destroy also walk its descendants. init writes only to this
    /// filesystem; descendants inherit the counts unless they set their own.
    filesystem: String,

    /// Log level: trace, debug, info, warning, error or critical
    #[arg(short = 'l', long)]
    loglevel: Option<String>,

    /// Namespace of the ZFS user properties
    #[arg(short = 'p', long)]
    prefix: Option<String>,

    /// Retention count written by init
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    count: Option<i64>,

    /// Settings file (default: $RELSNAP_CONFIG, then /etc/relsnap.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::discover(cli.config.as_deref())?;
    if let Some(loglevel) = cli.loglevel {
        settings.loglevel = loglevel;
    }
    if let Some(prefix) = cli.prefix {
        settings.prefix = prefix;
    }
    if let Some(count) = cli.count {
        settings.count = count;
    }
    settings.validate()?;

    logging::init(logging::parse_level(&settings.loglevel)?)?;

    let store = settings.store();
    let config = settings.run_config();
    let invocation = Invocation {
        store: &store,
        config: &config,
        filesystem: &cli.filesystem,
        count: settings.count,
        now: Local::now().naive_local(),
    };

    cli_lib::execute(cli.operation, &invocation)
}
