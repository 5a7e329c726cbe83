use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use fincalc_cli::commands::{BasicArgs, InterestArgs, LoanArgs, MortgageArgs};
use fincalc_cli::config::Config;
use fincalc_cli::logging;
use fincalc_cli::session::Session;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Basic, loan, compound interest and mortgage calculators.
///
/// Text arguments are read the way the calculator's input fields read them:
/// `$250,000` is a valid amount and anything unreadable counts as zero.
#[derive(Debug, Parser)]
#[command(name = "fincalc", version, about)]
struct Cli {
    /// TOML file with starting inputs and logging settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `fincalc_core=trace`. Overrides the config.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Keep log output off stderr. A --log-file still receives it.
    #[arg(long, global = true, default_value_t = false)]
    no_log_console: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Press a sequence of keys on the basic calculator.
    ///
    /// Numbers may be typed whole, e.g. `12.5 × 4 =`.
    Basic(BasicArgs),

    /// Monthly payment of an amortized loan.
    Loan(LoanArgs),

    /// Future value of a compounded deposit.
    Interest(InterestArgs),

    /// Monthly mortgage payment including tax and insurance.
    Mortgage(MortgageArgs),

    /// Interactive session with all four calculators as tabs.
    Session,
}

// ─── logging ─────────────────────────────────────────────────────────────────

/// Flags win over the config file; `RUST_LOG` wins over both.
fn setup_logging(
    cli: &Cli,
    config: &Config,
) -> Result<()> {
    let level = cli.log_level.as_deref().unwrap_or(config.logging.level.as_str());
    logging::init_logging(level);

    if cli.no_log_console || !config.logging.console {
        logging::set_console_enabled(false)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
        debug!(path = %path.display(), "file logging enabled");
    }
    Ok(())
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run(
    command: Command,
    config: &Config,
) -> Result<()> {
    match command {
        Command::Basic(args) => print!("{}", args.report().context("invalid key sequence")?),
        Command::Loan(args) => print!("{}", args.report(config)),
        Command::Interest(args) => print!("{}", args.report(config)),
        Command::Mortgage(args) => print!("{}", args.report(config)),
        Command::Session => {
            let mut session = Session::new(config);
            info!("interactive session started");
            session.run(io::stdin().lock(), io::stdout().lock())?;
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    setup_logging(&cli, &config)?;
    debug!(?cli, "starting");

    run(cli.command, &config)
}
