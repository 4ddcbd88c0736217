use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod foreign;
mod logging;

use commands::list::handle_list;
use commands::load_suite;
use commands::run::{handle_run, RunOptions};
use commands::show_config::handle_show_config;
use logging::setup_logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Suite file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Suite file describing libraries and benchmarks",
        long_help = "TOML suite file. When omitted, the built-in thread sweep over the bag and queue workloads is used, with libraries looked up in the current directory."
    )]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info", value_name = "LEVEL")]
    log_level: String,

    /// Also write a daily rolling log file into this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run benchmarks and write their averaged data files
    #[command(about = "Run benchmarks and write their averaged data files")]
    Run {
        /// Only run the named benchmark (repeatable)
        #[arg(long = "only", value_name = "NAME")]
        only: Vec<String>,

        /// Also write every raw sample to <name>.raw
        #[arg(long)]
        raw: bool,

        /// Also write a JSON summary to <name>.summary.json
        #[arg(long)]
        json: bool,
    },

    /// List the benchmarks of the suite
    #[command(about = "List the benchmarks of the suite", alias = "ls")]
    List,

    /// Print the resolved suite as TOML
    #[command(about = "Print the resolved suite as TOML")]
    ShowConfig,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _guard = setup_logging(&cli.log_level, cli.log_dir.as_deref())?;

    let suite = load_suite(cli.config.as_deref())?;

    match cli.command {
        Command::Run { only, raw, json } => handle_run(&suite, &RunOptions { only, raw, json }),
        Command::List => handle_list(&suite),
        Command::ShowConfig => handle_show_config(&suite),
    }
}
