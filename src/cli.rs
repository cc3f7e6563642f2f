// src/cli.rs
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};

use crate::config::{consts::DAY_FORMAT, AppOptions, LogLevel};
use crate::core::TransferId;
use crate::pages::TableKind;
use crate::progress::Progress;
use crate::runner;

#[derive(Parser)]
#[command(name = "mister_sync")]
#[command(about = "Merge freshly scraped league tables into the historical CSV stores")]
struct Cli {
    /// YAML config file (default: ./mister_sync.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Override the configured log level
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every snapshot in the source directory into the destination stores
    Run {
        /// Directory with the new snapshots
        #[arg(long)]
        source: Option<PathBuf>,
        /// Directory with the historical stores
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Only these table kinds (repeatable)
        #[arg(long, value_name = "KIND")]
        only: Vec<TableKind>,
        /// Run date stamped on new feed entries (YYYY-MM-DD, default today)
        #[arg(long, value_parser = parse_day)]
        today: Option<NaiveDate>,
    },
    /// Merge one snapshot file into one history file
    Merge {
        kind: TableKind,
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        new: PathBuf,
        /// Output file (default: overwrite --history)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, value_parser = parse_day)]
        today: Option<NaiveDate>,
    },
    /// Print the identity of a transfer. Use "" for an absent field.
    Hash {
        player: String,
        from: String,
        to: String,
        price: String,
    },
    /// List table kinds with their merge policy and file name
    Kinds,
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).map_err(|e| format!("{s}: {e}"))
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    s.parse()
}

/// Prints one line per table as the run goes.
struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn item_done(&mut self, label: &str) {
        self.done += 1;
        println!("[{}/{}] {label} ok", self.done, self.total);
    }

    fn item_failed(&mut self, label: &str, error: &str) {
        self.done += 1;
        println!("[{}/{}] {label} FAILED: {error}", self.done, self.total);
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Hash { player, from, to, price } = &cli.command {
        let id = TransferId::compute(
            Some(player.as_str()),
            Some(from.as_str()),
            Some(to.as_str()),
            Some(price.as_str()),
        );
        println!("{id}");
        return Ok(());
    }
    if let Commands::Kinds = cli.command {
        for kind in TableKind::ALL {
            println!("{:<15} {:<14} {}", kind.label(), format!("{:?}", kind.policy()), kind.default_file());
        }
        return Ok(());
    }

    let mut opts = AppOptions::load(cli.config.as_deref()).wrap_err("loading configuration")?;
    if let Some(level) = cli.log_level {
        opts.logging.level = level;
    }
    crate::log::init(&opts.logging).wrap_err("opening log file")?;

    match cli.command {
        Commands::Run { source, dest, only, today } => {
            if let Some(dir) = source {
                opts.paths.source_dir = dir;
            }
            if let Some(dir) = dest {
                opts.paths.dest_dir = dir;
            }
            let kinds = if only.is_empty() { TableKind::ALL.to_vec() } else { only };
            let today = today.unwrap_or_else(|| Local::now().date_naive());

            let mut progress = ConsoleProgress { total: 0, done: 0 };
            let summary = runner::run(&opts, &kinds, today, Some(&mut progress));
            print!("{summary}");

            let failed = summary.failed().count();
            if failed > 0 {
                bail!("{failed} of {} tables failed", summary.tables.len());
            }
        }
        Commands::Merge { kind, history, new, out, today } => {
            let out = out.unwrap_or_else(|| history.clone());
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let stats = runner::merge_files(kind, &history, &new, &out, today)
                .wrap_err_with(|| format!("merging {kind}"))?;
            println!("{kind}: {stats}");
        }
        Commands::Hash { .. } | Commands::Kinds => {}
    }
    Ok(())
}
