//! memopad: console memo pad stored in a single SQLite file.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use memopad::db::{AsciiFold, CaseFold, MemoDB, TurkicFold, UnicodeFold};
use memopad::paths;
use memopad::shell::{Command, Shell, Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Fold {
    /// Unicode lowercase (any script)
    Unicode,
    /// Turkish/Azerbaijani dotted and dotless i
    Turkic,
    /// ASCII letters only
    Ascii,
}

impl Fold {
    fn strategy(self) -> Arc<dyn CaseFold> {
        match self {
            Fold::Unicode => Arc::new(UnicodeFold),
            Fold::Turkic => Arc::new(TurkicFold),
            Fold::Ascii => Arc::new(AsciiFold),
        }
    }
}

#[derive(Parser)]
#[command(name = "memopad", version, about = "Console memo pad backed by a single SQLite file")]
struct Args {
    /// SQLite store path [default: ~/.memopad/memos.db]
    #[arg(long, env = "MEMOPAD_DB")]
    db: Option<PathBuf>,

    /// Case folding used by title/text/tag search
    #[arg(long, value_enum, default_value_t = Fold::Unicode, env = "MEMOPAD_FOLD")]
    fold: Fold,

    /// Do not offer a backup when quitting
    #[arg(long)]
    no_exit_backup: bool,

    /// Run a single command (e.g. `view-all`, `-c`) and exit
    #[arg(allow_hyphen_values = true)]
    command: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let one_shot = match args.command.as_deref().map(str::parse::<Command>) {
        None => None,
        Some(Ok(cmd)) => Some(cmd),
        Some(Err(e)) => {
            eprintln!("memopad: {e}, run `memopad help` for the list");
            return ExitCode::FAILURE;
        }
    };

    let store = match args.db.as_deref() {
        Some(p) => paths::prepare_store_path(p),
        None => paths::store_path(),
    };
    let store = match store {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "cannot resolve store path");
            eprintln!("memopad: {e}");
            return ExitCode::FAILURE;
        }
    };

    let terminal = match Terminal::new() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("memopad: cannot open terminal: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(store = %store.display(), fold = ?args.fold, version = env!("CARGO_PKG_VERSION"), "memopad starting");

    let db = MemoDB::with_fold(store, args.fold.strategy());
    let mut shell = Shell::new(db, terminal, io::stdout()).exit_backup(!args.no_exit_backup);

    let ran = shell.startup().and_then(|()| match one_shot {
        Some(cmd) => shell.run_once(cmd),
        None => shell.run(),
    });
    match ran {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("memopad: output error: {e}");
            ExitCode::FAILURE
        }
    }
}
