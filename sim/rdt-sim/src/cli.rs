//! Parses the command line arguments and runs the simulator.
//!
//! Basic usage, replaying a recorded session with logging on:
//!
//! ```cargo run --bin rdt-sim -- --log --script session.txt```

use crate::simulator::{self, RunError};
use clap::Parser;
use rdt_sim_core::{Session, TransitionTable};
use std::{
    fs::{create_dir_all, File, OpenOptions},
    io::{self, BufReader},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};
use thiserror::Error as ThisError;
use tracing_subscriber::FmtSubscriber;

/// Stores the different command line arguments.
#[derive(Parser)]
#[command(author, version, about = "Simulates the sender of the alternating-bit protocol")]
struct Args {
    /// Logging flag. Writes JSON logs to ./logs when set.
    #[arg(short, long)]
    log: bool,
    /// CSV file with the transition table to simulate instead of the built-in one
    #[arg(short, long)]
    table: Option<PathBuf>,
    /// File of answers to replay instead of reading from the terminal
    #[arg(short, long)]
    script: Option<PathBuf>,
    /// Print the transition table as CSV and exit
    #[arg(long)]
    print_table: bool,
}

/// Parses the command line, runs the simulator, and maps the result to the
/// process exit code.
pub fn run_from_arguments() -> ExitCode {
    let args = Args::parse();
    if args.log {
        if let Err(e) = initialize_logging() {
            eprintln!("Logging disabled: {e}");
        }
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("ERROR: {e}");
            eprintln!("PROGRAM EXITING");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), RunError> {
    let table = match &args.table {
        Some(path) => {
            let table = TransitionTable::from_csv(open(path)?)?;
            tracing::info!("Loaded {} rules from {}", table.len(), path.display());
            table
        }
        None => TransitionTable::sender(),
    };

    if args.print_table {
        return Ok(table.write_csv(io::stdout().lock())?);
    }

    let mut session = Session::new(table);
    let stdout = io::stdout().lock();
    let termination = match &args.script {
        Some(path) => simulator::run(&mut session, BufReader::new(open(path)?), stdout)?,
        None => simulator::run(&mut session, io::stdin().lock(), stdout)?,
    };
    tracing::info!("Session ended: {:?}", termination);
    Ok(())
}

fn open(path: &Path) -> Result<File, RunError> {
    File::open(path).map_err(|source| RunError::Open {
        path: path.to_owned(),
        source,
    })
}

#[derive(Debug, ThisError)]
enum LoggingError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs a JSON subscriber writing to a timestamped file in `./logs`. Only
/// should be called once, before the session starts.
fn initialize_logging() -> Result<(), LoggingError> {
    let main_path = "./logs";
    create_dir_all(main_path)?;
    let file_path = format!(
        "{}/debug-{}.log",
        main_path,
        chrono::offset::Local::now().format("%y-%m-%d_%H-%M-%S")
    );
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(Arc::new(file))
        .json()
        .finish();
    // set the global default so all events go to the same file
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
