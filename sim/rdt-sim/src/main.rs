use rdt_sim::cli::run_from_arguments;
use std::process::ExitCode;

/// Without arguments, main simulates the built-in sender table interactively
fn main() -> ExitCode {
    run_from_arguments()
}
