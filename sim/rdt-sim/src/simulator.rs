//! The interactive loop: ask what happened, advance the session, report.

use crate::collector::{CollectError, Collector};
use rdt_sim_core::{Session, TableError, TextReport};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use thiserror::Error as ThisError;
use tracing::{event, Level};

/// Why a session stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The user typed the quit token.
    Quit,
    /// The input ran out, e.g. at the end of a script.
    EndOfInput,
}

/// Runs `session` until the user quits or `input` is exhausted.
///
/// Prompts and reports are written to `output`.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> Result<Termination, RunError> {
    writeln!(output, "Running sender FSM")?;
    writeln!(output, "Type \"Q\" at anytime to quit FSM")?;
    let mut collector = Collector::new(input);

    loop {
        let state = session.state();
        writeln!(output, "\nCurrent state: {state}")?;
        let flags = match collector.collect(state, &mut output) {
            Ok(flags) => flags,
            Err(CollectError::Quit) => {
                writeln!(output, "Program is shutting down at user's request")?;
                output.flush()?;
                tracing::info!("Quit after {} cycles in {}", session.cycles(), state);
                return Ok(Termination::Quit);
            }
            Err(CollectError::EndOfInput) => {
                output.flush()?;
                tracing::info!("Input ended after {} cycles in {}", session.cycles(), state);
                return Ok(Termination::EndOfInput);
            }
            Err(CollectError::Io(e)) => return Err(e.into()),
        };

        event!(target: "EVENT", Level::DEBUG, state = %state, flags = flags.bits());
        session.advance(flags, &mut TextReport::new(&mut output))?;
    }
}

#[derive(Debug, ThisError)]
pub enum RunError {
    #[error("{0}")]
    Table(#[from] TableError),
    #[error("Could not open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdt_sim_core::State;

    fn run_script(script: &str) -> (Session, Termination, String) {
        let mut session = Session::default();
        let mut out = Vec::new();
        let termination = run(&mut session, script.as_bytes(), &mut out).unwrap();
        (session, termination, String::from_utf8(out).unwrap())
    }

    #[test]
    fn quit_before_any_event() {
        let (session, termination, out) = run_script("q\n");
        assert_eq!(termination, Termination::Quit);
        assert_eq!(session.state(), State::WaitCall0);
        assert_eq!(session.cycles(), 0);
        assert!(out.starts_with("Running sender FSM\n"));
        assert!(out.ends_with("Program is shutting down at user's request\n"));
        assert!(!out.contains("Transition"));
    }

    #[test]
    fn reports_each_cycle() {
        let (session, termination, out) = run_script("r\nt\ns\nn\nn\n");
        assert_eq!(termination, Termination::EndOfInput);
        assert_eq!(session.state(), State::WaitAck0);
        assert_eq!(session.cycles(), 3);
        assert!(out.contains("Transition: WAIT_CALL_0 -> WAIT_ACK_0"));
        assert!(out.contains("Action: Resend packet"));
        assert!(out.contains("Action: Reset timer"));
        // 17 = PacketReceived | PacketNotCorrupt, which has no row
        assert!(out.contains("No transition occurred. Sender is idle."));
        assert_eq!(out.matches("Current state: WAIT_ACK_0").count(), 3);
    }
}
