//! Asks the user what happened and turns the answers into [`EventFlags`].
//!
//! The questions depend on what the sender is waiting for. In a call state the
//! only choices are a packet arriving or the layer above requesting a send. In
//! an ack state a timeout can fire, or a packet arrives and the user is asked
//! whether it acknowledges something and whether it is corrupt.

use rdt_sim_core::{Event, EventFlags, State, StateKind};
use std::io::{self, BufRead, Write};
use thiserror::Error as ThisError;

/// Typing this at any prompt ends the session.
pub const QUIT: &str = "q";

/// Reads answers line by line. Prompts are written to the writer passed to
/// [`Collector::collect`].
#[derive(Debug)]
pub struct Collector<R> {
    input: R,
    line: String,
}

impl<R: BufRead> Collector<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
        }
    }

    /// Collects the events of one cycle in `state`.
    ///
    /// Unrecognized answers re-ask the same question. Quitting or running out
    /// of input aborts the cycle with no flags.
    pub fn collect<W: Write>(&mut self, state: State, out: &mut W) -> Result<EventFlags, CollectError> {
        match state.kind() {
            StateKind::Call => self.call_query(out),
            StateKind::Ack => self.ack_query(out),
        }
    }

    fn call_query<W: Write>(&mut self, out: &mut W) -> Result<EventFlags, CollectError> {
        let event = self.ask(
            out,
            r#"Type "S" to send a packet or "R" to request a packet"#,
            &[("s", Event::PacketReceived), ("r", Event::PacketRequested)],
            r#"Must enter "S" or "R""#,
        )?;
        Ok(event.into())
    }

    fn ack_query<W: Write>(&mut self, out: &mut W) -> Result<EventFlags, CollectError> {
        let event = self.ask(
            out,
            r#"Type "S" to send a packet or "T" to simulate timer running out"#,
            &[("s", Event::PacketReceived), ("t", Event::TimeOut)],
            r#"Must enter "S" or "T""#,
        )?;
        let mut flags = EventFlags::from(event);
        if event == Event::TimeOut {
            return Ok(flags);
        }

        let is_ack = self.ask(
            out,
            r#"Is packet an acknowledgement? "Y" or "N""#,
            &[("y", true), ("n", false)],
            r#"Must enter "Y" or "N""#,
        )?;
        if is_ack {
            flags |= self.ask(
                out,
                r#"Which packet are you acknowledging? "0" or "1""#,
                &[("0", Event::Ack0), ("1", Event::Ack1)],
                r#"Must enter "1" or "0""#,
            )?;
        }

        flags |= self.ask(
            out,
            r#"Is packet corrupt? "Y" or "N""#,
            &[("y", Event::PacketCorrupt), ("n", Event::PacketNotCorrupt)],
            r#"Must enter "Y" or "N""#,
        )?;
        Ok(flags)
    }

    /// Writes `prompt` and reads lines until one of the `choices` is entered.
    fn ask<W: Write, T: Copy>(
        &mut self,
        out: &mut W,
        prompt: &str,
        choices: &[(&str, T)],
        hint: &str,
    ) -> Result<T, CollectError> {
        writeln!(out, "{prompt}")?;
        loop {
            out.flush()?;
            let token = self.read_token()?;
            if token == QUIT {
                return Err(CollectError::Quit);
            }
            match choices.iter().find(|(name, _)| *name == token) {
                Some((_, answer)) => return Ok(*answer),
                None => {
                    tracing::debug!("Rejected answer {:?}", token);
                    writeln!(out, "{hint}")?;
                }
            }
        }
    }

    /// The next line of input, trimmed and lowercased.
    fn read_token(&mut self) -> Result<String, CollectError> {
        self.line.clear();
        if self.input.read_line(&mut self.line)? == 0 {
            return Err(CollectError::EndOfInput);
        }
        Ok(self.line.trim().to_lowercase())
    }
}

#[derive(Debug, ThisError)]
pub enum CollectError {
    #[error("Quit requested")]
    Quit,
    #[error("Input ended")]
    EndOfInput,
    #[error("{0}")]
    Io(#[from] io::Error),
}
