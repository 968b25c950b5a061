//! Protocol actions and the reporting seam they are dispatched through.
//!
//! Nothing here touches a real channel or timer. Dispatching an action means
//! telling a [`Report`] which primitive steps the sender would perform.

use crate::{logging, State, TransitionTable};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// What the sender does when a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Ignore the packet that just arrived.
    DiscardPacket,
    /// Build a packet for the current sequence number, send it, and start the
    /// retransmit timer.
    MakeSendPacket,
    /// Send the in-flight packet again and restart the timer.
    ResendPacket,
    /// The in-flight packet was acknowledged.
    StopTimer,
}

impl Action {
    /// The primitive steps this action is made of, in the order they happen.
    pub const fn steps(self) -> &'static [&'static str] {
        match self {
            Action::DiscardPacket => &["Throw packet away"],
            Action::MakeSendPacket => &["Make packet", "Send packet", "Reset timer"],
            Action::ResendPacket => &["Resend packet", "Reset timer"],
            Action::StopTimer => &["Stop timer"],
        }
    }
}

/// Identifies a transition by its row in the [`TransitionTable`]. Several rows
/// may share the same [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub usize);

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receives everything observable about a cycle of the state machine.
pub trait Report {
    /// A rule matched and the sender moved from `from` to `to`.
    fn transition(&mut self, from: State, to: State) -> io::Result<()>;

    /// An action was dispatched for the transition just reported.
    fn action(&mut self, action: Action) -> io::Result<()>;

    /// No rule matched; the sender stays in `state`.
    fn idle(&mut self, state: State) -> io::Result<()>;
}

/// Looks up the action for `id` and hands it to `report`.
///
/// Returns `None` when `id` is not a row of `table`; nothing is reported in
/// that case.
pub fn dispatch<R: Report + ?Sized>(
    table: &TransitionTable,
    id: ActionId,
    report: &mut R,
) -> io::Result<Option<Action>> {
    let Some(action) = table.action(id) else {
        tracing::warn!("No action for row {}", id);
        return Ok(None);
    };
    logging::action_event(id, action);
    report.action(action)?;
    Ok(Some(action))
}

/// Writes cycles as the human readable lines shown by the simulator.
#[derive(Debug)]
pub struct TextReport<W> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Report for TextReport<W> {
    fn transition(&mut self, from: State, to: State) -> io::Result<()> {
        writeln!(self.out, "\nTransition: {from} -> {to}")
    }

    fn action(&mut self, action: Action) -> io::Result<()> {
        for step in action.steps() {
            writeln!(self.out, "Action: {step}")?;
        }
        Ok(())
    }

    fn idle(&mut self, _state: State) -> io::Result<()> {
        writeln!(self.out, "No transition occurred. Sender is idle.")
    }
}

/// One observation made by a [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Transition { from: State, to: State },
    Action(Action),
    Idle(State),
}

/// Keeps every report in memory so it can be inspected afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recorder {
    pub records: Vec<Record>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dispatched actions, in order.
    pub fn actions(&self) -> Vec<Action> {
        self.records
            .iter()
            .filter_map(|record| match record {
                Record::Action(action) => Some(*action),
                _ => None,
            })
            .collect()
    }
}

impl Report for Recorder {
    fn transition(&mut self, from: State, to: State) -> io::Result<()> {
        self.records.push(Record::Transition { from, to });
        Ok(())
    }

    fn action(&mut self, action: Action) -> io::Result<()> {
        self.records.push(Record::Action(action));
        Ok(())
    }

    fn idle(&mut self, state: State) -> io::Result<()> {
        self.records.push(Record::Idle(state));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_actions() {
        let table = TransitionTable::sender();
        let discards: Vec<usize> = (0..table.len())
            .filter(|row| table.action(ActionId(*row)) == Some(Action::DiscardPacket))
            .collect();
        assert_eq!(discards, [0, 3, 4, 6, 9, 10]);
        assert_eq!(table.action(ActionId(1)), Some(Action::MakeSendPacket));
        assert_eq!(table.action(ActionId(7)), Some(Action::MakeSendPacket));
        assert_eq!(table.action(ActionId(2)), Some(Action::ResendPacket));
        assert_eq!(table.action(ActionId(8)), Some(Action::ResendPacket));
        assert_eq!(table.action(ActionId(5)), Some(Action::StopTimer));
        assert_eq!(table.action(ActionId(11)), Some(Action::StopTimer));
    }

    #[test]
    fn dispatch_reports_the_action() -> anyhow::Result<()> {
        let table = TransitionTable::sender();
        let mut recorder = Recorder::new();
        assert_eq!(
            dispatch(&table, ActionId(2), &mut recorder)?,
            Some(Action::ResendPacket)
        );
        assert_eq!(dispatch(&table, ActionId(12), &mut recorder)?, None);
        assert_eq!(recorder.actions(), [Action::ResendPacket]);
        Ok(())
    }

    #[test]
    fn text_report_lists_each_step() -> anyhow::Result<()> {
        let mut report = TextReport::new(Vec::new());
        report.transition(State::WaitCall0, State::WaitAck0)?;
        report.action(Action::MakeSendPacket)?;
        report.idle(State::WaitAck0)?;
        let text = String::from_utf8(report.into_inner())?;
        assert_eq!(
            text,
            "\nTransition: WAIT_CALL_0 -> WAIT_ACK_0\n\
             Action: Make packet\n\
             Action: Send packet\n\
             Action: Reset timer\n\
             No transition occurred. Sender is idle.\n"
        );
        Ok(())
    }
}
