use crate::{action, engine, logging, EventFlags, Outcome, Report, State, TransitionTable};
use std::io;

/// A single run of the sender. Owns the table and the current state, which is
/// the only thing that changes between cycles.
#[derive(Debug, Clone)]
pub struct Session {
    table: TransitionTable,
    state: State,
    cycles: u64,
}

impl Session {
    /// Starts a session in [`State::INITIAL`].
    pub fn new(table: TransitionTable) -> Self {
        Self {
            table,
            state: State::INITIAL,
            cycles: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// The number of cycles run so far, idle ones included
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs one cycle with the events in `flags`.
    ///
    /// A matching rule moves the sender and its action is dispatched to
    /// `report`. Otherwise `report` is told the sender is idle. The state is
    /// updated even if reporting fails.
    pub fn advance<R: Report + ?Sized>(
        &mut self,
        flags: EventFlags,
        report: &mut R,
    ) -> io::Result<Outcome> {
        let outcome = engine::step(&self.table, self.state, flags);
        self.state = outcome.state();
        self.cycles += 1;

        match outcome {
            Outcome::Transition {
                from, to, action_id, ..
            } => {
                logging::transition_event(from, to, action_id, flags);
                report.transition(from, to)?;
                action::dispatch(&self.table, action_id, report)?;
            }
            Outcome::Idle { state, flags } => {
                logging::idle_event(state, flags);
                report.idle(state)?;
            }
        }
        Ok(outcome)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TransitionTable::sender())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Event::*, Record, Recorder, State::*};

    #[test]
    fn full_cycle_returns_to_the_start() -> anyhow::Result<()> {
        let mut session = Session::default();
        let mut recorder = Recorder::new();
        assert_eq!(session.state(), WaitCall0);

        let steps = [
            (EventFlags::from(PacketRequested), WaitAck0, Action::MakeSendPacket),
            (EventFlags::from(TimeOut), WaitAck0, Action::ResendPacket),
            (PacketReceived | PacketNotCorrupt | Ack0, WaitCall1, Action::StopTimer),
            (EventFlags::from(PacketRequested), WaitAck1, Action::MakeSendPacket),
            (PacketReceived | PacketNotCorrupt | Ack1, WaitCall0, Action::StopTimer),
        ];
        for (flags, state, action) in steps {
            let outcome = session.advance(flags, &mut recorder)?;
            assert_eq!(outcome.state(), state);
            assert_eq!(outcome.action(), Some(action));
            assert_eq!(session.state(), state);
        }

        assert_eq!(session.cycles(), 5);
        assert_eq!(
            recorder.records[..2],
            [
                Record::Transition {
                    from: WaitCall0,
                    to: WaitAck0
                },
                Record::Action(Action::MakeSendPacket),
            ]
        );
        Ok(())
    }

    #[test]
    fn idle_is_reported_without_an_action() -> anyhow::Result<()> {
        let mut session = Session::default();
        let mut recorder = Recorder::new();
        let outcome = session.advance(TimeOut.into(), &mut recorder)?;
        assert!(outcome.is_idle());
        assert_eq!(session.state(), WaitCall0);
        assert_eq!(recorder.records, [Record::Idle(WaitCall0)]);
        Ok(())
    }

    #[test]
    #[tracing_test::traced_test]
    fn transitions_are_logged() {
        let mut session = Session::default();
        let mut recorder = Recorder::new();
        session.advance(PacketRequested.into(), &mut recorder).unwrap();
        session.advance(PacketRequested.into(), &mut recorder).unwrap();
        assert!(logs_contain("to=WAIT_ACK_0"));
        assert!(logs_contain("row=1"));
        assert!(logs_contain("state=WAIT_ACK_0"));
    }
}
