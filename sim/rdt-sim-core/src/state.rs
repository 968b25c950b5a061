/// The state of the stop-and-wait sender. The four states form a single cycle,
/// alternating between waiting on the layer above and waiting on an
/// acknowledgement for the sequence number just sent.
///
/// ```text
///             rdt_send                        rcv ACK 0
///   +-------------+  ---------->  +------------+  -------->  +-------------+
///   | WAIT_CALL_0 |               | WAIT_ACK_0 |             | WAIT_CALL_1 |
///   +-------------+  <----------  +------------+  <--------  +-------------+
///          ^          rcv ACK 1   +------------+   rdt_send         |
///          +--------------------- | WAIT_ACK_1 | <------------------+
///                                 +------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Waiting for the layer above to hand over data for sequence number 0.
    #[default]
    WaitCall0,
    /// Packet 0 is in flight; waiting for its acknowledgement.
    WaitAck0,
    /// Waiting for the layer above to hand over data for sequence number 1.
    WaitCall1,
    /// Packet 1 is in flight; waiting for its acknowledgement.
    WaitAck1,
}

/// Which question the sender is waiting on, used to decide what to ask the
/// user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Waiting for a call from the layer above
    Call,
    /// Waiting for an acknowledgement from the receiver
    Ack,
}

impl State {
    /// Every state, ordered by index.
    pub const ALL: [State; 4] = [
        State::WaitCall0,
        State::WaitAck0,
        State::WaitCall1,
        State::WaitAck1,
    ];

    /// The state every session starts in.
    pub const INITIAL: State = State::WaitCall0;

    /// The numeric index used in serialized transition tables.
    pub const fn index(self) -> u8 {
        match self {
            State::WaitCall0 => 0,
            State::WaitAck0 => 1,
            State::WaitCall1 => 2,
            State::WaitAck1 => 3,
        }
    }

    /// The state with the given index, or `None` if no such state exists.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(State::WaitCall0),
            1 => Some(State::WaitAck0),
            2 => Some(State::WaitCall1),
            3 => Some(State::WaitAck1),
            _ => None,
        }
    }

    pub const fn kind(self) -> StateKind {
        match self {
            State::WaitCall0 | State::WaitCall1 => StateKind::Call,
            State::WaitAck0 | State::WaitAck1 => StateKind::Ack,
        }
    }

    /// The alternating bit this state is concerned with.
    pub const fn sequence(self) -> u8 {
        match self {
            State::WaitCall0 | State::WaitAck0 => 0,
            State::WaitCall1 | State::WaitAck1 => 1,
        }
    }

    /// The next state around the protocol cycle.
    pub const fn successor(self) -> Self {
        match self {
            State::WaitCall0 => State::WaitAck0,
            State::WaitAck0 => State::WaitCall1,
            State::WaitCall1 => State::WaitAck1,
            State::WaitAck1 => State::WaitCall0,
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::WaitCall0 => "WAIT_CALL_0",
            State::WaitAck0 => "WAIT_ACK_0",
            State::WaitCall1 => "WAIT_CALL_1",
            State::WaitAck1 => "WAIT_ACK_1",
        };
        write!(f, "{name}")
    }
}
