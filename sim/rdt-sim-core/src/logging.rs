//! Wrapper functions for the structured events emitted while the sender runs.
//! Each function corresponds to one kind of event and logs under its own
//! target. Installing a subscriber is left to the binary.

use crate::{Action, ActionId, EventFlags, State};
use tracing::{event, Level};

/// A rule fired. Captures the states on either side, the row that matched, and
/// the numeric flags that matched it.
pub fn transition_event(from: State, to: State, action_id: ActionId, flags: EventFlags) {
    event!(target: "TRANSITION", Level::INFO, from = %from, to = %to, row = action_id.0, flags = flags.bits());
}

/// No rule matched the flags in this state.
pub fn idle_event(state: State, flags: EventFlags) {
    event!(target: "IDLE", Level::INFO, state = %state, flags = flags.bits());
}

/// An action was dispatched for a row.
pub fn action_event(action_id: ActionId, action: Action) {
    event!(target: "ACTION", Level::INFO, row = action_id.0, action = ?action);
}
