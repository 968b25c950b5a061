use crate::{Action, ActionId, EventFlags, State, TransitionTable};

/// The result of running one cycle of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A rule matched.
    Transition {
        from: State,
        to: State,
        action_id: ActionId,
        action: Action,
    },
    /// No rule matched and the state is unchanged.
    Idle { state: State, flags: EventFlags },
}

impl Outcome {
    /// The state the sender is in after this cycle
    pub fn state(&self) -> State {
        match self {
            Outcome::Transition { to, .. } => *to,
            Outcome::Idle { state, .. } => *state,
        }
    }

    pub fn action_id(&self) -> Option<ActionId> {
        match self {
            Outcome::Transition { action_id, .. } => Some(*action_id),
            Outcome::Idle { .. } => None,
        }
    }

    pub fn action(&self) -> Option<Action> {
        match self {
            Outcome::Transition { action, .. } => Some(*action),
            Outcome::Idle { .. } => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Outcome::Idle { .. })
    }
}

/// Works out what happens when `flags` are observed in `state`.
///
/// This only evaluates the table. Applying the outcome and reporting it is
/// left to [`Session::advance`](crate::Session::advance).
pub fn step(table: &TransitionTable, state: State, flags: EventFlags) -> Outcome {
    match table.lookup(state, flags) {
        Some((to, action_id)) => match table.action(action_id) {
            Some(action) => Outcome::Transition {
                from: state,
                to,
                action_id,
                action,
            },
            // lookup only returns rows that exist
            None => unreachable!(),
        },
        None => Outcome::Idle { state, flags },
    }
}
