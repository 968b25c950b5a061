//! The sender side of the alternating-bit (stop-and-wait) reliable data
//! transfer protocol, modeled as a finite-state machine.
//!
//! The sender has no channel and no timer. Instead, each cycle it is handed the
//! set of things that happened (a packet arrived, a timeout fired, ...) as
//! [`EventFlags`], looks that set up in its [`TransitionTable`], and reports
//! the transition and [`Action`] it would take.
//!
//! # Organization
//! - [`Event`] and [`EventFlags`] encode what happened during a cycle
//! - [`State`] is the sender's position in the protocol cycle
//! - [`TransitionTable`] maps a state and flags to the next state
//! - [`step`] evaluates one cycle without side effects
//! - [`Session`] owns the current state and dispatches actions to a [`Report`]
//!
//! # Example
//!
//! ```
//! use rdt_sim_core::{Action, Event, Recorder, Session, State};
//!
//! let mut session = Session::default();
//! let mut recorder = Recorder::new();
//! let outcome = session.advance(Event::PacketRequested.into(), &mut recorder).unwrap();
//! assert_eq!(outcome.action(), Some(Action::MakeSendPacket));
//! assert_eq!(session.state(), State::WaitAck0);
//! ```

mod logging;

pub mod event;
pub use event::{Event, EventFlags};

pub mod state;
pub use state::{State, StateKind};

pub mod action;
pub use action::{dispatch, Action, ActionId, Record, Recorder, Report, TextReport};

pub mod table;
pub use table::{Rule, TableError, TransitionTable};

pub mod engine;
pub use engine::{step, Outcome};

mod session;
pub use session::Session;
