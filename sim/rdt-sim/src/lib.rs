//! Interactive shell around [`rdt_sim_core`].
//!
//! - [`cli`] parses arguments, sets up logging, and picks the exit code
//! - [`collector`] asks the user which events happened in a cycle
//! - [`simulator`] runs the prompt, advance, report loop

pub mod cli;
pub mod collector;
pub mod simulator;
