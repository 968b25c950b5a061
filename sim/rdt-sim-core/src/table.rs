//! The transition table of the sender.
//!
//! A table is an ordered list of [`Rule`]s. The position of a rule is its
//! [`ActionId`], so reordering rows changes which identifier a transition
//! reports. Lookups are exact: the combined flags of a cycle must equal a
//! rule's flags bit for bit, a rule whose flags are only a subset never fires.

use crate::{
    Action::{self, *},
    ActionId,
    Event::*,
    EventFlags,
    State::{self, *},
};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error as ThisError;

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    /// The state the rule applies in
    pub source: State,
    /// The exact combined flags that trigger the rule
    pub flags: EventFlags,
    /// The state the sender moves to
    pub destination: State,
    /// What the sender does when the rule fires
    pub action: Action,
}

impl Rule {
    pub const fn new(source: State, flags: EventFlags, destination: State, action: Action) -> Self {
        Self {
            source,
            flags,
            destination,
            action,
        }
    }
}

// The numeric value of each row is what serialized tables carry and must not
// change.
const SENDER_RULES: [Rule; 12] = [
    // 1
    Rule::new(WaitCall0, EventFlags::of(&[PacketReceived]), WaitCall0, DiscardPacket),
    // 2
    Rule::new(WaitCall0, EventFlags::of(&[PacketRequested]), WaitAck0, MakeSendPacket),
    // 4
    Rule::new(WaitAck0, EventFlags::of(&[TimeOut]), WaitAck0, ResendPacket),
    // 65
    Rule::new(WaitAck0, EventFlags::of(&[PacketReceived, Ack1]), WaitAck0, DiscardPacket),
    // 9
    Rule::new(WaitAck0, EventFlags::of(&[PacketReceived, PacketCorrupt]), WaitAck0, DiscardPacket),
    // 49
    Rule::new(
        WaitAck0,
        EventFlags::of(&[PacketReceived, PacketNotCorrupt, Ack0]),
        WaitCall1,
        StopTimer,
    ),
    // 1
    Rule::new(WaitCall1, EventFlags::of(&[PacketReceived]), WaitCall1, DiscardPacket),
    // 2
    Rule::new(WaitCall1, EventFlags::of(&[PacketRequested]), WaitAck1, MakeSendPacket),
    // 4
    Rule::new(WaitAck1, EventFlags::of(&[TimeOut]), WaitAck1, ResendPacket),
    // 33
    Rule::new(WaitAck1, EventFlags::of(&[PacketReceived, Ack0]), WaitAck1, DiscardPacket),
    // 9
    Rule::new(WaitAck1, EventFlags::of(&[PacketReceived, PacketCorrupt]), WaitAck1, DiscardPacket),
    // 81
    Rule::new(
        WaitAck1,
        EventFlags::of(&[PacketReceived, PacketNotCorrupt, Ack1]),
        WaitCall0,
        StopTimer,
    ),
];

/// A deterministic, immutable list of transition rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    rules: Vec<Rule>,
}

impl TransitionTable {
    /// The alternating-bit sender's table.
    pub fn sender() -> Self {
        Self {
            rules: SENDER_RULES.to_vec(),
        }
    }

    /// Creates a table from `rules`, in order.
    ///
    /// Fails if two rules share both their source state and their flags, since
    /// the later one could never fire.
    pub fn new(rules: Vec<Rule>) -> Result<Self, TableError> {
        for (second, rule) in rules.iter().enumerate() {
            if let Some(first) = rules[..second]
                .iter()
                .position(|r| r.source == rule.source && r.flags == rule.flags)
            {
                return Err(TableError::DuplicateRule {
                    state: rule.source,
                    flags: rule.flags,
                    first,
                    second,
                });
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finds the first rule for `state` whose flags equal `flags` exactly.
    ///
    /// `None` means the sender has nothing to do this cycle. It is not an
    /// error.
    pub fn lookup(&self, state: State, flags: EventFlags) -> Option<(State, ActionId)> {
        self.rules
            .iter()
            .position(|rule| rule.source == state && rule.flags == flags)
            .map(|row| (self.rules[row].destination, ActionId(row)))
    }

    /// The action performed by the rule at row `id`.
    pub fn action(&self, id: ActionId) -> Option<Action> {
        self.rules.get(id.0).map(|rule| rule.action)
    }

    /// Reads a table from CSV with the columns `source,flags,destination,action`.
    ///
    /// States are given by index and flags by their numeric value.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rules = Vec::new();
        for (row, record) in reader.deserialize().enumerate() {
            let record: RuleRecord = record?;
            let state = |index| State::from_index(index).ok_or(TableError::InvalidState { row, index });
            rules.push(Rule::new(
                state(record.source)?,
                record.flags,
                state(record.destination)?,
                record.action,
            ));
        }
        Self::new(rules)
    }

    /// Writes the table in the format read by [`TransitionTable::from_csv`].
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_writer(writer);
        for rule in &self.rules {
            writer.serialize(RuleRecord::from(*rule))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::sender()
    }
}

/// A rule as it appears in a serialized table
#[derive(Debug, Serialize, Deserialize)]
struct RuleRecord {
    source: u8,
    flags: EventFlags,
    destination: u8,
    action: Action,
}

impl From<Rule> for RuleRecord {
    fn from(rule: Rule) -> Self {
        Self {
            source: rule.source.index(),
            flags: rule.flags,
            destination: rule.destination.index(),
            action: rule.action,
        }
    }
}

#[derive(Debug, ThisError)]
pub enum TableError {
    #[error("Invalid state {index} in transition table row {row}")]
    InvalidState { row: usize, index: u8 },
    #[error("Rows {first} and {second} both handle flags {flags} in state {state}")]
    DuplicateRule {
        state: State,
        flags: EventFlags,
        first: usize,
        second: usize,
    },
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
