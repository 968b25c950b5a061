//! The stimuli that drive the sender and the flag set used to combine them.
//!
//! Every [`Event`] owns exactly one bit, starting from bit 0. The events that
//! are true during one cycle are folded into a single [`EventFlags`] value by
//! OR-ing their bits together, and that value is what the transition table is
//! keyed on.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Something that can happen to the sender during one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A packet arrived from the channel.
    PacketReceived,
    /// The layer above asked for data to be sent.
    PacketRequested,
    /// The retransmit timer ran out.
    TimeOut,
    /// The received packet failed its checksum.
    PacketCorrupt,
    /// The received packet passed its checksum.
    PacketNotCorrupt,
    /// The received packet acknowledges sequence number 0.
    Ack0,
    /// The received packet acknowledges sequence number 1.
    Ack1,
}

impl Event {
    /// Every event, ordered by bit position.
    pub const ALL: [Event; 7] = [
        Event::PacketReceived,
        Event::PacketRequested,
        Event::TimeOut,
        Event::PacketCorrupt,
        Event::PacketNotCorrupt,
        Event::Ack0,
        Event::Ack1,
    ];

    /// The bit value this event contributes to an [`EventFlags`].
    pub const fn flag(self) -> u8 {
        1 << self.bit()
    }

    /// The position of this event's bit
    const fn bit(self) -> u8 {
        match self {
            Event::PacketReceived => 0,
            Event::PacketRequested => 1,
            Event::TimeOut => 2,
            Event::PacketCorrupt => 3,
            Event::PacketNotCorrupt => 4,
            Event::Ack0 => 5,
            Event::Ack1 => 6,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Event::PacketReceived => "PacketReceived",
            Event::PacketRequested => "PacketRequested",
            Event::TimeOut => "TimeOut",
            Event::PacketCorrupt => "PacketCorrupt",
            Event::PacketNotCorrupt => "PacketNotCorrupt",
            Event::Ack0 => "Ack0",
            Event::Ack1 => "Ack1",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The events observed together in one cycle, stored as the OR of their
/// flags.
///
/// Two flag sets are only equal when they hold exactly the same events. The
/// transition table depends on this: a lookup never matches on a subset.
#[derive(Default, Hash, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventFlags(u8);

impl EventFlags {
    /// No events at all
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw combined value, such as one read from a table fixture.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Combines the given events.
    pub const fn of(events: &[Event]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < events.len() {
            bits |= events[i].flag();
            i += 1;
        }
        Self(bits)
    }

    /// The combined numeric value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns a copy of these flags with `event` added.
    pub const fn with(self, event: Event) -> Self {
        Self(self.0 | event.flag())
    }

    /// Adds `event` to these flags.
    pub fn insert(&mut self, event: Event) {
        self.0 |= event.flag();
    }

    /// Get whether `event` is part of these flags
    pub const fn contains(self, event: Event) -> bool {
        self.0 & event.flag() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The named events set in these flags, in bit order.
    pub fn events(self) -> impl Iterator<Item = Event> {
        Event::ALL.into_iter().filter(move |event| self.contains(*event))
    }

    /// Bits that do not belong to any [`Event`].
    fn unknown_bits(self) -> u8 {
        let known = Event::ALL.iter().fold(0, |acc, event| acc | event.flag());
        self.0 & !known
    }
}

impl From<u8> for EventFlags {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<EventFlags> for u8 {
    fn from(flags: EventFlags) -> Self {
        flags.0
    }
}

impl From<Event> for EventFlags {
    fn from(event: Event) -> Self {
        Self(event.flag())
    }
}

impl BitOr for Event {
    type Output = EventFlags;

    fn bitor(self, rhs: Event) -> EventFlags {
        EventFlags::from(self).with(rhs)
    }
}

impl BitOr<Event> for EventFlags {
    type Output = EventFlags;

    fn bitor(self, rhs: Event) -> EventFlags {
        self.with(rhs)
    }
}

impl BitOr for EventFlags {
    type Output = EventFlags;

    fn bitor(self, rhs: EventFlags) -> EventFlags {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign<Event> for EventFlags {
    fn bitor_assign(&mut self, rhs: Event) {
        self.insert(rhs);
    }
}

impl std::fmt::Debug for EventFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventFlags({self})")
    }
}

impl std::fmt::Display for EventFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        if self.is_empty() {
            return Ok(());
        }
        write!(f, " (")?;
        let mut wrote = false;
        for event in self.events() {
            if wrote {
                write!(f, " | ")?;
            }
            wrote = true;
            write!(f, "{event}")?;
        }
        let unknown = self.unknown_bits();
        if unknown != 0 {
            if wrote {
                write!(f, " | ")?;
            }
            write!(f, "{unknown:#04x}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_distinct_powers_of_two() {
        for (i, a) in Event::ALL.iter().enumerate() {
            assert!(a.flag().is_power_of_two(), "{a} is not a single bit");
            for b in &Event::ALL[i + 1..] {
                assert_ne!(a.flag(), b.flag(), "{a} and {b} share a bit");
            }
        }
    }

    #[test]
    fn flags_fill_the_low_bits() {
        let all = EventFlags::of(&Event::ALL);
        assert_eq!(all.bits(), 0b111_1111);
        assert_eq!(all.unknown_bits(), 0);
    }

    #[test]
    fn combining_is_an_or() {
        let flags = Event::PacketReceived | Event::PacketNotCorrupt | Event::Ack0;
        assert_eq!(flags.bits(), 49);
        assert_eq!(
            flags,
            EventFlags::of(&[Event::Ack0, Event::PacketNotCorrupt, Event::PacketReceived])
        );
        assert!(flags.contains(Event::Ack0));
        assert!(!flags.contains(Event::Ack1));

        let mut built = EventFlags::EMPTY;
        built |= Event::PacketReceived;
        built |= Event::PacketReceived;
        assert_eq!(built, EventFlags::from(Event::PacketReceived));
    }

    #[test]
    fn display_names_the_events() {
        let flags = Event::PacketReceived | Event::Ack1;
        assert_eq!(flags.to_string(), "65 (PacketReceived | Ack1)");
        assert_eq!(EventFlags::EMPTY.to_string(), "0");
        assert_eq!(EventFlags::from_bits(0x81).to_string(), "129 (PacketReceived | 0x80)");
        assert_eq!(format!("{:?}", EventFlags::from(Event::TimeOut)), "EventFlags(4 (TimeOut))");
    }
}
