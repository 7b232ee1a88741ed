//! Per-origin ordering of received envelopes.
//!
//! The transport promises no ordering, so the receiver restores each
//! origin's stream itself:
//! - sequence below the next expected one: duplicate, dropped
//! - sequence equal to it: released, together with any held successors
//! - sequence above it, within `HOLD_WINDOW`: held back until the gap fills
//! - sequence further ahead: refused without being buffered
//!
//! A lost frame therefore stalls the stream instead of letting later
//! commands apply out of order.

use std::collections::BTreeMap;
use std::ops::Range;

use super::wire::Envelope;
use crate::core::seat::{Seat, SeatMap};

/// How far past the expected sequence an envelope may be held.
pub const HOLD_WINDOW: u64 = 64;

/// What happened to an admitted envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Envelopes now ready to apply, in sequence order.
    Ready(Vec<Envelope>),
    /// Already seen.
    Duplicate,
    /// Waiting for `expected`; `held` envelopes are buffered.
    Held { expected: u64, held: usize },
    /// Too far ahead of `expected` to buffer. Dropped.
    OutOfWindow { expected: u64 },
}

/// Per-origin reorder buffer.
///
/// Each origin's stream starts at sequence 1. At most `HOLD_WINDOW`
/// envelopes per origin are ever buffered.
#[derive(Clone, Debug)]
pub struct Inbox {
    expected: SeatMap<u64>,
    held: SeatMap<BTreeMap<u64, Envelope>>,
}

impl Default for Inbox {
    fn default() -> Self {
        Self {
            expected: SeatMap::new(|_| 1),
            held: SeatMap::new(|_| BTreeMap::new()),
        }
    }
}

impl Inbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an envelope.
    pub fn admit(&mut self, envelope: Envelope) -> Admission {
        let origin = envelope.record.origin;
        let sequence = envelope.record.sequence;

        let expected = self.expected[origin];
        if sequence < expected || self.held[origin].contains_key(&sequence) {
            return Admission::Duplicate;
        }
        if sequence - expected >= HOLD_WINDOW {
            return Admission::OutOfWindow { expected };
        }
        self.held[origin].insert(sequence, envelope);

        let mut ready = Vec::new();
        while let Some(next) = self.held[origin].remove(&self.expected[origin]) {
            ready.push(next);
            self.expected[origin] += 1;
        }

        if ready.is_empty() {
            Admission::Held {
                expected: self.expected[origin],
                held: self.held[origin].len(),
            }
        } else {
            Admission::Ready(ready)
        }
    }

    /// Next sequence number expected from `origin`.
    #[must_use]
    pub fn expected(&self, origin: Seat) -> u64 {
        self.expected[origin]
    }

    /// Number of envelopes held back for `origin`.
    #[must_use]
    pub fn held(&self, origin: Seat) -> usize {
        self.held[origin].len()
    }

    /// Sequence numbers known to be missing from `origin`.
    #[must_use]
    pub fn gap(&self, origin: Seat) -> Option<Range<u64>> {
        self.held[origin]
            .keys()
            .next()
            .map(|&first_held| self.expected[origin]..first_held)
    }
}
