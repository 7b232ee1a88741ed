//! One peer's view of a replicated match.
//!
//! A `MatchSession` owns the local replica and a transport. Both peers run
//! the same rules over the same command stream:
//!
//! - `submit` validates a local command, commits it, then broadcasts it
//! - `receive` / `pump` order incoming envelopes per origin and apply them
//!   through the same `RulesEngine::apply` as local commands
//!
//! Only the active seat may originate replicated commands. A local submit
//! outside our turn is refused; a remote envelope whose origin is not the
//! active seat is refused too. This single-writer rule is what keeps the
//! replicas from racing each other.

use tracing::{debug, info, warn};

use super::inbox::{Admission, Inbox};
use super::transport::Transport;
use super::wire::Envelope;
use crate::core::command::{Command, CommandRecord};
use crate::core::ids::InstanceId;
use crate::core::seat::Seat;
use crate::core::state::{CombatEvent, MatchState};
use crate::error::{Rejection, SessionError, WireError};
use crate::rules::{DuelRules, RulesEngine};

/// Outcome of a local submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitted {
    /// Combat event, for attacks.
    pub event: Option<CombatEvent>,
    /// Sequence number the command was broadcast with. `None` for
    /// local-only commands.
    pub sequence: Option<u64>,
}

/// What processing received frames did to the replica.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiveReport {
    /// Remote commands applied, in order.
    pub applied: Vec<CommandRecord>,
    /// Remote commands the local rules refused.
    pub rejected: Vec<(CommandRecord, Rejection)>,
    /// Combat events from applied attacks.
    pub events: Vec<CombatEvent>,
    /// Frames already seen.
    pub duplicates: usize,
    /// Frames held back waiting for a missing predecessor.
    pub held: usize,
    /// Frames for another room or echoing our own seat.
    pub ignored: usize,
    /// Frames that failed to decode, or whose sequence is too far ahead
    /// to hold.
    pub malformed: usize,
    /// Applied commands after which our checksum differed from the sender's.
    pub diverged: usize,
}

impl ReceiveReport {
    fn merge(&mut self, other: ReceiveReport) {
        self.applied.extend(other.applied);
        self.rejected.extend(other.rejected);
        self.events.extend(other.events);
        self.duplicates += other.duplicates;
        self.held = other.held;
        self.ignored += other.ignored;
        self.malformed += other.malformed;
        self.diverged += other.diverged;
    }
}

/// One peer's replica of a match, plus the transport it talks over.
///
/// Local commands go through `submit`, remote frames through `receive` or
/// `pump`. Both paths end in the same `RulesEngine::apply`.
pub struct MatchSession<T: Transport> {
    rules: DuelRules,
    state: MatchState,
    local: Seat,
    room: String,
    transport: T,
    next_sequence: u64,
    inbox: Inbox,
    history: Vec<CommandRecord>,
}

impl<T: Transport> MatchSession<T> {
    /// Start a session for `local` on `room` from an opening state.
    pub fn new(rules: DuelRules, mut state: MatchState, local: Seat, room: impl Into<String>, transport: T) -> Self {
        let room = room.into();
        state.viewer = Some(local);
        state.room = Some(room.clone());
        info!(room = %room, seat = %local, "joined match");

        Self {
            rules,
            state,
            local,
            room,
            transport,
            next_sequence: 1,
            inbox: Inbox::new(),
            history: Vec::new(),
        }
    }

    /// The local replica.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn rules(&self) -> &DuelRules {
        &self.rules
    }

    #[must_use]
    pub fn local_seat(&self) -> Seat {
        self.local
    }

    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Whether the local seat may originate commands right now.
    #[must_use]
    pub fn is_local_turn(&self) -> bool {
        !self.state.is_over() && self.state.active == self.local
    }

    /// Replicated commands applied so far, local and remote, in apply order.
    #[must_use]
    pub fn history(&self) -> &[CommandRecord] {
        &self.history
    }

    /// Reorder buffer for remote frames.
    #[must_use]
    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Commands the local seat may submit right now.
    #[must_use]
    pub fn legal_commands(&self) -> Vec<Command> {
        self.rules.legal_commands(&self.state, self.local)
    }

    /// Validate and apply a local command, then broadcast it.
    ///
    /// A broadcast failure is reported as `SessionError::Broadcast` with the
    /// command already committed locally. Nothing is retried.
    pub fn submit(&mut self, command: Command) -> Result<Submitted, SessionError> {
        if !command.is_replicated() {
            let applied = self.rules.apply(&self.state, &command)?;
            self.state = applied.state;
            return Ok(Submitted {
                event: applied.event,
                sequence: None,
            });
        }

        if self.state.active != self.local {
            return Err(Rejection::NotLocalTurn {
                local: self.local,
                active: self.state.active,
            }
            .into());
        }

        let applied = self.rules.apply(&self.state, &command)?;
        self.state = applied.state;

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let record = CommandRecord::new(self.local, command, sequence);
        self.history.push(record.clone());

        let frame = Envelope::new(self.room.clone(), record, self.state.checksum()).encode()?;
        if let Err(err) = self.transport.publish(frame) {
            warn!(room = %self.room, sequence, error = %err, "broadcast failed; replicas will diverge");
            return Err(err.into());
        }

        Ok(Submitted {
            event: applied.event,
            sequence: Some(sequence),
        })
    }

    /// Set or clear the pending attacker selection. Never broadcast.
    pub fn select_attacker(&mut self, instance: Option<InstanceId>) -> Result<(), Rejection> {
        let applied = self
            .rules
            .apply(&self.state, &Command::SelectAttacker { instance })?;
        self.state = applied.state;
        Ok(())
    }

    /// Process one received frame.
    pub fn receive(&mut self, frame: &[u8]) -> Result<ReceiveReport, WireError> {
        let envelope = Envelope::decode(frame)?;
        let mut report = ReceiveReport::default();

        if envelope.room != self.room {
            debug!(room = %envelope.room, "ignoring frame for another room");
            report.ignored += 1;
            return Ok(report);
        }
        if envelope.record.origin == self.local {
            warn!(
                seat = %self.local,
                sequence = envelope.record.sequence,
                "received a frame from our own seat; both peers may hold the same seat"
            );
            report.ignored += 1;
            return Ok(report);
        }

        let origin = envelope.record.origin;
        match self.inbox.admit(envelope) {
            Admission::Ready(batch) => {
                for envelope in batch {
                    self.apply_remote(envelope, &mut report);
                }
            }
            Admission::Duplicate => report.duplicates += 1,
            Admission::Held { expected, held } => {
                debug!(origin = %origin, expected, held, "holding frame until the gap fills");
            }
            Admission::OutOfWindow { expected } => {
                warn!(origin = %origin, expected, "dropping frame beyond the hold-back window");
                report.malformed += 1;
            }
        }
        report.held = self.inbox.held(origin);
        Ok(report)
    }

    /// Drain the transport, processing every frame it has.
    pub fn pump(&mut self) -> ReceiveReport {
        let mut report = ReceiveReport::default();
        while let Some(frame) = self.transport.try_recv() {
            match self.receive(&frame) {
                Ok(received) => report.merge(received),
                Err(err) => {
                    warn!(error = %err, "dropping malformed frame");
                    report.malformed += 1;
                }
            }
        }
        report
    }

    fn apply_remote(&mut self, envelope: Envelope, report: &mut ReceiveReport) {
        let Envelope { record, checksum, .. } = envelope;

        if record.origin != self.state.active {
            let rejection = Rejection::OriginNotActive {
                origin: record.origin,
                active: self.state.active,
            };
            warn!(sequence = record.sequence, %rejection, "refused remote command");
            report.rejected.push((record, rejection));
            return;
        }

        match self.rules.apply(&self.state, &record.command) {
            Ok(applied) => {
                self.state = applied.state;
                if let Some(event) = applied.event {
                    report.events.push(event);
                }
                if self.state.checksum() != checksum {
                    warn!(
                        origin = %record.origin,
                        sequence = record.sequence,
                        "replica checksum differs from sender"
                    );
                    report.diverged += 1;
                }
                self.history.push(record.clone());
                report.applied.push(record);
            }
            Err(rejection) => {
                warn!(
                    origin = %record.origin,
                    sequence = record.sequence,
                    %rejection,
                    "refused remote command"
                );
                report.rejected.push((record, rejection));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, Element};
    use crate::core::config::MatchConfig;
    use crate::core::state::Phase;
    use crate::replication::transport::{MemoryBus, MemoryEndpoint};
    use crate::rules::MatchBuilder;

    fn rules() -> DuelRules {
        let catalog = CardCatalog::from_definitions([
            CardDefinition::monster("imp", "Imp", Element::Dark, 1, 500, 300),
            CardDefinition::monster("ogre", "Ogre", Element::Fire, 1, 2000, 1800),
        ])
        .unwrap();
        DuelRules::new(Arc::new(catalog), MatchConfig::default().seed(11))
    }

    fn pair() -> (MemoryBus, MatchSession<MemoryEndpoint>, MatchSession<MemoryEndpoint>) {
        let rules = rules();
        let opening = MatchBuilder::new(&rules).build().unwrap();
        let bus = MemoryBus::new();
        let first = MatchSession::new(rules.clone(), opening.clone(), Seat::First, "duel", bus.join("duel"));
        let second = MatchSession::new(rules, opening, Seat::Second, "duel", bus.join("duel"));
        (bus, first, second)
    }

    #[test]
    fn test_submit_replicates() {
        let (_bus, mut first, mut second) = pair();

        let submitted = first.submit(Command::AdvancePhase { actor: Seat::First }).unwrap();
        assert_eq!(submitted.sequence, Some(1));

        let report = second.pump();
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.diverged, 0);
        assert_eq!(second.state().phase, Phase::Main);
        assert!(first.state().converged_with(second.state()));
    }

    #[test]
    fn test_submit_outside_turn_refused() {
        let (bus, _first, mut second) = pair();

        let err = second.submit(Command::AdvancePhase { actor: Seat::Second }).unwrap_err();

        assert!(matches!(
            err,
            SessionError::Rejected(Rejection::NotLocalTurn {
                local: Seat::Second,
                active: Seat::First
            })
        ));
        assert_eq!(bus.in_flight(), 0);
    }

    #[test]
    fn test_rejected_submit_not_broadcast() {
        let (bus, mut first, _second) = pair();
        let before = first.state().clone();

        let err = first.submit(Command::AdvancePhase { actor: Seat::Second }).unwrap_err();

        assert!(matches!(err, SessionError::Rejected(Rejection::NotActivePlayer { .. })));
        assert_eq!(first.state(), &before);
        assert_eq!(bus.in_flight(), 0);
    }

    #[test]
    fn test_selection_stays_local() {
        let (bus, mut first, _second) = pair();
        let id = first.state().player(Seat::First).hand[0].instance_id;

        first.select_attacker(Some(id)).unwrap();

        assert_eq!(first.state().selection.map(|s| s.attacker), Some(id));
        assert_eq!(bus.in_flight(), 0);
    }

    #[test]
    fn test_remote_origin_must_be_active() {
        let (_bus, mut first, _second) = pair();
        let envelope = Envelope::new(
            "duel",
            CommandRecord::new(Seat::Second, Command::AdvancePhase { actor: Seat::Second }, 1),
            0,
        );

        let report = first.receive(&envelope.encode().unwrap()).unwrap();

        assert!(report.applied.is_empty());
        assert!(matches!(
            report.rejected[0].1,
            Rejection::OriginNotActive {
                origin: Seat::Second,
                active: Seat::First
            }
        ));
    }

    #[test]
    fn test_foreign_room_and_own_seat_ignored() {
        let (_bus, mut first, _second) = pair();
        let foreign = Envelope::new(
            "elsewhere",
            CommandRecord::new(Seat::Second, Command::AdvancePhase { actor: Seat::Second }, 1),
            0,
        );
        let echo = Envelope::new(
            "duel",
            CommandRecord::new(Seat::First, Command::AdvancePhase { actor: Seat::First }, 1),
            0,
        );

        assert_eq!(first.receive(&foreign.encode().unwrap()).unwrap().ignored, 1);
        assert_eq!(first.receive(&echo.encode().unwrap()).unwrap().ignored, 1);
        assert_eq!(first.state().phase, Phase::Draw);
    }

    #[test]
    fn test_broadcast_failure_keeps_local_commit() {
        let (_bus, mut first, second) = pair();
        first.transport_mut().close();

        let err = first.submit(Command::AdvancePhase { actor: Seat::First }).unwrap_err();

        assert!(matches!(err, SessionError::Broadcast(_)));
        assert_eq!(first.state().phase, Phase::Main);
        assert_eq!(second.state().phase, Phase::Draw);
    }

    #[test]
    fn test_malformed_frame_counted() {
        let bus = MemoryBus::new();
        let mut rogue = bus.join("duel");
        let rules = rules();
        let opening = MatchBuilder::new(&rules).build().unwrap();
        let mut session = MatchSession::new(rules, opening, Seat::Second, "duel", bus.join("duel"));

        rogue.publish(vec![0xFF, 0x01]).unwrap();

        assert_eq!(session.pump().malformed, 1);
    }
}
