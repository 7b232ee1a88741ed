//! Headless two-peer match driver.
//!
//! `Simulation` runs both seats of one match in a single process. Each seat
//! has its own `MatchSession`, and the sessions only talk through a
//! `MemoryBus`. A seeded bot plays whichever seat is active.
//!
//! Frames are delivered to the waiting peer once per turn, at the handover.
//! Until then they pile up on the bus, so with `shuffle` set a whole turn's
//! worth of frames reaches the follower out of order and the inbox has to
//! put it back together.

use tracing::{debug, info, warn};

use crate::core::command::Command;
use crate::core::rng::GameRng;
use crate::core::seat::{Seat, SeatMap};
use crate::core::state::MatchState;
use crate::error::SessionError;
use crate::replication::{MatchSession, MemoryBus, MemoryEndpoint};
use crate::rules::DuelRules;

/// Knobs for one simulated match.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Seed for bot choices and frame shuffles.
    pub seed: u64,
    pub room: String,
    /// Stop after this many turns if nobody has won.
    pub max_turns: u32,
    /// Shuffle each turn's frames before delivering them.
    pub shuffle: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            room: "sim".to_string(),
            max_turns: 60,
            shuffle: false,
        }
    }
}

/// Why a simulated match stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEnd {
    /// A seat won.
    Decided(Seat),
    /// `max_turns` ran out first.
    TurnLimit,
}

/// Outcome of a simulated match.
#[derive(Clone, Debug)]
pub struct SimResult {
    pub end: SimEnd,
    /// Turn number when the match stopped.
    pub turns: u32,
    /// Replicated commands sent by both seats.
    pub commands: usize,
    /// Handovers at which frames were delivered.
    pub deliveries: usize,
    /// Frames that `shuffle` moved out of their send position.
    pub frames_reordered: usize,
    /// Remote commands either replica refused.
    pub rejected: usize,
    /// Checksum mismatches either replica saw.
    pub diverged: usize,
    /// Both replicas agree on the authoritative state.
    pub converged: bool,
    /// First seat's final checksum.
    pub checksum: u64,
}

/// Two sessions over one bus, driven by a seeded bot.
pub struct Simulation {
    bus: MemoryBus,
    peers: SeatMap<MatchSession<MemoryEndpoint>>,
    options: SimOptions,
    bot: GameRng,
}

impl Simulation {
    /// Seat both peers on `options.room`, starting from `opening`.
    pub fn new(rules: &DuelRules, opening: &MatchState, options: SimOptions) -> Self {
        let bus = MemoryBus::new();
        let peers = SeatMap::new(|seat| {
            MatchSession::new(rules.clone(), opening.clone(), seat, options.room.as_str(), bus.join(&options.room))
        });
        let bot = GameRng::new(options.seed).for_context("bot");
        Self {
            bus,
            peers,
            options,
            bot,
        }
    }

    /// The session playing `seat`.
    #[must_use]
    pub fn peer(&self, seat: Seat) -> &MatchSession<MemoryEndpoint> {
        &self.peers[seat]
    }

    /// Play until a seat wins or the turn limit is hit.
    ///
    /// Only a failed local submit aborts the run; remote rejections and
    /// divergence are counted in the result.
    pub fn run(&mut self) -> Result<SimResult, SessionError> {
        let mut active = self.peers[Seat::First].state().active;
        let mut commands = 0;
        let mut deliveries = 0;
        let mut frames_reordered = 0;
        let mut rejected = 0;
        let mut diverged = 0;

        loop {
            let state = self.peers[active].state();
            if state.is_over() || state.turn > self.options.max_turns {
                break;
            }

            let Some(command) = choose(&self.peers[active].legal_commands(), &mut self.bot) else {
                warn!(seat = %active, "no legal command");
                break;
            };
            let submitted = self.peers[active].submit(command)?;
            commands += 1;
            if let Some(event) = submitted.event {
                debug!(
                    attacker = %event.attacker,
                    target = %event.target,
                    damage = event.damage,
                    destroyed = event.destroyed.len(),
                    "attack resolved"
                );
            }

            let state = self.peers[active].state();
            if state.active == active && !state.is_over() {
                continue;
            }

            // Handover or a decided match: the follower catches up.
            if self.options.shuffle {
                frames_reordered += self.bus.shuffle_in_flight(&mut self.bot);
            }
            deliveries += 1;
            for peer in self.peers.values_mut() {
                let report = peer.pump();
                if !report.rejected.is_empty() || report.diverged > 0 {
                    warn!(
                        seat = %peer.local_seat(),
                        room = peer.room(),
                        rejected = report.rejected.len(),
                        diverged = report.diverged,
                        "replica trouble"
                    );
                }
                rejected += report.rejected.len();
                diverged += report.diverged;
            }
            active = self.peers[active].state().active;
        }

        let first = self.peers[Seat::First].state();
        let second = self.peers[Seat::Second].state();
        let result = SimResult {
            end: first.winner.map_or(SimEnd::TurnLimit, SimEnd::Decided),
            turns: first.turn,
            commands,
            deliveries,
            frames_reordered,
            rejected,
            diverged,
            converged: first.converged_with(second) && first.checksum() == second.checksum(),
            checksum: first.checksum(),
        };
        info!(
            end = ?result.end,
            turns = result.turns,
            commands = result.commands,
            reordered = result.frames_reordered,
            converged = result.converged,
            "simulation finished"
        );
        Ok(result)
    }
}

/// Prefer playing and attacking over passing; pick among them at random.
fn choose(legal: &[Command], rng: &mut GameRng) -> Option<Command> {
    let actions: Vec<&Command> = legal
        .iter()
        .filter(|c| !matches!(c, Command::AdvancePhase { .. }))
        .collect();
    match rng.choose(&actions) {
        Some(command) => Some((*command).clone()),
        None => legal.last().cloned(),
    }
}
