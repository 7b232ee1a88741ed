//! Turn engine.
//!
//! Phases cycle draw → main → battle → end → draw. Leaving `End` hands the
//! turn to the other seat: turn counter +1, mana grows by one (up to the
//! cap) and refills, that seat's monsters may attack again, and it draws one
//! card.

use tracing::info;

use super::engine::{DuelRules, RulesEngine};
use crate::core::seat::Seat;
use crate::core::state::{MatchState, Phase};
use crate::error::Rejection;

impl DuelRules {
    /// Apply `AdvancePhase` for `actor`.
    pub(crate) fn advance_phase(&self, state: &mut MatchState, actor: Seat) -> Result<(), Rejection> {
        if actor != state.active {
            return Err(Rejection::NotActivePlayer {
                actor,
                active: state.active,
            });
        }

        state.selection = None;
        if state.phase == Phase::End {
            self.hand_over(state)?;
        }
        state.phase = state.phase.next();
        Ok(())
    }

    fn hand_over(&self, state: &mut MatchState) -> Result<(), Rejection> {
        let incoming = state.active.opponent();
        state.active = incoming;
        state.turn += 1;

        let cap = self.config().mana_cap;
        let player = state.player_mut(incoming);
        player.max_mana = (player.max_mana + 1).min(cap);
        player.mana = player.max_mana;
        for monster in player.field.monsters.iter_mut().flatten() {
            monster.can_attack = true;
        }

        self.draw_card(state, incoming)?;

        info!(turn = state.turn, seat = %incoming, "turn handed over");
        Ok(())
    }
}
