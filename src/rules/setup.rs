//! Match initialization.
//!
//! Builds the opening `MatchState`: decks assigned and shuffled, opening
//! hands dealt, draw phase of turn 1 with `Seat::First` active.
//!
//! Shuffles come from the shared `MatchConfig::seed`, one RNG stream per
//! seat, so two peers building from the same inputs get identical states.

use tracing::info;

use super::engine::{DuelRules, RulesEngine};
use crate::cards::DeckList;
use crate::core::rng::GameRng;
use crate::core::seat::Seat;
use crate::core::state::MatchState;
use crate::error::CatalogError;

/// Builder for the opening state of a match.
///
/// Defaults: names "Player 1" / "Player 2", standard decks for both seats,
/// no room.
pub struct MatchBuilder<'a> {
    rules: &'a DuelRules,
    names: [String; 2],
    custom_deck: Option<(Seat, DeckList)>,
    room: Option<String>,
}

impl<'a> MatchBuilder<'a> {
    /// Start a builder over `rules`' catalog and config.
    pub fn new(rules: &'a DuelRules) -> Self {
        Self {
            rules,
            names: ["Player 1".to_string(), "Player 2".to_string()],
            custom_deck: None,
            room: None,
        }
    }

    pub fn names(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.names = [first.into(), second.into()];
        self
    }

    /// Use `deck` for `seat` instead of the standard deck.
    pub fn custom_deck(mut self, seat: Seat, deck: DeckList) -> Self {
        self.custom_deck = Some((seat, deck));
        self
    }

    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Build the opening state.
    ///
    /// Fails if the config breaks the mana or hit point bounds, or if the
    /// custom deck is too large or names a card the catalog does not have.
    /// An empty custom deck is ignored.
    pub fn build(self) -> Result<MatchState, CatalogError> {
        let config = self.rules.config();
        let catalog = self.rules.catalog();
        config.validate()?;

        let mut state = MatchState::new([self.names[0].as_str(), self.names[1].as_str()], config);
        state.room = self.room;

        let standard = DeckList::standard(catalog, config.copies_per_card);
        let rng = GameRng::new(config.seed);

        for seat in Seat::ALL {
            let deck = match &self.custom_deck {
                Some((custom_seat, deck)) if *custom_seat == seat && !deck.is_empty() => {
                    deck.validate(catalog, config.max_deck_size)?;
                    deck.clone()
                }
                _ => standard.clone(),
            };

            let mut cards = deck.into_cards();
            rng.deck_stream(seat).shuffle(&mut cards);
            state.player_mut(seat).deck = cards.into_iter().collect();
        }

        for seat in Seat::ALL {
            for _ in 0..config.opening_hand {
                self.rules
                    .draw_into_hand(&mut state, seat)
                    .map_err(CatalogError::UnknownCard)?;
            }
        }

        info!(
            seed = config.seed,
            room = state.room.as_deref().unwrap_or("-"),
            "match initialized"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, Element};
    use crate::core::config::MatchConfig;
    use crate::core::state::Phase;

    fn rules(seed: u64) -> DuelRules {
        let catalog = CardCatalog::from_definitions([
            CardDefinition::monster("imp", "Imp", Element::Dark, 1, 500, 300),
            CardDefinition::monster("ogre", "Ogre", Element::Fire, 4, 2000, 1800),
            CardDefinition::spell("spark", "Spark", Element::Fire, 1),
        ])
        .unwrap();
        DuelRules::new(Arc::new(catalog), MatchConfig::default().seed(seed))
    }

    #[test]
    fn test_opening_state() {
        let rules = rules(1);
        let state = MatchBuilder::new(&rules).names("Ann", "Bo").room("lobby").build().unwrap();

        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, Phase::Draw);
        assert_eq!(state.active, Seat::First);
        assert_eq!(state.room.as_deref(), Some("lobby"));
        assert_eq!(state.winner, None);

        for seat in Seat::ALL {
            let player = state.player(seat);
            assert_eq!(player.hand.len(), 5);
            assert_eq!(player.deck.len(), 12 - 5);
            assert_eq!(player.hp, 4000);
            assert_eq!(player.mana, 1);
        }
        assert_eq!(state.player(Seat::Second).name, "Bo");
    }

    #[test]
    fn test_same_seed_same_state() {
        let a = MatchBuilder::new(&rules(7)).build().unwrap();
        let b = MatchBuilder::new(&rules(7)).build().unwrap();

        assert_eq!(a, b);
        assert_eq!(a.checksum(), b.checksum());
    }

    #[test]
    fn test_instance_ids_unique() {
        let state = MatchBuilder::new(&rules(3)).build().unwrap();

        let mut ids: Vec<_> = Seat::ALL
            .iter()
            .flat_map(|&seat| state.player(seat).instance_ids().collect::<Vec<_>>())
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();

        assert_eq!(total, 10);
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_custom_deck_for_second_seat() {
        let rules = rules(5);
        let deck: DeckList = std::iter::repeat(CardId::new("ogre")).take(6).collect();

        let state = MatchBuilder::new(&rules)
            .custom_deck(Seat::Second, deck)
            .build()
            .unwrap();

        let second = state.player(Seat::Second);
        assert_eq!(second.deck.len(), 1);
        assert!(second.hand.iter().all(|c| c.card_id().as_str() == "ogre"));
        assert_eq!(state.player(Seat::First).deck.len(), 7);
    }

    #[test]
    fn test_custom_deck_unknown_card_fails() {
        let rules = rules(5);
        let deck = DeckList::new(vec![CardId::new("imp"), CardId::new("phantom")]);

        let err = MatchBuilder::new(&rules).custom_deck(Seat::First, deck).build().unwrap_err();

        assert!(matches!(err, CatalogError::UnknownCard(id) if id.as_str() == "phantom"));
    }

    #[test]
    fn test_custom_deck_too_large_fails() {
        let rules = rules(5);
        let deck: DeckList = std::iter::repeat(CardId::new("imp")).take(21).collect();

        let err = MatchBuilder::new(&rules).custom_deck(Seat::First, deck).build().unwrap_err();

        assert!(matches!(err, CatalogError::DeckTooLarge { .. }));
    }

    #[test]
    fn test_short_custom_deck_deals_what_it_has() {
        let rules = rules(5);
        let deck = DeckList::new(vec![CardId::new("imp"), CardId::new("spark")]);

        let state = MatchBuilder::new(&rules).custom_deck(Seat::First, deck).build().unwrap();

        assert_eq!(state.player(Seat::First).hand.len(), 2);
        assert!(state.player(Seat::First).deck.is_empty());
    }

    #[test]
    fn test_mana_cap_above_ceiling_fails() {
        let catalog = CardCatalog::from_definitions([CardDefinition::spell("spark", "Spark", Element::Fire, 1)]).unwrap();
        let rules = DuelRules::new(Arc::new(catalog), MatchConfig::default().mana(1, 12));

        let err = MatchBuilder::new(&rules).build().unwrap_err();

        assert!(matches!(err, CatalogError::InvalidConfig(_)));
    }
}
