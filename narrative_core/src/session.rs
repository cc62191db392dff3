//! Game session - drives the per-turn flow over one owned world state.
//!
//! A turn is: reconcile pending cards, draw from the active pool, resolve the
//! player's choice (apply, record, discard), then end the turn. The session
//! rejects calls once the game is over; the primitives it composes do not.

use rand::Rng;

use game_rules::{
    Character, Difficulty, EventCard, HistoryEntryId, OptionId, RulesConfig, WorldState,
};

use crate::card_pool::{CardPoolManager, PoolStatus};
use crate::convert::{convert_character, convert_event, ConfigProvider};
use crate::effects::{apply_choice, AppliedOption};
use crate::error::EngineError;
use crate::turn::{GameOverCheck, TurnManager};

/// Characters and event cards converted from a provider.
#[derive(Debug, Clone, Default)]
pub struct GameContent {
    pub characters: Vec<Character>,
    pub events: Vec<EventCard>,
}

/// Load every valid character and their events from a provider.
///
/// Records failing the provider's structural checks are skipped with a warning.
pub fn load_content<P: ConfigProvider + ?Sized>(
    provider: &P,
) -> Result<GameContent, EngineError> {
    let mut content = GameContent::default();

    for record in provider.load_all_characters()? {
        if !provider.is_valid_character(&record) {
            tracing::warn!(character = %record.id, "Skipping invalid character record");
            continue;
        }

        for event in provider.load_character_events(&record.id)? {
            if !provider.is_valid_event(&event) {
                tracing::warn!(
                    event = %event.id,
                    character = %record.id,
                    "Skipping invalid event record"
                );
                continue;
            }
            content.events.push(convert_event(&event, Some(&record.id))?);
        }
        content.characters.push(convert_character(&record)?);
    }

    Ok(content)
}

/// What resolving a choice did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    Resolved {
        entry: HistoryEntryId,
        applied: AppliedOption,
    },
    /// The option ID did not match the current card; nothing changed.
    Ignored,
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: WorldState,
    pools: CardPoolManager,
    turns: TurnManager,
}

impl GameSession {
    /// Start a new game from a provider's content.
    pub fn start<P: ConfigProvider + ?Sized, R: Rng + ?Sized>(
        provider: &P,
        difficulty: Difficulty,
        config: RulesConfig,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let content = load_content(provider)?;
        if content.characters.is_empty() {
            return Err(EngineError::NoCharacters);
        }

        let pools = CardPoolManager::from_config(&config);
        let turns = TurnManager::new(config);
        let mut state = turns.create_new_game(difficulty, rng);

        for character in content.characters {
            state.add_character(character);
        }
        pools.add_to_pending(&mut state, content.events);
        turns.refresh_derived(&mut state);

        Ok(Self {
            state,
            pools,
            turns,
        })
    }

    /// Resume a session from a saved state.
    pub fn from_state(state: WorldState, config: RulesConfig) -> Self {
        Self {
            pools: CardPoolManager::from_config(&config),
            turns: TurnManager::new(config),
            state,
        }
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn into_state(self) -> WorldState {
        self.state
    }

    pub fn pools(&self) -> &CardPoolManager {
        &self.pools
    }

    pub fn status(&self) -> PoolStatus {
        self.pools.status(&self.state)
    }

    pub fn is_over(&self) -> bool {
        self.state.game_over
    }

    /// Reconcile the pending pool and draw this turn's event.
    ///
    /// Drawing again before the current event is resolved returns the same card.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&EventCard, EngineError> {
        if self.state.game_over {
            return Err(EngineError::GameAlreadyOver);
        }

        if self.state.current_card().is_none() {
            self.pools.reconcile_pending(&mut self.state);
            let id = self
                .pools
                .select_next(&self.state, rng)
                .map(|card| card.id.clone())
                .ok_or(EngineError::NoEligibleEvent)?;
            self.state.current_event = Some(id);
        }

        self.state.current_card().ok_or(EngineError::NoEligibleEvent)
    }

    /// Resolve the current event with the given option.
    pub fn choose(&mut self, option_id: &OptionId) -> Result<ChoiceOutcome, EngineError> {
        if self.state.game_over {
            return Err(EngineError::GameAlreadyOver);
        }

        let card = self.state.current_card().ok_or(EngineError::NoCurrentEvent)?;
        let Some(option) = card.option(option_id).cloned() else {
            tracing::warn!(event = %card.id, option = %option_id, "Unknown option, choice ignored");
            return Ok(ChoiceOutcome::Ignored);
        };
        let event_id = card.id.clone();
        let owner = card.character.clone();

        let applied = apply_choice(&mut self.state, &option, owner.as_ref());
        let entry = self.turns.record_game_event(
            &mut self.state,
            event_id.clone(),
            option.id.clone(),
            applied.clone(),
        );
        self.pools.discard(&mut self.state, &event_id);

        Ok(ChoiceOutcome::Resolved { entry, applied })
    }

    /// Close the turn and check for game over. The terminal flag is sticky.
    pub fn end_turn(&mut self) -> GameOverCheck {
        if self.state.game_over {
            return GameOverCheck {
                over: true,
                reason: self.state.game_over_reason,
            };
        }

        self.turns.process_turn_end(&mut self.state);
        let check = self.turns.check_game_over(&self.state);
        self.turns.conclude(&mut self.state, check);
        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{CharacterRecord, EventRecord, InMemoryConfigProvider, OptionRecord};
    use game_rules::ConfigError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn provider() -> InMemoryConfigProvider {
        let event = EventRecord {
            id: "audience".to_string(),
            title: "Morning Audience".to_string(),
            options: vec![OptionRecord {
                id: "listen".to_string(),
                text: "Listen".to_string(),
                effects: Default::default(),
            }],
            ..Default::default()
        };

        InMemoryConfigProvider::new()
            .with_character(CharacterRecord {
                id: "minister".to_string(),
                name: "Minister".to_string(),
                ..Default::default()
            })
            .with_events("minister", vec![event])
    }

    #[test]
    fn test_start_without_characters_fails() {
        let result = GameSession::start(
            &InMemoryConfigProvider::new(),
            Difficulty::Normal,
            RulesConfig::default(),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(EngineError::NoCharacters)));
    }

    #[test]
    fn test_start_rejects_inverted_age_range() {
        let config = RulesConfig {
            min_start_age: 40,
            max_start_age: 20,
            ..RulesConfig::default()
        };
        let result = GameSession::start(
            &provider(),
            Difficulty::Normal,
            config,
            &mut StdRng::seed_from_u64(1),
        );
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidAgeRange { min: 40, max: 20 }))
        ));
    }

    #[test]
    fn test_start_loads_content_into_pending() {
        let session = GameSession::start(
            &provider(),
            Difficulty::Easy,
            RulesConfig::default(),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(session.status().pending_count, 1);
        assert_eq!(session.state().characters.len(), 1);
        let owner = session.state().pools.pending[0].character.as_ref().unwrap();
        assert_eq!(owner.as_str(), "minister");
    }

    #[test]
    fn test_invalid_event_records_are_skipped() {
        let provider = provider().with_events(
            "minister",
            vec![EventRecord {
                id: "broken".to_string(),
                ..Default::default()
            }],
        );
        let content = load_content(&provider).unwrap();
        assert_eq!(content.events.len(), 1);
    }

    #[test]
    fn test_draw_is_stable_until_resolved() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = GameSession::start(
            &provider(),
            Difficulty::Normal,
            RulesConfig::default(),
            &mut rng,
        )
        .unwrap();

        let first = session.draw(&mut rng).unwrap().id.clone();
        let second = session.draw(&mut rng).unwrap().id.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_choose_without_draw_fails() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = GameSession::start(
            &provider(),
            Difficulty::Normal,
            RulesConfig::default(),
            &mut rng,
        )
        .unwrap();

        assert!(matches!(
            session.choose(&OptionId::new("listen")),
            Err(EngineError::NoCurrentEvent)
        ));
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = GameSession::start(
            &provider(),
            Difficulty::Normal,
            RulesConfig::default(),
            &mut rng,
        )
        .unwrap();
        session.draw(&mut rng).unwrap();

        let outcome = session.choose(&OptionId::new("flee")).unwrap();

        assert_eq!(outcome, ChoiceOutcome::Ignored);
        assert!(session.state().history.is_empty());
        assert_eq!(session.status().active_count, 1);
    }

    #[test]
    fn test_full_turn_ends_in_retirement() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = GameSession::start(
            &provider(),
            Difficulty::Normal,
            RulesConfig::default(),
            &mut rng,
        )
        .unwrap();

        session.draw(&mut rng).unwrap();
        let outcome = session.choose(&OptionId::new("listen")).unwrap();
        assert!(matches!(outcome, ChoiceOutcome::Resolved { .. }));
        assert_eq!(session.status().discarded_count, 1);

        let check = session.end_turn();
        assert!(check.over);
        assert!(session.is_over());
        assert!(matches!(session.draw(&mut rng), Err(EngineError::GameAlreadyOver)));
        assert_eq!(session.end_turn(), check);
    }
}
