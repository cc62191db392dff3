//! World state management - the aggregate root holding all game data.

mod history;

pub use history::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cards::EventCard;
use crate::entities::{AttributeVector, Character, CharacterId, EventId, FieldBounds, GameId};

/// Starting difficulty of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    HealthExhausted,
    PowerExhausted,
    WealthExhausted,
    MilitaryExhausted,
    PopularityExhausted,
    OldAge,
    /// No pending or active cards remain.
    Retirement,
}

impl GameOverReason {
    /// Human-readable description of the ending.
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::HealthExhausted => {
                "The emperor's health has failed; the reign ends in death."
            }
            GameOverReason::PowerExhausted => {
                "The emperor's authority has collapsed; the court no longer obeys."
            }
            GameOverReason::WealthExhausted => {
                "The treasury is empty; the empire can no longer be governed."
            }
            GameOverReason::MilitaryExhausted => {
                "The army has disintegrated; the empire falls to its enemies."
            }
            GameOverReason::PopularityExhausted => {
                "The people have risen in revolt; the dynasty is overthrown."
            }
            GameOverReason::OldAge => "The emperor has died of old age after a long reign.",
            GameOverReason::Retirement => {
                "No more affairs demand attention; the emperor retires in peace."
            }
        }
    }
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Which pool a card currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    Pending,
    Active,
    Discarded,
}

/// Three disjoint, ordered pools partitioning every known card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CardPools {
    pub pending: Vec<EventCard>,
    pub active: Vec<EventCard>,
    pub discarded: Vec<EventCard>,
}

impl CardPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self, kind: PoolKind) -> &Vec<EventCard> {
        match kind {
            PoolKind::Pending => &self.pending,
            PoolKind::Active => &self.active,
            PoolKind::Discarded => &self.discarded,
        }
    }

    pub fn pool_mut(&mut self, kind: PoolKind) -> &mut Vec<EventCard> {
        match kind {
            PoolKind::Pending => &mut self.pending,
            PoolKind::Active => &mut self.active,
            PoolKind::Discarded => &mut self.discarded,
        }
    }

    /// Move the first card with the given ID from one pool to the end of another.
    ///
    /// Returns false, leaving both pools untouched, if the card is not in `from`.
    pub fn transfer(&mut self, id: &EventId, from: PoolKind, to: PoolKind) -> bool {
        let Some(index) = self.pool(from).iter().position(|c| &c.id == id) else {
            return false;
        };
        let card = self.pool_mut(from).remove(index);
        self.pool_mut(to).push(card);
        true
    }

    /// Find which pool holds a card.
    pub fn locate(&self, id: &EventId) -> Option<PoolKind> {
        [PoolKind::Pending, PoolKind::Active, PoolKind::Discarded]
            .into_iter()
            .find(|kind| self.pool(*kind).iter().any(|c| &c.id == id))
    }

    /// Total number of cards across all pools.
    pub fn total(&self) -> usize {
        self.pending.len() + self.active.len() + self.discarded.len()
    }
}

/// The complete state of a game at any point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub game_id: GameId,
    pub difficulty: Difficulty,

    /// The ruler's attributes.
    pub player: AttributeVector,

    /// Active court characters, in roster order.
    pub characters: Vec<Character>,

    /// Faction name -> influence in `[0, 100]`.
    pub factions: BTreeMap<String, i32>,

    pub pools: CardPools,
    pub history: GameHistory,

    pub turn: u32,
    /// The card drawn this turn, if any.
    pub current_event: Option<EventId>,

    /// Mean court favor mapped to `[0, 100]`, refreshed at the end of every turn.
    pub court_stability: i32,

    pub game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            game_id: GameId::new(),
            difficulty: Difficulty::default(),
            player: AttributeVector::default(),
            characters: Vec::new(),
            factions: BTreeMap::new(),
            pools: CardPools::new(),
            history: GameHistory::new(),
            turn: 1,
            current_event: None,
            court_stability: 50,
            game_over: false,
            game_over_reason: None,
        }
    }
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get character by ID.
    pub fn get_character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    /// Get a character by ID only if it is still alive. Dead characters are
    /// off the active roster for both conditions and effects.
    pub fn get_active_character(&self, id: &CharacterId) -> Option<&Character> {
        self.get_character(id).filter(|c| c.is_alive())
    }

    /// Get mutable character by ID.
    pub fn get_character_mut(&mut self, id: &CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| &c.id == id)
    }

    /// Add a character to the roster, replacing any existing one with the same ID.
    pub fn add_character(&mut self, character: Character) -> CharacterId {
        let id = character.id.clone();
        match self.get_character_mut(&id) {
            Some(existing) => *existing = character,
            None => self.characters.push(character),
        }
        id
    }

    /// Living characters in roster order.
    pub fn living_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(|c| c.is_alive())
    }

    /// Influence of a faction; unknown factions read as 0.
    pub fn faction_influence(&self, faction: &str) -> i32 {
        self.factions.get(faction).copied().unwrap_or(0)
    }

    /// Shift a faction's influence within `[0, 100]`. Returns `(before, after)`.
    pub fn adjust_faction(&mut self, faction: &str, delta: i32) -> (i32, i32) {
        let entry = self.factions.entry(faction.to_string()).or_insert(0);
        let before = *entry;
        *entry = FieldBounds::ATTRIBUTE.apply_delta(before, delta);
        (before, *entry)
    }

    /// Look up the current event card in the active pool.
    pub fn current_card(&self) -> Option<&EventCard> {
        let id = self.current_event.as_ref()?;
        self.pools.active.iter().find(|c| &c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> EventCard {
        EventCard::new(id, id)
    }

    #[test]
    fn test_new_state_defaults() {
        let state = WorldState::new();
        assert_eq!(state.turn, 1);
        assert!(!state.game_over);
        assert!(state.current_event.is_none());
        assert_eq!(state.pools.total(), 0);
    }

    #[test]
    fn test_transfer_moves_exactly_one_card() {
        let mut pools = CardPools::new();
        pools.pending = vec![card("a"), card("b")];

        assert!(pools.transfer(&EventId::new("a"), PoolKind::Pending, PoolKind::Active));
        assert_eq!(pools.locate(&EventId::new("a")), Some(PoolKind::Active));
        assert_eq!(pools.total(), 2);

        assert!(!pools.transfer(&EventId::new("a"), PoolKind::Pending, PoolKind::Discarded));
        assert_eq!(pools.total(), 2);
    }

    #[test]
    fn test_add_character_replaces_duplicate() {
        let mut state = WorldState::new();
        state.add_character(Character::new("minister", "Old Name"));
        state.add_character(Character::new("minister", "New Name"));

        assert_eq!(state.characters.len(), 1);
        assert_eq!(
            state.get_character(&CharacterId::new("minister")).unwrap().name,
            "New Name"
        );
    }

    #[test]
    fn test_active_character_excludes_the_dead() {
        let mut state = WorldState::new();
        let minister = state.add_character(Character::new("minister", "Li Si"));
        assert!(state.get_active_character(&minister).is_some());

        state.get_character_mut(&minister).unwrap().attributes.health = 0;
        assert!(state.get_active_character(&minister).is_none());
        assert!(state.get_character(&minister).is_some());
    }

    #[test]
    fn test_faction_influence_is_bounded() {
        let mut state = WorldState::new();
        assert_eq!(state.faction_influence("eunuchs"), 0);
        assert_eq!(state.adjust_faction("eunuchs", 130), (0, 100));
        assert_eq!(state.adjust_faction("eunuchs", -30), (100, 70));
    }

    #[test]
    fn test_world_state_serializes() {
        let mut state = WorldState::new();
        state.pools.active.push(card("a"));
        state.game_over_reason = Some(GameOverReason::OldAge);

        let json = serde_json::to_string(&state).unwrap();
        let restored: WorldState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.pools, state.pools);
        assert_eq!(restored.game_over_reason, Some(GameOverReason::OldAge));
    }
}
