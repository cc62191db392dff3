//! Turn / Game State Manager - new games, end-of-turn bookkeeping and game-over
//! detection.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use game_rules::{
    CardPools, Difficulty, EventId, GameHistory, GameId, GameOverReason, HistoryEntryId, OptionId,
    RulesConfig, Stat, WorldState, ATTRIBUTE_MAX, RELATIONSHIP_MIN,
};

use crate::effects::AppliedOption;

/// Result of a game-over check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverCheck {
    pub over: bool,
    pub reason: Option<GameOverReason>,
}

impl GameOverCheck {
    pub fn in_progress() -> Self {
        Self {
            over: false,
            reason: None,
        }
    }

    pub fn ended(reason: GameOverReason) -> Self {
        Self {
            over: true,
            reason: Some(reason),
        }
    }
}

/// Terminal stats in priority order. The first exhausted one names the ending.
const TERMINAL_STATS: [(Stat, GameOverReason); 5] = [
    (Stat::Health, GameOverReason::HealthExhausted),
    (Stat::Power, GameOverReason::PowerExhausted),
    (Stat::Wealth, GameOverReason::WealthExhausted),
    (Stat::Military, GameOverReason::MilitaryExhausted),
    (Stat::Popularity, GameOverReason::PopularityExhausted),
];

/// Orchestrates game creation and turn progression.
#[derive(Debug, Clone, Default)]
pub struct TurnManager {
    config: RulesConfig,
}

impl TurnManager {
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Create a fresh game: configured starting attributes, a random coronation
    /// age, empty pools and history, turn 1.
    ///
    /// An inverted age range collapses to its minimum.
    pub fn create_new_game<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> WorldState {
        let mut player = self
            .config
            .starting_attributes
            .for_difficulty(difficulty)
            .clamped();
        let min_age = self.config.min_start_age;
        let age = rng.gen_range(min_age..=self.config.max_start_age.max(min_age));
        player.set(Stat::Age, age);

        let state = WorldState {
            game_id: GameId::new(),
            difficulty,
            player,
            characters: Vec::new(),
            factions: Default::default(),
            pools: CardPools::new(),
            history: GameHistory::new(),
            turn: 1,
            current_event: None,
            court_stability: court_stability(&[]),
            game_over: false,
            game_over_reason: None,
        };

        tracing::info!(game = %state.game_id, ?difficulty, age, "Created new game");
        state
    }

    /// [`create_new_game`](Self::create_new_game) with the thread-local generator.
    pub fn new_game(&self, difficulty: Difficulty) -> WorldState {
        self.create_new_game(difficulty, &mut rand::thread_rng())
    }

    /// Check the game-over predicates in fixed priority order: health, power,
    /// wealth, military, popularity, age, then content exhaustion.
    pub fn check_game_over(&self, state: &WorldState) -> GameOverCheck {
        if let Some((_, reason)) = TERMINAL_STATS
            .iter()
            .find(|(stat, _)| state.player.get(*stat) <= 0)
        {
            return GameOverCheck::ended(*reason);
        }

        if state.player.age > self.config.max_age {
            return GameOverCheck::ended(GameOverReason::OldAge);
        }

        if state.pools.active.is_empty() && state.pools.pending.is_empty() {
            return GameOverCheck::ended(GameOverReason::Retirement);
        }

        GameOverCheck::in_progress()
    }

    /// Record a game-over result on the state. Once set, the flag is never cleared.
    pub fn conclude(&self, state: &mut WorldState, check: GameOverCheck) {
        if check.over && !state.game_over {
            state.game_over = true;
            state.game_over_reason = check.reason;
            tracing::info!(
                game = %state.game_id,
                turn = state.turn,
                reason = ?check.reason,
                "Game over"
            );
        }
    }

    /// Advance age and turn by one, clear the current event and refresh
    /// derived aggregates.
    ///
    /// Permitted on finished games; the session layer decides whether to call it.
    pub fn process_turn_end(&self, state: &mut WorldState) {
        state.player.apply_delta(Stat::Age, 1);
        state.turn += 1;
        state.current_event = None;
        self.refresh_derived(state);
    }

    /// Recompute aggregates derived from the roster.
    pub fn refresh_derived(&self, state: &mut WorldState) {
        let favors: Vec<i32> = state.living_characters().map(|c| c.favor).collect();
        state.court_stability = court_stability(&favors);
    }

    /// Append the history entry for a resolved event, stamped with the current time.
    pub fn record_game_event(
        &self,
        state: &mut WorldState,
        event_id: EventId,
        option_id: OptionId,
        applied: AppliedOption,
    ) -> HistoryEntryId {
        self.record_game_event_at(state, event_id, option_id, applied, Utc::now())
    }

    /// Append the history entry for a resolved event with an explicit timestamp.
    ///
    /// This is the only place history is written.
    pub fn record_game_event_at(
        &self,
        state: &mut WorldState,
        event_id: EventId,
        option_id: OptionId,
        applied: AppliedOption,
        timestamp: DateTime<Utc>,
    ) -> HistoryEntryId {
        let turn = state.turn;
        state.history.record(
            event_id,
            option_id,
            turn,
            applied.changes,
            applied.discoveries,
            timestamp,
        )
    }
}

/// Mean favor of the given characters, mapped from `[-100, 100]` to `[0, 100]`.
/// An empty court is neutral.
pub fn court_stability(favors: &[i32]) -> i32 {
    if favors.is_empty() {
        return ATTRIBUTE_MAX / 2;
    }
    let sum: i64 = favors.iter().map(|f| i64::from(*f)).sum();
    let mean = sum / favors.len() as i64;
    ((mean - i64::from(RELATIONSHIP_MIN)) / 2) as i32
}
