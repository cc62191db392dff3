//! Card Pool Manager - the pending → active → discarded lifecycle and the
//! weighted draw.
//!
//! The three pools always partition every known card: transfers move a card,
//! never copy or drop it. Only [`CardPoolManager::add_to_pending`] grows the
//! total.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use game_rules::{EventCard, EventId, PoolKind, RulesConfig, WorldState};

use crate::conditions::{is_triggered, should_activate, should_remove};
use crate::weighting::WeightCalculator;

/// Counts of each pool. `total_events` is always the sum of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub pending_count: usize,
    pub active_count: usize,
    pub discarded_count: usize,
    pub total_events: usize,
}

/// What a reconciliation pass moved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub activated: Vec<EventId>,
    pub removed: Vec<EventId>,
}

/// Owns the card lifecycle rules.
#[derive(Debug, Clone, Default)]
pub struct CardPoolManager {
    weights: WeightCalculator,
}

impl CardPoolManager {
    pub fn new(weights: WeightCalculator) -> Self {
        Self { weights }
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(WeightCalculator::from_config(config))
    }

    pub fn weights(&self) -> &WeightCalculator {
        &self.weights
    }

    /// Single pass over the pending pool.
    ///
    /// Removal is checked before activation, so a card satisfying both is
    /// discarded. Cards activated here are not re-checked for removal.
    pub fn reconcile_pending(&self, state: &mut WorldState) -> ReconcileReport {
        let pending = std::mem::take(&mut state.pools.pending);
        let mut still_pending = Vec::with_capacity(pending.len());
        let mut activated = Vec::new();
        let mut removed = Vec::new();

        for card in pending {
            if should_remove(&card, state) {
                removed.push(card);
            } else if should_activate(&card, state) {
                activated.push(card);
            } else {
                still_pending.push(card);
            }
        }

        let report = ReconcileReport {
            activated: activated.iter().map(|c| c.id.clone()).collect(),
            removed: removed.iter().map(|c| c.id.clone()).collect(),
        };

        state.pools.pending = still_pending;
        state.pools.active.extend(activated);
        state.pools.discarded.extend(removed);

        if !report.activated.is_empty() || !report.removed.is_empty() {
            tracing::debug!(
                activated = report.activated.len(),
                removed = report.removed.len(),
                pending = state.pools.pending.len(),
                "Reconciled pending pool"
            );
        }

        report
    }

    /// Draw the next event from the active pool.
    ///
    /// Cards whose trigger conditions fail are skipped. Returns `None` when no
    /// card is eligible.
    pub fn select_next<'a, R: Rng + ?Sized>(
        &self,
        state: &'a WorldState,
        rng: &mut R,
    ) -> Option<&'a EventCard> {
        let candidates: Vec<&EventCard> = state
            .pools
            .active
            .iter()
            .filter(|card| is_triggered(card, state))
            .collect();

        if candidates.is_empty() {
            tracing::debug!(active = state.pools.active.len(), "No eligible event");
            return None;
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|card| self.weights.weight(card, state))
            .collect();

        let index = roulette_index(&weights, rng)?;
        let chosen = candidates[index];
        tracing::debug!(
            event = %chosen.id,
            candidates = candidates.len(),
            "Selected event"
        );
        Some(chosen)
    }

    /// [`select_next`](Self::select_next) with the thread-local generator.
    pub fn select_next_random<'a>(&self, state: &'a WorldState) -> Option<&'a EventCard> {
        self.select_next(state, &mut rand::thread_rng())
    }

    /// Move a resolved card from active to discarded. No-op if it is not active.
    pub fn discard(&self, state: &mut WorldState, id: &EventId) -> bool {
        let moved = state
            .pools
            .transfer(id, PoolKind::Active, PoolKind::Discarded);
        if !moved {
            tracing::warn!(event = %id, "Discard requested for card not in active pool");
        }
        moved
    }

    /// Append new cards to the pending pool. Duplicate IDs are kept.
    pub fn add_to_pending(
        &self,
        state: &mut WorldState,
        cards: impl IntoIterator<Item = EventCard>,
    ) {
        let before = state.pools.pending.len();
        state.pools.pending.extend(cards);
        tracing::debug!(
            added = state.pools.pending.len() - before,
            "Added cards to pending pool"
        );
    }

    /// Move a card into the active pool without checking conditions.
    ///
    /// Looks in pending first, then discarded. Returns false if neither holds it.
    pub fn force_activate(&self, state: &mut WorldState, id: &EventId) -> bool {
        let moved = [PoolKind::Pending, PoolKind::Discarded]
            .into_iter()
            .any(|from| state.pools.transfer(id, from, PoolKind::Active));
        tracing::debug!(event = %id, moved, "Force activate");
        moved
    }

    /// Move a card into the discarded pool without checking conditions.
    ///
    /// Looks in pending first, then active. Returns false if neither holds it.
    pub fn force_remove(&self, state: &mut WorldState, id: &EventId) -> bool {
        let moved = [PoolKind::Pending, PoolKind::Active]
            .into_iter()
            .any(|from| state.pools.transfer(id, from, PoolKind::Discarded));
        tracing::debug!(event = %id, moved, "Force remove");
        moved
    }

    /// Pool counts.
    pub fn status(&self, state: &WorldState) -> PoolStatus {
        let pools = &state.pools;
        PoolStatus {
            pending_count: pools.pending.len(),
            active_count: pools.active.len(),
            discarded_count: pools.discarded.len(),
            total_events: pools.total(),
        }
    }
}

/// Roulette-wheel selection over non-negative weights.
///
/// Draws `r` uniformly from `[0, total)` and subtracts weights in order until
/// the remainder is `<= 0`; the candidate that brings it there is chosen. With
/// a total of exactly zero every candidate is equally likely.
pub fn roulette_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        let indices: Vec<usize> = (0..weights.len()).collect();
        return indices.choose(rng).copied();
    }

    roulette_pick(weights, rng.gen_range(0.0..total))
}

/// Walk the wheel with a fixed draw `r` in `[0, total)`.
///
/// A remainder of exactly zero selects the candidate that reached it.
/// Zero-weight candidates occupy no slice of the wheel and are never chosen.
pub fn roulette_pick(weights: &[f64], r: f64) -> Option<usize> {
    let mut remaining = r;
    for (index, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(index);
        }
    }

    // Rounding can leave a sliver of remainder; fall back to the last weighted card
    weights.iter().rposition(|w| *w > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_rules::{AttributeRequirement, ConditionSet, Stat};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: &str) -> EventCard {
        EventCard::new(id, id)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn assert_partition(state: &WorldState) {
        let status = CardPoolManager::default().status(state);
        assert_eq!(
            status.pending_count + status.active_count + status.discarded_count,
            status.total_events
        );
    }

    #[test]
    fn test_reconcile_activates_removes_and_keeps() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        state.player.power = 50;

        let rich_only =
            ConditionSet::new().with_attribute(AttributeRequirement::min(Stat::Wealth, 90));
        let strong = ConditionSet::new().with_attribute(AttributeRequirement::min(Stat::Power, 40));

        manager.add_to_pending(
            &mut state,
            vec![
                card("free"),
                card("waiting").with_activation(rich_only),
                card("doomed").with_removal(strong.clone()),
                card("both").with_activation(strong.clone()).with_removal(strong),
            ],
        );

        let report = manager.reconcile_pending(&mut state);

        assert_eq!(report.activated, vec![EventId::new("free")]);
        assert_eq!(
            report.removed,
            vec![EventId::new("doomed"), EventId::new("both")]
        );
        assert_eq!(state.pools.locate(&EventId::new("waiting")), Some(PoolKind::Pending));
        assert_eq!(state.pools.locate(&EventId::new("both")), Some(PoolKind::Discarded));
        assert_partition(&state);
    }

    #[test]
    fn test_reconcile_preserves_pending_order() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        let never = ConditionSet::new().requiring_event("never");
        manager.add_to_pending(
            &mut state,
            vec![
                card("c").with_activation(never.clone()),
                card("a"),
                card("b").with_activation(never),
            ],
        );

        manager.reconcile_pending(&mut state);

        let pending: Vec<_> = state.pools.pending.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(pending, vec!["c", "b"]);
    }

    #[test]
    fn test_select_next_respects_trigger() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        state.player.health = 10;

        let healthy =
            ConditionSet::new().with_attribute(AttributeRequirement::min(Stat::Health, 50));
        state.pools.active = vec![card("blocked").with_trigger(healthy), card("open")];

        let mut rng = rng();
        for _ in 0..50 {
            let drawn = manager.select_next(&state, &mut rng).unwrap();
            assert_eq!(drawn.id.as_str(), "open");
        }
    }

    #[test]
    fn test_select_next_empty_returns_none() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        assert!(manager.select_next(&state, &mut rng()).is_none());

        let never = ConditionSet::new().requiring_event("never");
        state.pools.active = vec![card("a").with_trigger(never)];
        assert!(manager.select_next(&state, &mut rng()).is_none());
        assert!(manager.select_next_random(&state).is_none());
    }

    #[test]
    fn test_zero_weight_falls_back_to_uniform() {
        let manager = CardPoolManager::new(WeightCalculator::new(0.0));
        let mut state = WorldState::new();
        state.pools.active = vec![card("a"), card("b")];

        let mut rng = rng();
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..200 {
            match manager.select_next(&state, &mut rng).map(|c| c.id.as_str()) {
                Some("a") => seen_a = true,
                Some("b") => seen_b = true,
                other => panic!("unexpected draw {:?}", other),
            }
        }
        assert!(seen_a && seen_b);
    }

    #[test]
    fn test_weighted_draw_distribution() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        state.pools.active = vec![card("a").with_weight(1.0), card("b").with_weight(3.0)];

        let mut rng = rng();
        let draws = 10_000;
        let b_count = (0..draws)
            .filter(|_| manager.select_next(&state, &mut rng).map(|c| c.id.as_str()) == Some("b"))
            .count();

        let ratio = b_count as f64 / draws as f64;
        assert!((ratio - 0.75).abs() < 0.03, "cardB drawn {:.3} of the time", ratio);
    }

    #[test]
    fn test_roulette_skips_zero_weights() {
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(roulette_index(&[0.0, 2.0, 0.0], &mut rng), Some(1));
        }
        assert_eq!(roulette_index(&[], &mut rng), None);
    }

    #[test]
    fn test_roulette_exact_zero_remainder_keeps_current() {
        assert_eq!(roulette_pick(&[1.0, 1.0], 1.0), Some(0));
        assert_eq!(roulette_pick(&[1.0, 3.0], 1.0), Some(0));
        assert_eq!(roulette_pick(&[1.0, 1.0], 1.5), Some(1));
        assert_eq!(roulette_pick(&[0.0, 2.0], 0.0), Some(1));
        assert_eq!(roulette_pick(&[2.0, 0.0], 2.0), Some(0));
    }

    #[test]
    fn test_discard_moves_active_card() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        state.pools.active = vec![card("a"), card("b")];

        assert!(manager.discard(&mut state, &EventId::new("a")));
        assert_eq!(state.pools.locate(&EventId::new("a")), Some(PoolKind::Discarded));

        // Absent cards are a no-op
        assert!(!manager.discard(&mut state, &EventId::new("zzz")));
        assert!(!manager.discard(&mut state, &EventId::new("a")));
        assert_eq!(manager.status(&state).total_events, 2);
        assert_partition(&state);
    }

    #[test]
    fn test_add_to_pending_keeps_duplicates() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        manager.add_to_pending(&mut state, vec![card("a"), card("a")]);

        let status = manager.status(&state);
        assert_eq!(status.pending_count, 2);
        assert_eq!(status.total_events, 2);
    }

    #[test]
    fn test_force_activate_and_remove() {
        let manager = CardPoolManager::default();
        let mut state = WorldState::new();
        let locked = ConditionSet::new().requiring_event("never");
        manager.add_to_pending(&mut state, vec![card("a").with_activation(locked), card("b")]);

        assert!(manager.force_activate(&mut state, &EventId::new("a")));
        assert_eq!(state.pools.locate(&EventId::new("a")), Some(PoolKind::Active));

        assert!(manager.force_remove(&mut state, &EventId::new("a")));
        assert!(manager.force_remove(&mut state, &EventId::new("b")));
        assert_eq!(manager.status(&state).discarded_count, 2);

        // Discarded cards can be forced back in
        assert!(manager.force_activate(&mut state, &EventId::new("b")));
        assert!(!manager.force_activate(&mut state, &EventId::new("missing")));
        assert_partition(&state);
    }
}
