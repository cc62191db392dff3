//! Condition Evaluator - decides whether a condition set holds for a world state.
//!
//! Every check in a [`ConditionSet`] is ANDed. Evaluation has no side effects,
//! so checks short-circuit on the first failure.

use game_rules::{
    AttributeRequirement, AttributeVector, CharacterCondition, CharacterId, ConditionSet,
    ConditionTarget, EventCard, FactionRequirement, RelationshipCondition, WorldState,
};

/// Evaluate an optional condition set. Absent conditions always hold.
///
/// `self_id` names the character that owns the card; a self-targeted set
/// fails when that character is not on the active roster.
pub fn evaluate(
    conditions: Option<&ConditionSet>,
    state: &WorldState,
    self_id: Option<&CharacterId>,
) -> bool {
    match conditions {
        None => true,
        Some(conditions) => evaluate_set(conditions, state, self_id),
    }
}

/// Evaluate a present condition set.
pub fn evaluate_set(
    conditions: &ConditionSet,
    state: &WorldState,
    self_id: Option<&CharacterId>,
) -> bool {
    let subject = match conditions.target {
        ConditionTarget::Player => &state.player,
        ConditionTarget::SelfCharacter => {
            match self_id.and_then(|id| state.get_active_character(id)) {
                Some(character) => &character.attributes,
                None => return false,
            }
        }
    };

    requirements_hold(&conditions.attributes, subject)
        && conditions
            .required_events
            .iter()
            .all(|id| state.history.contains_event(id))
        && !conditions
            .excluded_events
            .iter()
            .any(|id| state.history.contains_event(id))
        && conditions.min_turn.map_or(true, |min| state.turn >= min)
        && conditions.max_turn.map_or(true, |max| state.turn <= max)
        && conditions
            .characters
            .iter()
            .all(|c| character_condition_holds(c, state))
        && conditions
            .relationships
            .iter()
            .all(|r| relationship_condition_holds(r, state))
        && conditions
            .factions
            .iter()
            .all(|f| faction_requirement_holds(f, state))
}

/// Whether a pending card should be activated.
pub fn should_activate(card: &EventCard, state: &WorldState) -> bool {
    evaluate(card.activation.as_ref(), state, card.character.as_ref())
}

/// Whether a pending card should be discarded before it can activate.
///
/// Absent or empty removal conditions never remove a card.
pub fn should_remove(card: &EventCard, state: &WorldState) -> bool {
    match &card.removal {
        Some(conditions) if !conditions.is_empty() => {
            evaluate_set(conditions, state, card.character.as_ref())
        }
        _ => false,
    }
}

/// Whether an active card is eligible for the current draw.
pub fn is_triggered(card: &EventCard, state: &WorldState) -> bool {
    evaluate(card.trigger.as_ref(), state, card.character.as_ref())
}

/// Check every requirement against an attribute vector.
pub fn requirements_hold(
    requirements: &[AttributeRequirement],
    attributes: &AttributeVector,
) -> bool {
    requirements
        .iter()
        .all(|r| r.comparator.holds(attributes.get(r.stat), r.value))
}

fn character_condition_holds(condition: &CharacterCondition, state: &WorldState) -> bool {
    let character = state.get_active_character(&condition.character);

    match (condition.present, character) {
        (Some(false), found) => found.is_none(),
        (_, None) => false,
        (_, Some(character)) => {
            requirements_hold(&condition.attributes, &character.attributes)
                && condition.min_favor.map_or(true, |min| character.favor >= min)
                && condition.max_favor.map_or(true, |max| character.favor <= max)
        }
    }
}

fn relationship_condition_holds(condition: &RelationshipCondition, state: &WorldState) -> bool {
    match (
        state.get_active_character(&condition.from),
        state.get_active_character(&condition.to),
    ) {
        (Some(from), Some(_)) => condition
            .comparator
            .holds(from.relationship_with(&condition.to), condition.value),
        _ => false,
    }
}

fn faction_requirement_holds(requirement: &FactionRequirement, state: &WorldState) -> bool {
    requirement
        .comparator
        .holds(state.faction_influence(&requirement.faction), requirement.value)
}
