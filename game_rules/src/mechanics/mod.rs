//! Game mechanics: condition sets, comparators and requirement triples.

use serde::{Deserialize, Serialize};

use crate::entities::{CharacterId, EventId, Stat};

/// Direction of a numeric requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    /// Fails when the actual value is strictly below the bound.
    Min,
    /// Fails when the actual value is strictly above the bound.
    Max,
    /// Requires an exact match.
    Eq,
}

impl Comparator {
    /// Whether `actual` satisfies this comparator against `bound`.
    pub fn holds(&self, actual: i32, bound: i32) -> bool {
        match self {
            Comparator::Min => actual >= bound,
            Comparator::Max => actual <= bound,
            Comparator::Eq => actual == bound,
        }
    }
}

/// A single `{attribute, comparator, value}` requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRequirement {
    pub stat: Stat,
    pub comparator: Comparator,
    pub value: i32,
}

impl AttributeRequirement {
    pub fn min(stat: Stat, value: i32) -> Self {
        Self {
            stat,
            comparator: Comparator::Min,
            value,
        }
    }

    pub fn max(stat: Stat, value: i32) -> Self {
        Self {
            stat,
            comparator: Comparator::Max,
            value,
        }
    }

    pub fn exact(stat: Stat, value: i32) -> Self {
        Self {
            stat,
            comparator: Comparator::Eq,
            value,
        }
    }
}

/// Whose attributes a condition set's `attributes` are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTarget {
    #[default]
    Player,
    /// The character that owns the event card being evaluated.
    SelfCharacter,
}

/// Requirements on a named court character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCondition {
    pub character: CharacterId,
    /// `Some(false)` requires the character to be absent (or dead).
    #[serde(default)]
    pub present: Option<bool>,
    #[serde(default)]
    pub attributes: Vec<AttributeRequirement>,
    #[serde(default)]
    pub min_favor: Option<i32>,
    #[serde(default)]
    pub max_favor: Option<i32>,
}

impl CharacterCondition {
    pub fn new(character: CharacterId) -> Self {
        Self {
            character,
            present: None,
            attributes: Vec::new(),
            min_favor: None,
            max_favor: None,
        }
    }
}

/// Requirement on the relationship score `from` holds toward `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipCondition {
    pub from: CharacterId,
    pub to: CharacterId,
    pub comparator: Comparator,
    pub value: i32,
}

/// Requirement on a faction's influence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRequirement {
    pub faction: String,
    pub comparator: Comparator,
    pub value: i32,
}

/// A conjunctive predicate bundle. Every present check must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConditionSet {
    #[serde(default)]
    pub target: ConditionTarget,
    #[serde(default)]
    pub attributes: Vec<AttributeRequirement>,
    /// Every listed event must already be in history.
    #[serde(default)]
    pub required_events: Vec<EventId>,
    /// None of the listed events may be in history.
    #[serde(default)]
    pub excluded_events: Vec<EventId>,
    #[serde(default)]
    pub characters: Vec<CharacterCondition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipCondition>,
    #[serde(default)]
    pub factions: Vec<FactionRequirement>,
    #[serde(default)]
    pub min_turn: Option<u32>,
    #[serde(default)]
    pub max_turn: Option<u32>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the set contains no checks at all.
    ///
    /// A self-targeted set is never empty: it still requires the owner to exist.
    pub fn is_empty(&self) -> bool {
        self.target == ConditionTarget::Player
            && self.attributes.is_empty()
            && self.required_events.is_empty()
            && self.excluded_events.is_empty()
            && self.characters.is_empty()
            && self.relationships.is_empty()
            && self.factions.is_empty()
            && self.min_turn.is_none()
            && self.max_turn.is_none()
    }

    pub fn targeting_self(mut self) -> Self {
        self.target = ConditionTarget::SelfCharacter;
        self
    }

    pub fn with_attribute(mut self, requirement: AttributeRequirement) -> Self {
        self.attributes.push(requirement);
        self
    }

    pub fn requiring_event(mut self, id: impl Into<String>) -> Self {
        self.required_events.push(EventId::new(id));
        self
    }

    pub fn excluding_event(mut self, id: impl Into<String>) -> Self {
        self.excluded_events.push(EventId::new(id));
        self
    }

    pub fn with_character(mut self, condition: CharacterCondition) -> Self {
        self.characters.push(condition);
        self
    }

    pub fn with_relationship(mut self, condition: RelationshipCondition) -> Self {
        self.relationships.push(condition);
        self
    }

    pub fn with_faction(
        mut self,
        faction: impl Into<String>,
        comparator: Comparator,
        value: i32,
    ) -> Self {
        self.factions.push(FactionRequirement {
            faction: faction.into(),
            comparator,
            value,
        });
        self
    }

    pub fn with_turn_range(mut self, min_turn: Option<u32>, max_turn: Option<u32>) -> Self {
        self.min_turn = min_turn;
        self.max_turn = max_turn;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_bounds_are_inclusive() {
        assert!(Comparator::Min.holds(30, 30));
        assert!(!Comparator::Min.holds(29, 30));
        assert!(Comparator::Max.holds(30, 30));
        assert!(!Comparator::Max.holds(31, 30));
        assert!(Comparator::Eq.holds(5, 5));
        assert!(!Comparator::Eq.holds(6, 5));
    }

    #[test]
    fn test_empty_condition_set() {
        assert!(ConditionSet::new().is_empty());
        assert!(!ConditionSet::new().targeting_self().is_empty());
        assert!(!ConditionSet::new().requiring_event("coronation").is_empty());
    }

    #[test]
    fn test_condition_set_deserializes_with_defaults() {
        let json = r#"{"attributes":[{"stat":"power","comparator":"min","value":40}]}"#;
        let conditions: ConditionSet = serde_json::from_str(json).unwrap();
        assert_eq!(conditions.target, ConditionTarget::Player);
        assert_eq!(
            conditions.attributes,
            vec![AttributeRequirement::min(Stat::Power, 40)]
        );
        assert!(conditions.required_events.is_empty());
    }
}
