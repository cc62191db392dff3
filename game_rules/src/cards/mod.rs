//! Event cards: the immutable templates drawn from the card pools.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{CharacterId, EventId, OptionId, Stat};
use crate::mechanics::ConditionSet;

/// Who an effect lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    /// The ruler.
    Player,
    /// The character that owns the event card.
    SelfCharacter,
    /// A named court character.
    Character(CharacterId),
}

/// A single change carried by an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Shift a stat on the target's attribute vector, clamped to the stat's bounds.
    Attribute {
        target: EffectTarget,
        stat: Stat,
        delta: i32,
    },
    /// Shift a relationship field on a character, clamped to `[-100, 100]`.
    ///
    /// `toward == None` adjusts the character's favor toward the ruler.
    Relationship {
        target: EffectTarget,
        #[serde(default)]
        toward: Option<CharacterId>,
        delta: i32,
    },
    /// Shift a faction's influence, clamped to `[0, 100]`.
    FactionInfluence { faction: String, delta: i32 },
    /// Reveal a character's secrets to the player.
    Discover { character: CharacterId },
}

impl Effect {
    pub fn player(stat: Stat, delta: i32) -> Self {
        Effect::Attribute {
            target: EffectTarget::Player,
            stat,
            delta,
        }
    }

    pub fn on_self(stat: Stat, delta: i32) -> Self {
        Effect::Attribute {
            target: EffectTarget::SelfCharacter,
            stat,
            delta,
        }
    }

    pub fn favor(target: EffectTarget, delta: i32) -> Self {
        Effect::Relationship {
            target,
            toward: None,
            delta,
        }
    }
}

/// One choice presented to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOption {
    pub id: OptionId,
    pub text: String,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl EventOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(id),
            text: text.into(),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// An inclusive `[min, max]` range and the multiplier applied inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBand {
    pub min: i32,
    pub max: i32,
    pub multiplier: f64,
}

impl WeightBand {
    pub fn new(min: i32, max: i32, multiplier: f64) -> Self {
        Self {
            min,
            max,
            multiplier,
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Attribute -> ordered bands. Only the first band containing the value applies.
pub type DynamicWeight = BTreeMap<Stat, Vec<WeightBand>>;

/// An immutable event template. Only its pool membership changes over a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCard {
    pub id: EventId,
    /// The character this card belongs to, resolved for `SelfCharacter` targets.
    #[serde(default)]
    pub character: Option<CharacterId>,
    pub title: String,
    pub description: String,
    pub options: Vec<EventOption>,

    #[serde(default)]
    pub activation: Option<ConditionSet>,
    #[serde(default)]
    pub removal: Option<ConditionSet>,
    #[serde(default)]
    pub trigger: Option<ConditionSet>,

    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dynamic_weight: Option<DynamicWeight>,
}

impl EventCard {
    /// Create a card with no options, conditions or weight.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: EventId::new(id),
            character: None,
            title: title.into(),
            description: String::new(),
            options: Vec::new(),
            activation: None,
            removal: None,
            trigger: None,
            weight: None,
            dynamic_weight: None,
        }
    }

    pub fn owned_by(mut self, character: CharacterId) -> Self {
        self.character = Some(character);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_option(mut self, option: EventOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_activation(mut self, conditions: ConditionSet) -> Self {
        self.activation = Some(conditions);
        self
    }

    pub fn with_removal(mut self, conditions: ConditionSet) -> Self {
        self.removal = Some(conditions);
        self
    }

    pub fn with_trigger(mut self, conditions: ConditionSet) -> Self {
        self.trigger = Some(conditions);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_weight_bands(mut self, stat: Stat, bands: Vec<WeightBand>) -> Self {
        self.dynamic_weight
            .get_or_insert_with(DynamicWeight::new)
            .insert(stat, bands);
        self
    }

    /// Find an option by ID.
    pub fn option(&self, id: &OptionId) -> Option<&EventOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}
