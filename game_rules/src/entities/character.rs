//! Court character definitions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{AttributeVector, CharacterId, FieldBounds};

/// A court character: stats of their own plus relationship-style fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub title: Option<String>,
    pub faction: Option<String>,

    pub attributes: AttributeVector,

    /// Disposition toward the ruler, in `[-100, 100]`.
    pub favor: i32,
    /// Character ID -> relationship score, each in `[-100, 100]`.
    #[serde(default)]
    pub relationships: BTreeMap<CharacterId, i32>,

    pub alive: bool,
    /// Whether the player has uncovered this character's secrets.
    pub discovered: bool,

    // Content-defined extras the engine carries but never interprets
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Character {
    /// Create a new character with neutral standing.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(id),
            name: name.into(),
            title: None,
            faction: None,
            attributes: AttributeVector::default(),
            favor: 0,
            relationships: BTreeMap::new(),
            alive: true,
            discovered: false,
            extra: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeVector) -> Self {
        self.attributes = attributes.clamped();
        self
    }

    pub fn with_favor(mut self, favor: i32) -> Self {
        self.favor = FieldBounds::RELATIONSHIP.clamp(favor);
        self
    }

    pub fn with_relationship(mut self, other: CharacterId, score: i32) -> Self {
        self.relationships
            .insert(other, FieldBounds::RELATIONSHIP.clamp(score));
        self
    }

    /// Relationship toward another character; strangers read as 0.
    pub fn relationship_with(&self, other: &CharacterId) -> i32 {
        self.relationships.get(other).copied().unwrap_or(0)
    }

    /// Shift favor toward the ruler. Returns the new value.
    pub fn adjust_favor(&mut self, delta: i32) -> i32 {
        self.favor = FieldBounds::RELATIONSHIP.apply_delta(self.favor, delta);
        self.favor
    }

    /// Shift the relationship toward another character. Returns the new value.
    pub fn adjust_relationship(&mut self, other: &CharacterId, delta: i32) -> i32 {
        let entry = self.relationships.entry(other.clone()).or_insert(0);
        *entry = FieldBounds::RELATIONSHIP.apply_delta(*entry, delta);
        *entry
    }

    /// Check if the character is alive.
    pub fn is_alive(&self) -> bool {
        self.alive && self.attributes.health > 0
    }
}
