//! Plain-data records as authored in content files.
//!
//! These mirror the configuration layout (camelCase keys, prefix-style
//! requirement maps) and are converted once into engine types by
//! [`super::convert_event`] and [`super::convert_character`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A character stat block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    /// Attribute name -> starting value.
    #[serde(default)]
    pub attributes: BTreeMap<String, i32>,
    #[serde(default)]
    pub favor: Option<i32>,
    /// Other character ID -> starting relationship score.
    #[serde(default)]
    pub relationships: BTreeMap<String, i32>,
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// An event as authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Owning character; filled from the provider's character ID when absent.
    #[serde(default)]
    pub character_id: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionRecord>,
    #[serde(default)]
    pub activation_conditions: Option<ConditionRecord>,
    #[serde(default)]
    pub removal_conditions: Option<ConditionRecord>,
    #[serde(default)]
    pub trigger_conditions: Option<ConditionRecord>,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Attribute name -> `[[lo, hi], multiplier]` bands.
    #[serde(default)]
    pub dynamic_weight: Option<BTreeMap<String, Vec<([i32; 2], f64)>>>,
}

/// One option of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRecord {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub effects: EffectsRecord,
}

/// Effect deltas grouped by target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsRecord {
    /// Attribute deltas on the ruler.
    #[serde(default)]
    pub player: BTreeMap<String, i32>,
    /// Attribute deltas on the owning character.
    #[serde(default, rename = "self")]
    pub self_character: BTreeMap<String, i32>,
    /// Character ID -> attribute deltas.
    #[serde(default)]
    pub characters: BTreeMap<String, BTreeMap<String, i32>>,
    /// Favor delta of the owning character.
    #[serde(default)]
    pub self_favor: Option<i32>,
    /// Character ID -> favor delta.
    #[serde(default)]
    pub favor: BTreeMap<String, i32>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDeltaRecord>,
    /// Faction name -> influence delta.
    #[serde(default)]
    pub factions: BTreeMap<String, i32>,
    /// Characters whose secrets are revealed.
    #[serde(default)]
    pub discover: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDeltaRecord {
    /// `"self"` names the owning character.
    pub from: String,
    pub to: String,
    pub delta: i32,
}

/// A condition bundle in content-file form.
///
/// Bounds use the legacy `minX`/`maxX`/`X` key convention; any key not claimed
/// by a named field lands in `bounds`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRecord {
    /// `"self"` checks the owning character instead of the ruler.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub attribute_requirements: BTreeMap<String, i32>,
    #[serde(default)]
    pub required_events: Vec<String>,
    #[serde(default)]
    pub excluded_events: Vec<String>,
    #[serde(default)]
    pub characters: Vec<CharacterConditionRecord>,
    #[serde(default)]
    pub relationships: Vec<RelationshipConditionRecord>,
    #[serde(default)]
    pub factions: Vec<FactionConditionRecord>,
    #[serde(default)]
    pub min_turn: Option<u32>,
    #[serde(default)]
    pub max_turn: Option<u32>,
    #[serde(flatten)]
    pub bounds: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterConditionRecord {
    pub id: String,
    #[serde(default)]
    pub present: Option<bool>,
    #[serde(default)]
    pub attribute_requirements: BTreeMap<String, i32>,
    #[serde(default)]
    pub min_favor: Option<i32>,
    #[serde(default)]
    pub max_favor: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipConditionRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionConditionRecord {
    pub faction: String,
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
}
