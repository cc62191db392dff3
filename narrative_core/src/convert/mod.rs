//! Config conversion - turns authored records into engine types.
//!
//! The legacy `minX`/`maxX`/`X` requirement keys are parsed here, once, into
//! explicit [`AttributeRequirement`] triples. Nothing downstream of this module
//! inspects key prefixes.

mod provider;
mod records;

pub use provider::*;
pub use records::*;

use std::collections::BTreeMap;

use game_rules::{
    AttributeRequirement, AttributeVector, Character, CharacterCondition, CharacterId, Comparator,
    ConditionSet, ConditionTarget, DynamicWeight, Effect, EffectTarget, EventCard, EventId,
    EventOption, FactionRequirement, OptionId, RelationshipCondition, Stat, WeightBand,
};

use crate::error::ConvertError;

const SELF_KEY: &str = "self";

/// Parse a prefix-style requirement key into its stat and direction.
///
/// `minPower` and `maxPower` bound the stat; a bare `power` requires an exact
/// match. Aliases accepted by [`Stat::parse`] work after the prefix as well.
pub fn parse_requirement_key(key: &str) -> Option<(Stat, Comparator)> {
    if let Some(stat) = key.strip_prefix("min").and_then(Stat::parse) {
        return Some((stat, Comparator::Min));
    }
    if let Some(stat) = key.strip_prefix("max").and_then(Stat::parse) {
        return Some((stat, Comparator::Max));
    }
    Stat::parse(key).map(|stat| (stat, Comparator::Eq))
}

fn parse_stat(name: &str, context: &str) -> Result<Stat, ConvertError> {
    Stat::parse(name).ok_or_else(|| ConvertError::UnknownAttribute {
        key: name.to_string(),
        context: context.to_string(),
    })
}

fn convert_requirements(
    entries: &BTreeMap<String, i32>,
    context: &str,
) -> Result<Vec<AttributeRequirement>, ConvertError> {
    entries
        .iter()
        .map(|(key, value)| {
            parse_requirement_key(key)
                .map(|(stat, comparator)| AttributeRequirement {
                    stat,
                    comparator,
                    value: *value,
                })
                .ok_or_else(|| ConvertError::UnknownAttribute {
                    key: key.clone(),
                    context: context.to_string(),
                })
        })
        .collect()
}

/// Expand optional `min`/`max` fields into comparator pairs.
fn bound_pairs(min: Option<i32>, max: Option<i32>) -> impl Iterator<Item = (Comparator, i32)> {
    min.map(|v| (Comparator::Min, v))
        .into_iter()
        .chain(max.map(|v| (Comparator::Max, v)))
}

/// Convert a condition record.
pub fn convert_conditions(
    record: &ConditionRecord,
    context: &str,
) -> Result<ConditionSet, ConvertError> {
    let target = match record.target.as_deref() {
        None | Some("player") => ConditionTarget::Player,
        Some(SELF_KEY) => ConditionTarget::SelfCharacter,
        Some(other) => return Err(ConvertError::UnknownTarget(other.to_string())),
    };

    let mut attributes = convert_requirements(&record.bounds, context)?;
    attributes.extend(convert_requirements(&record.attribute_requirements, context)?);

    let characters = record
        .characters
        .iter()
        .map(|c| {
            Ok(CharacterCondition {
                character: CharacterId::new(c.id.as_str()),
                present: c.present,
                attributes: convert_requirements(&c.attribute_requirements, context)?,
                min_favor: c.min_favor,
                max_favor: c.max_favor,
            })
        })
        .collect::<Result<Vec<_>, ConvertError>>()?;

    let relationships = record
        .relationships
        .iter()
        .flat_map(|r| {
            bound_pairs(r.min, r.max).map(move |(comparator, value)| RelationshipCondition {
                from: CharacterId::new(r.from.as_str()),
                to: CharacterId::new(r.to.as_str()),
                comparator,
                value,
            })
        })
        .collect();

    let factions = record
        .factions
        .iter()
        .flat_map(|f| {
            bound_pairs(f.min, f.max).map(move |(comparator, value)| FactionRequirement {
                faction: f.faction.clone(),
                comparator,
                value,
            })
        })
        .collect();

    Ok(ConditionSet {
        target,
        attributes,
        required_events: record.required_events.iter().map(EventId::new).collect(),
        excluded_events: record.excluded_events.iter().map(EventId::new).collect(),
        characters,
        relationships,
        factions,
        min_turn: record.min_turn,
        max_turn: record.max_turn,
    })
}

fn effect_target(id: &str) -> EffectTarget {
    if id == SELF_KEY {
        EffectTarget::SelfCharacter
    } else {
        EffectTarget::Character(CharacterId::new(id))
    }
}

/// Convert an option's grouped deltas into an ordered effect list.
///
/// Order: ruler attributes, owner attributes, named characters, favor,
/// relationships, factions, discoveries.
pub fn convert_effects(record: &EffectsRecord, context: &str) -> Result<Vec<Effect>, ConvertError> {
    let mut effects = Vec::new();

    for (name, delta) in &record.player {
        effects.push(Effect::player(parse_stat(name, context)?, *delta));
    }
    for (name, delta) in &record.self_character {
        effects.push(Effect::on_self(parse_stat(name, context)?, *delta));
    }
    for (id, deltas) in &record.characters {
        for (name, delta) in deltas {
            effects.push(Effect::Attribute {
                target: effect_target(id),
                stat: parse_stat(name, context)?,
                delta: *delta,
            });
        }
    }
    if let Some(delta) = record.self_favor {
        effects.push(Effect::favor(EffectTarget::SelfCharacter, delta));
    }
    for (id, delta) in &record.favor {
        effects.push(Effect::favor(effect_target(id), *delta));
    }
    for relation in &record.relationships {
        effects.push(Effect::Relationship {
            target: effect_target(&relation.from),
            toward: Some(CharacterId::new(relation.to.as_str())),
            delta: relation.delta,
        });
    }
    for (faction, delta) in &record.factions {
        effects.push(Effect::FactionInfluence {
            faction: faction.clone(),
            delta: *delta,
        });
    }
    for id in &record.discover {
        effects.push(Effect::Discover {
            character: CharacterId::new(id.as_str()),
        });
    }

    Ok(effects)
}

fn convert_dynamic_weight(
    event_id: &str,
    table: &BTreeMap<String, Vec<([i32; 2], f64)>>,
) -> Result<DynamicWeight, ConvertError> {
    let mut weights = DynamicWeight::new();
    for (attribute, bands) in table {
        let stat = parse_stat(attribute, &format!("dynamic weight of event {}", event_id))?;
        let bands = bands
            .iter()
            .map(|([min, max], multiplier)| {
                if min > max {
                    return Err(ConvertError::InvalidWeightBand {
                        event: event_id.to_string(),
                        attribute: attribute.clone(),
                        min: *min,
                        max: *max,
                    });
                }
                Ok(WeightBand::new(*min, *max, *multiplier))
            })
            .collect::<Result<Vec<_>, _>>()?;
        weights.insert(stat, bands);
    }
    Ok(weights)
}

/// Convert an event record. `owner` is used when the record names no character.
pub fn convert_event(record: &EventRecord, owner: Option<&str>) -> Result<EventCard, ConvertError> {
    let context = format!("event {}", record.id);

    let options = record
        .options
        .iter()
        .map(|o| {
            Ok(EventOption {
                id: OptionId::new(o.id.as_str()),
                text: o.text.clone(),
                effects: convert_effects(&o.effects, &context)?,
            })
        })
        .collect::<Result<Vec<_>, ConvertError>>()?;

    let convert = |conditions: &Option<ConditionRecord>| {
        conditions
            .as_ref()
            .map(|c| convert_conditions(c, &context))
            .transpose()
    };

    Ok(EventCard {
        id: EventId::new(record.id.as_str()),
        character: record
            .character_id
            .as_deref()
            .or(owner)
            .map(CharacterId::new),
        title: record.title.clone(),
        description: record.description.clone(),
        options,
        activation: convert(&record.activation_conditions)?,
        removal: convert(&record.removal_conditions)?,
        trigger: convert(&record.trigger_conditions)?,
        weight: record.weight,
        dynamic_weight: record
            .dynamic_weight
            .as_ref()
            .map(|table| convert_dynamic_weight(&record.id, table))
            .transpose()?,
    })
}

/// Convert a character record. Unlisted attributes keep their defaults.
pub fn convert_character(record: &CharacterRecord) -> Result<Character, ConvertError> {
    let context = format!("character {}", record.id);
    let mut attributes = AttributeVector::default();
    for (name, value) in &record.attributes {
        attributes.set(parse_stat(name, &context)?, *value);
    }

    let mut character = Character::new(record.id.as_str(), record.name.as_str())
        .with_attributes(attributes)
        .with_favor(record.favor.unwrap_or(0));
    character.title = record.title.clone();
    character.faction = record.faction.clone();
    for (other, score) in &record.relationships {
        character = character.with_relationship(CharacterId::new(other.as_str()), *score);
    }
    character.extra = record
        .extra
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(character)
}
