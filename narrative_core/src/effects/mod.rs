//! Choice Effect Applier - commits a chosen option's effects to the world state.
//!
//! Application runs in two phases. Every effect is first resolved against the
//! roster into a [`PlannedChange`]; unresolved targets are dropped there. The
//! plan is then committed in order, and committing cannot fail, so callers
//! never observe a partially applied option.

use game_rules::{
    AppliedChange, ChangeSubject, CharacterId, Effect, EffectTarget, EventOption, Stat,
    WorldState,
};

/// One resolved effect, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedChange {
    PlayerAttribute { stat: Stat, delta: i32 },
    CharacterAttribute { character: CharacterId, stat: Stat, delta: i32 },
    Favor { character: CharacterId, delta: i32 },
    Relationship { from: CharacterId, to: CharacterId, delta: i32 },
    FactionInfluence { faction: String, delta: i32 },
    Discover { character: CharacterId },
}

/// Everything an option actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedOption {
    pub changes: Vec<AppliedChange>,
    pub discoveries: Vec<CharacterId>,
    /// Effects dropped because their target could not be resolved.
    pub skipped: usize,
}

/// Apply every effect of `option` to `state`.
///
/// `self_id` is the character owning the event card, used for
/// [`EffectTarget::SelfCharacter`].
pub fn apply_choice(
    state: &mut WorldState,
    option: &EventOption,
    self_id: Option<&CharacterId>,
) -> AppliedOption {
    let plan = plan_choice(state, option, self_id);
    let skipped = option.effects.len() - plan.len();
    if skipped > 0 {
        tracing::debug!(option = %option.id, skipped, "Dropped effects with unresolved targets");
    }

    let mut applied = commit(state, plan);
    applied.skipped = skipped;
    applied
}

/// Resolve an option's effects without touching the state.
pub fn plan_choice(
    state: &WorldState,
    option: &EventOption,
    self_id: Option<&CharacterId>,
) -> Vec<PlannedChange> {
    option
        .effects
        .iter()
        .filter_map(|effect| resolve(state, effect, self_id))
        .collect()
}

fn resolve_character(
    state: &WorldState,
    target: &EffectTarget,
    self_id: Option<&CharacterId>,
) -> Option<CharacterId> {
    let id = match target {
        EffectTarget::Player => return None,
        EffectTarget::SelfCharacter => self_id?,
        EffectTarget::Character(id) => id,
    };
    state.get_active_character(id).map(|c| c.id.clone())
}

fn resolve(
    state: &WorldState,
    effect: &Effect,
    self_id: Option<&CharacterId>,
) -> Option<PlannedChange> {
    match effect {
        Effect::Attribute {
            target: EffectTarget::Player,
            stat,
            delta,
        } => Some(PlannedChange::PlayerAttribute {
            stat: *stat,
            delta: *delta,
        }),
        Effect::Attribute { target, stat, delta } => {
            resolve_character(state, target, self_id).map(|character| {
                PlannedChange::CharacterAttribute {
                    character,
                    stat: *stat,
                    delta: *delta,
                }
            })
        }
        Effect::Relationship {
            target,
            toward: None,
            delta,
        } => resolve_character(state, target, self_id).map(|character| PlannedChange::Favor {
            character,
            delta: *delta,
        }),
        Effect::Relationship {
            target,
            toward: Some(other),
            delta,
        } => {
            let from = resolve_character(state, target, self_id)?;
            let to = state.get_active_character(other)?.id.clone();
            Some(PlannedChange::Relationship {
                from,
                to,
                delta: *delta,
            })
        }
        Effect::FactionInfluence { faction, delta } => Some(PlannedChange::FactionInfluence {
            faction: faction.clone(),
            delta: *delta,
        }),
        Effect::Discover { character } => state
            .get_active_character(character)
            .map(|c| PlannedChange::Discover {
                character: c.id.clone(),
            }),
    }
}

fn commit(state: &mut WorldState, plan: Vec<PlannedChange>) -> AppliedOption {
    let mut applied = AppliedOption::default();

    for change in plan {
        match change {
            PlannedChange::PlayerAttribute { stat, delta } => {
                let before = state.player.get(stat);
                let after = state.player.apply_delta(stat, delta);
                applied.changes.push(AppliedChange {
                    subject: ChangeSubject::PlayerAttribute { stat },
                    before,
                    after,
                });
            }
            PlannedChange::CharacterAttribute {
                character,
                stat,
                delta,
            } => {
                // Resolved during planning, and commit never removes characters
                if let Some(target) = state.get_character_mut(&character) {
                    let before = target.attributes.get(stat);
                    let after = target.attributes.apply_delta(stat, delta);
                    applied.changes.push(AppliedChange {
                        subject: ChangeSubject::CharacterAttribute { character, stat },
                        before,
                        after,
                    });
                }
            }
            PlannedChange::Favor { character, delta } => {
                if let Some(target) = state.get_character_mut(&character) {
                    let before = target.favor;
                    let after = target.adjust_favor(delta);
                    applied.changes.push(AppliedChange {
                        subject: ChangeSubject::Favor { character },
                        before,
                        after,
                    });
                }
            }
            PlannedChange::Relationship { from, to, delta } => {
                if let Some(target) = state.get_character_mut(&from) {
                    let before = target.relationship_with(&to);
                    let after = target.adjust_relationship(&to, delta);
                    applied.changes.push(AppliedChange {
                        subject: ChangeSubject::Relationship { from, to },
                        before,
                        after,
                    });
                }
            }
            PlannedChange::FactionInfluence { faction, delta } => {
                let (before, after) = state.adjust_faction(&faction, delta);
                applied.changes.push(AppliedChange {
                    subject: ChangeSubject::FactionInfluence { faction },
                    before,
                    after,
                });
            }
            PlannedChange::Discover { character } => {
                if let Some(target) = state.get_character_mut(&character) {
                    target.discovered = true;
                    applied.discoveries.push(character);
                }
            }
        }
    }

    applied
}
