//! Append-only game history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{CharacterId, EventId, HistoryEntryId, OptionId, Stat};

/// Which field of which entity a committed change landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeSubject {
    PlayerAttribute { stat: Stat },
    CharacterAttribute { character: CharacterId, stat: Stat },
    Favor { character: CharacterId },
    Relationship { from: CharacterId, to: CharacterId },
    FactionInfluence { faction: String },
}

/// A committed numeric change, after clamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedChange {
    pub subject: ChangeSubject,
    pub before: i32,
    pub after: i32,
}

impl AppliedChange {
    /// The effective delta, which may be smaller than requested once clamped.
    pub fn delta(&self) -> i32 {
        self.after - self.before
    }

    /// Whether this change touches a relationship-style field.
    pub fn is_relationship(&self) -> bool {
        matches!(
            self.subject,
            ChangeSubject::Favor { .. } | ChangeSubject::Relationship { .. }
        )
    }
}

/// One resolved event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameHistoryEntry {
    pub id: HistoryEntryId,
    pub event_id: EventId,
    pub option_id: OptionId,
    pub turn: u32,
    /// Attribute and faction changes committed by the chosen option.
    pub effects: Vec<AppliedChange>,
    pub timestamp: DateTime<Utc>,
    /// Favor and relationship changes, when the option carried any.
    #[serde(default)]
    pub relationship_changes: Option<Vec<AppliedChange>>,
    /// Characters whose secrets the option revealed.
    #[serde(default)]
    pub discoveries: Option<Vec<CharacterId>>,
}

/// The ordered log of resolved events.
///
/// Entries can only be appended through [`GameHistory::record`] and are never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameHistory {
    entries: Vec<GameHistoryEntry>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for a resolved event. Returns the new entry's ID.
    ///
    /// Changes are split into the attribute log and the relationship payload.
    pub fn record(
        &mut self,
        event_id: EventId,
        option_id: OptionId,
        turn: u32,
        changes: Vec<AppliedChange>,
        discoveries: Vec<CharacterId>,
        timestamp: DateTime<Utc>,
    ) -> HistoryEntryId {
        let (relationship_changes, effects): (Vec<_>, Vec<_>) =
            changes.into_iter().partition(AppliedChange::is_relationship);

        let entry = GameHistoryEntry {
            id: HistoryEntryId::new(),
            event_id,
            option_id,
            turn,
            effects,
            timestamp,
            relationship_changes: (!relationship_changes.is_empty())
                .then_some(relationship_changes),
            discoveries: (!discoveries.is_empty()).then_some(discoveries),
        };
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Whether the given event has fired at least once.
    pub fn contains_event(&self, event_id: &EventId) -> bool {
        self.entries.iter().any(|e| &e.event_id == event_id)
    }

    pub fn entries(&self) -> &[GameHistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&GameHistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(subject: ChangeSubject, before: i32, after: i32) -> AppliedChange {
        AppliedChange {
            subject,
            before,
            after,
        }
    }

    #[test]
    fn test_record_splits_relationship_changes() {
        let mut history = GameHistory::new();
        let changes = vec![
            change(ChangeSubject::PlayerAttribute { stat: Stat::Wealth }, 40, 30),
            change(
                ChangeSubject::Favor {
                    character: CharacterId::new("eunuch"),
                },
                0,
                15,
            ),
        ];

        history.record(
            EventId::new("tax_reform"),
            OptionId::new("approve"),
            3,
            changes,
            Vec::new(),
            Utc::now(),
        );

        let entry = history.last().unwrap();
        assert_eq!(entry.turn, 3);
        assert_eq!(entry.effects.len(), 1);
        assert_eq!(entry.effects[0].delta(), -10);
        assert_eq!(entry.relationship_changes.as_ref().map(Vec::len), Some(1));
        assert!(entry.discoveries.is_none());
    }

    #[test]
    fn test_contains_event() {
        let mut history = GameHistory::new();
        assert!(history.is_empty());

        history.record(
            EventId::new("coronation"),
            OptionId::new("accept"),
            1,
            Vec::new(),
            vec![CharacterId::new("spy")],
            Utc::now(),
        );

        assert!(history.contains_event(&EventId::new("coronation")));
        assert!(!history.contains_event(&EventId::new("rebellion")));
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.entries()[0].discoveries,
            Some(vec![CharacterId::new("spy")])
        );
    }
}
