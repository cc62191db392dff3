//! The content-source contract and an in-memory implementation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{CharacterRecord, EventRecord};
use crate::error::ProviderError;

/// Supplies characters and their events. The engine never reads files itself.
pub trait ConfigProvider {
    fn load_all_characters(&self) -> Result<Vec<CharacterRecord>, ProviderError>;

    fn load_character_events(&self, character_id: &str) -> Result<Vec<EventRecord>, ProviderError>;

    /// Structural check on a character record.
    fn is_valid_character(&self, record: &CharacterRecord) -> bool {
        !record.id.trim().is_empty() && !record.name.trim().is_empty()
    }

    /// Structural check on an event record: an ID and at least one option,
    /// with option IDs unique within the event.
    fn is_valid_event(&self, record: &EventRecord) -> bool {
        if record.id.trim().is_empty() || record.options.is_empty() {
            return false;
        }
        let mut seen = HashSet::new();
        record
            .options
            .iter()
            .all(|o| !o.id.is_empty() && seen.insert(o.id.as_str()))
    }
}

/// A content bundle held in memory, for tooling, simulators and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryConfigProvider {
    #[serde(default)]
    pub characters: Vec<CharacterRecord>,
    /// Character ID -> that character's events.
    #[serde(default)]
    pub events: BTreeMap<String, Vec<EventRecord>>,
}

impl InMemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bundle of the form `{"characters": [...], "events": {"id": [...]}}`.
    pub fn from_json_str(source: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(source).map_err(|e| ProviderError::new(e.to_string()))
    }

    pub fn with_character(mut self, record: CharacterRecord) -> Self {
        self.characters.push(record);
        self
    }

    pub fn with_events(
        mut self,
        character_id: impl Into<String>,
        events: Vec<EventRecord>,
    ) -> Self {
        self.events.entry(character_id.into()).or_default().extend(events);
        self
    }
}

impl ConfigProvider for InMemoryConfigProvider {
    fn load_all_characters(&self) -> Result<Vec<CharacterRecord>, ProviderError> {
        Ok(self.characters.clone())
    }

    fn load_character_events(&self, character_id: &str) -> Result<Vec<EventRecord>, ProviderError> {
        Ok(self.events.get(character_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::OptionRecord;

    fn option(id: &str) -> OptionRecord {
        OptionRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_event_validation() {
        let provider = InMemoryConfigProvider::new();
        let mut record = EventRecord {
            id: "famine".to_string(),
            ..Default::default()
        };
        assert!(!provider.is_valid_event(&record));

        record.options = vec![option("a"), option("b")];
        assert!(provider.is_valid_event(&record));

        record.options.push(option("a"));
        assert!(!provider.is_valid_event(&record));
    }

    #[test]
    fn test_character_validation() {
        let provider = InMemoryConfigProvider::new();
        let record = CharacterRecord {
            id: "general".to_string(),
            name: " ".to_string(),
            ..Default::default()
        };
        assert!(!provider.is_valid_character(&record));
    }

    #[test]
    fn test_from_json_bundle() {
        let provider = InMemoryConfigProvider::from_json_str(
            r#"{
                "characters": [
                    {"id": "general", "name": "Meng Tian", "attributes": {"military": 80}}
                ],
                "events": {"general": [{"id": "border_war", "options": [{"id": "fight"}]}]}
            }"#,
        )
        .unwrap();

        assert_eq!(provider.load_all_characters().unwrap().len(), 1);
        assert_eq!(provider.load_character_events("general").unwrap().len(), 1);
        assert!(provider.load_character_events("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_bundle_is_provider_error() {
        assert!(InMemoryConfigProvider::from_json_str("{not json").is_err());
    }
}
