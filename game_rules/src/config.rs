//! Tunable rule constants.

use serde::{Deserialize, Serialize};

use crate::entities::AttributeVector;
use crate::world_state::Difficulty;

/// Errors raised while reading a rules document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse rules config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid starting age range: {min}..={max}")]
    InvalidAgeRange { min: i32, max: i32 },
}

/// Initial ruler attributes for each difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingAttributes {
    pub easy: AttributeVector,
    pub normal: AttributeVector,
    pub hard: AttributeVector,
}

impl Default for StartingAttributes {
    fn default() -> Self {
        Self {
            easy: AttributeVector {
                health: 70,
                power: 60,
                wealth: 60,
                military: 60,
                popularity: 60,
                age: 0,
            },
            normal: AttributeVector {
                health: 60,
                power: 50,
                wealth: 50,
                military: 50,
                popularity: 50,
                age: 0,
            },
            hard: AttributeVector {
                health: 50,
                power: 40,
                wealth: 35,
                military: 40,
                popularity: 40,
                age: 0,
            },
        }
    }
}

impl StartingAttributes {
    pub fn for_difficulty(&self, difficulty: Difficulty) -> AttributeVector {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Configuration for new games and the draw weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub starting_attributes: StartingAttributes,

    /// Youngest possible age at coronation.
    pub min_start_age: i32,
    /// Oldest possible age at coronation.
    pub max_start_age: i32,

    /// The reign ends once age exceeds this.
    pub max_age: i32,

    /// Weight used for cards with no weight, or a weight of zero.
    pub default_event_weight: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_attributes: StartingAttributes::default(),
            min_start_age: 18,
            max_start_age: 25,
            max_age: 80,
            default_event_weight: 1.0,
        }
    }
}

impl RulesConfig {
    /// Parse a TOML document. Missing keys fall back to the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_start_age > self.max_start_age || self.min_start_age < 0 {
            return Err(ConfigError::InvalidAgeRange {
                min: self.min_start_age,
                max: self.max_start_age,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_age, 80);
        assert_eq!(
            config.starting_attributes.for_difficulty(Difficulty::Normal).power,
            50
        );
    }

    #[test]
    fn test_partial_toml_override() {
        let config = RulesConfig::from_toml_str(
            r#"
            max_age = 70
            default_event_weight = 2.5

            [starting_attributes.hard]
            health = 30
            power = 30
            wealth = 30
            military = 30
            popularity = 30
            age = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.max_age, 70);
        assert_eq!(config.min_start_age, 18);
        assert!((config.default_event_weight - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.starting_attributes.hard.health, 30);
        assert_eq!(config.starting_attributes.easy.health, 70);
    }

    #[test]
    fn test_inverted_age_range_rejected() {
        let result = RulesConfig::from_toml_str("min_start_age = 40\nmax_start_age = 20");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidAgeRange { min: 40, max: 20 })
        ));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = RulesConfig::from_toml_str("max_age = \"old\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
