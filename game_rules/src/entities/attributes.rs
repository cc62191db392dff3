//! The six-field attribute vector shared by the ruler and court characters.

use serde::{Deserialize, Serialize};

/// Lower bound of the nominal attribute range.
pub const ATTRIBUTE_MIN: i32 = 0;
/// Upper bound of the nominal attribute range.
pub const ATTRIBUTE_MAX: i32 = 100;
/// Lower bound of relationship-style fields (favor, inter-character ties).
pub const RELATIONSHIP_MIN: i32 = -100;
/// Upper bound of relationship-style fields.
pub const RELATIONSHIP_MAX: i32 = 100;

/// Inclusive bounds of a numeric field. `max == None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min: i32,
    pub max: Option<i32>,
}

impl FieldBounds {
    /// The `[0, 100]` range used by every attribute except age.
    pub const ATTRIBUTE: FieldBounds = FieldBounds {
        min: ATTRIBUTE_MIN,
        max: Some(ATTRIBUTE_MAX),
    };

    /// The signed `[-100, 100]` range used by relationship fields.
    pub const RELATIONSHIP: FieldBounds = FieldBounds {
        min: RELATIONSHIP_MIN,
        max: Some(RELATIONSHIP_MAX),
    };

    /// Age never drops below zero and has no ceiling.
    pub const AGE: FieldBounds = FieldBounds { min: 0, max: None };

    /// Clamp a value into these bounds.
    pub fn clamp(&self, value: i32) -> i32 {
        let value = value.max(self.min);
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }

    /// Apply a signed delta and clamp the result. Saturates instead of overflowing.
    pub fn apply_delta(&self, current: i32, delta: i32) -> i32 {
        self.clamp(current.saturating_add(delta))
    }
}

/// The fields of an [`AttributeVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Health,
    /// Authority over the court.
    Power,
    /// Treasury.
    Wealth,
    Military,
    Popularity,
    Age,
}

impl Stat {
    /// All stats in declaration order.
    pub const ALL: [Stat; 6] = [
        Stat::Health,
        Stat::Power,
        Stat::Wealth,
        Stat::Military,
        Stat::Popularity,
        Stat::Age,
    ];

    /// Bounds every mutation of this stat is clamped into.
    pub fn bounds(&self) -> FieldBounds {
        match self {
            Stat::Age => FieldBounds::AGE,
            _ => FieldBounds::ATTRIBUTE,
        }
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::Power => "power",
            Stat::Wealth => "wealth",
            Stat::Military => "military",
            Stat::Popularity => "popularity",
            Stat::Age => "age",
        }
    }

    /// Resolve a stat from its name, accepting the legacy aliases used by content
    /// files (`authority`, `treasury`). Matching is case-insensitive.
    pub fn parse(name: &str) -> Option<Stat> {
        match name.to_ascii_lowercase().as_str() {
            "health" => Some(Stat::Health),
            "power" | "authority" => Some(Stat::Power),
            "wealth" | "treasury" => Some(Stat::Wealth),
            "military" => Some(Stat::Military),
            "popularity" => Some(Stat::Popularity),
            "age" => Some(Stat::Age),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Six bounded numeric fields describing the ruler or a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeVector {
    pub health: i32,
    pub power: i32,
    pub wealth: i32,
    pub military: i32,
    pub popularity: i32,
    pub age: i32,
}

impl Default for AttributeVector {
    fn default() -> Self {
        Self {
            health: 50,
            power: 50,
            wealth: 50,
            military: 50,
            popularity: 50,
            age: 0,
        }
    }
}

impl AttributeVector {
    /// Read a single stat.
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Health => self.health,
            Stat::Power => self.power,
            Stat::Wealth => self.wealth,
            Stat::Military => self.military,
            Stat::Popularity => self.popularity,
            Stat::Age => self.age,
        }
    }

    fn slot_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Power => &mut self.power,
            Stat::Wealth => &mut self.wealth,
            Stat::Military => &mut self.military,
            Stat::Popularity => &mut self.popularity,
            Stat::Age => &mut self.age,
        }
    }

    /// Overwrite a stat, clamping into its bounds.
    pub fn set(&mut self, stat: Stat, value: i32) {
        *self.slot_mut(stat) = stat.bounds().clamp(value);
    }

    /// Add a delta to a stat, clamping into its bounds. Returns the new value.
    pub fn apply_delta(&mut self, stat: Stat, delta: i32) -> i32 {
        let slot = self.slot_mut(stat);
        *slot = stat.bounds().apply_delta(*slot, delta);
        *slot
    }

    /// Clamp every field into its bounds.
    pub fn clamped(mut self) -> Self {
        for stat in Stat::ALL {
            self.set(stat, self.get(stat));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_delta_clamps_low() {
        let mut attrs = AttributeVector {
            power: 10,
            ..Default::default()
        };
        assert_eq!(attrs.apply_delta(Stat::Power, -1000), 0);
        assert_eq!(attrs.power, 0);
    }

    #[test]
    fn test_apply_delta_clamps_high() {
        let mut attrs = AttributeVector::default();
        assert_eq!(attrs.apply_delta(Stat::Wealth, 75), 100);
    }

    #[test]
    fn test_age_is_unbounded_above() {
        let mut attrs = AttributeVector {
            age: 95,
            ..Default::default()
        };
        assert_eq!(attrs.apply_delta(Stat::Age, 20), 115);
        assert_eq!(attrs.apply_delta(Stat::Age, -500), 0);
    }

    #[test]
    fn test_relationship_bounds() {
        assert_eq!(FieldBounds::RELATIONSHIP.apply_delta(-40, -100), -100);
        assert_eq!(FieldBounds::RELATIONSHIP.apply_delta(90, 30), 100);
        assert_eq!(FieldBounds::ATTRIBUTE.apply_delta(-40, 0), 0);
    }

    #[test]
    fn test_delta_saturates() {
        assert_eq!(FieldBounds::AGE.apply_delta(i32::MAX, i32::MAX), i32::MAX);
    }

    #[test]
    fn test_stat_parse_aliases() {
        assert_eq!(Stat::parse("Authority"), Some(Stat::Power));
        assert_eq!(Stat::parse("treasury"), Some(Stat::Wealth));
        assert_eq!(Stat::parse("HEALTH"), Some(Stat::Health));
        assert_eq!(Stat::parse("charisma"), None);
    }

    #[test]
    fn test_clamped() {
        let attrs = AttributeVector {
            health: 140,
            military: -3,
            ..Default::default()
        }
        .clamped();
        assert_eq!(attrs.health, 100);
        assert_eq!(attrs.military, 0);
    }
}
