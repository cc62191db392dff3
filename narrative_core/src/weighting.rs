//! Weight Calculator - draw weight of an event card for the current world state.

use game_rules::{EventCard, RulesConfig, WorldState};

/// Computes draw weights from base weights and dynamic weight bands.
#[derive(Debug, Clone, Copy)]
pub struct WeightCalculator {
    default_weight: f64,
}

impl WeightCalculator {
    /// Create a calculator using `default_weight` for unweighted cards.
    pub fn new(default_weight: f64) -> Self {
        Self { default_weight }
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(config.default_event_weight)
    }

    /// Weight of a card, never negative.
    ///
    /// The base weight falls back to the default when absent or zero. For every
    /// dynamic-weight attribute, the first band containing the ruler's current
    /// value multiplies the running weight.
    pub fn weight(&self, card: &EventCard, state: &WorldState) -> f64 {
        let mut weight = card
            .weight
            .filter(|w| *w != 0.0)
            .unwrap_or(self.default_weight);

        if let Some(table) = &card.dynamic_weight {
            for (stat, bands) in table {
                let value = state.player.get(*stat);
                // First match wins when bands overlap
                if let Some(band) = bands.iter().find(|b| b.contains(value)) {
                    weight *= band.multiplier;
                }
            }
        }

        weight.max(0.0)
    }
}

impl Default for WeightCalculator {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
    }
}
