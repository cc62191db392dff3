//! Error types surfaced at the engine's orchestration boundary.
//!
//! The per-turn primitives are total functions; only session-level calls and
//! content conversion return these.

use game_rules::ConfigError;
use thiserror::Error;

/// A content source failed to deliver records.
#[derive(Debug, Clone, Error)]
#[error("Config provider failed: {0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Config record could not be converted into engine types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("Unknown attribute '{key}' in {context}")]
    UnknownAttribute { key: String, context: String },

    #[error("Invalid weight band [{min}, {max}] for '{attribute}' in event {event}")]
    InvalidWeightBand {
        event: String,
        attribute: String,
        min: i32,
        max: i32,
    },

    #[error("Unknown condition target '{0}'")]
    UnknownTarget(String),
}

/// Failures reported by [`crate::GameSession`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No characters available to start a game")]
    NoCharacters,

    #[error("No eligible event to draw")]
    NoEligibleEvent,

    #[error("The game is already over")]
    GameAlreadyOver,

    #[error("No event has been drawn this turn")]
    NoCurrentEvent,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Invalid rules config: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Human-readable reason, for callers that report `success: false`.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
