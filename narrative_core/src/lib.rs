//! # Narrative Core (The Throne Engine)
//!
//! The state/event engine of the throne card game. This crate operates on the
//! `game_rules` data model: it decides which event cards become drawable,
//! draws them by weight, applies the player's choices and advances turns.
//!
//! ## Core Components
//!
//! - **conditions**: Predicate evaluation over the world state
//! - **weighting**: Base and dynamic draw weights
//! - **card_pool**: The pending → active → discarded lifecycle and weighted draw
//! - **effects**: Bounded application of a chosen option's effects
//! - **turn**: New games, end-of-turn bookkeeping, game-over detection, history
//! - **convert**: Authored config records and the provider contract
//! - **session**: The per-turn flow for callers serving a single game
//!
//! ## Design Philosophy
//!
//! - **Total functions**: Missing conditions and unresolved references degrade
//!   to no-ops; only the session boundary reports errors
//! - **Caller-owned state**: Every operation mutates a `WorldState` the caller
//!   owns exclusively; nothing is shared between games
//! - **Injected randomness**: Draws take any `rand::Rng`, so simulators can seed

pub mod card_pool;
pub mod conditions;
pub mod convert;
pub mod effects;
pub mod error;
pub mod session;
pub mod turn;
pub mod weighting;

pub use card_pool::*;
pub use conditions::*;
pub use convert::*;
pub use effects::*;
pub use error::*;
pub use session::*;
pub use turn::*;
pub use weighting::*;
