//! # Game Rules
//!
//! The "Court Ledger" crate - the data model of the throne card engine: the
//! ruler's attributes, court characters, event cards, condition sets and the
//! world state that ties them together. This crate holds no engine logic;
//! `narrative_core` operates on the types defined here.

pub mod cards;
pub mod config;
pub mod entities;
pub mod mechanics;
pub mod world_state;

pub use cards::*;
pub use config::*;
pub use entities::*;
pub use mechanics::*;
pub use world_state::*;
