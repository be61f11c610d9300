//! # Story Rules
//!
//! The data crate for the narrative engine - story definitions, player data and
//! the game state store. This crate holds no evaluation logic; it only defines
//! what a story is and how game state may be mutated.

pub mod definitions;
pub mod game_state;
pub mod player;
pub mod story;

pub use definitions::*;
pub use game_state::*;
pub use player::*;
pub use story::*;
