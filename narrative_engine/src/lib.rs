//! # Narrative Engine
//!
//! The rule-driven half of an interactive-fiction game. Stories declare events
//! as triggers plus actions; each turn the engine evaluates those triggers
//! against the game state held by `story_rules` and interprets the actions of
//! the events that fire. Text generation stays outside the engine.
//!
//! ## Core Components
//!
//! - **trigger_evaluator**: Decides whether an event's trigger holds
//! - **action_interpreter**: Applies event actions to state and collects effects
//! - **event_registry**: Schedules events per turn and tracks one-shot firings
//! - **checkpoint**: Turn-numbered story checkpoints
//! - **loader**: Reads story directories from disk and validates them
//! - **save**: Save games for resuming a playthrough
//! - **session**: The turn loop around a pluggable narrative generator
//!
//! ## Design Philosophy
//!
//! - **Data-Driven**: Story behavior lives in story files, not in code
//! - **Lenient**: Unknown condition and action kinds are skipped, never fatal
//! - **Deterministic**: The same state and input always fire the same events

pub mod action_interpreter;
pub mod checkpoint;
pub mod config;
pub mod event_registry;
pub mod loader;
pub mod save;
pub mod session;
pub mod trigger_evaluator;

pub use action_interpreter::*;
pub use checkpoint::*;
pub use config::*;
pub use event_registry::*;
pub use loader::*;
pub use save::*;
pub use session::*;
pub use trigger_evaluator::*;
