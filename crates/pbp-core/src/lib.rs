//! Core domain logic for basketball play-by-play parsing.
//!
//! This crate contains the fundamental types and logic for:
//! - Event preparation: deriving clocks, scores, and classifications
//!   from raw play-by-play rows
//! - Team context: resolving home/away identity for a game
//! - Possession parsing: reconstructing possessions from the event
//!   stream, with structured data-quality diagnostics

pub mod classify;
pub mod context;
pub mod event;
mod parser;
pub mod possession;
pub mod types;

pub use classify::EventClass;
pub use context::{ContextError, TeamContext};
pub use event::{Event, EventError, RawEvent, prepare_events};
pub use parser::{ParsedGame, PossessionParser, parse_game};
pub use possession::{Anomaly, AnomalyKind, Possession};
pub use types::{GameId, GameIdError, League, SeasonType};
