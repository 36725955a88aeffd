//! Home/away team resolution.
//!
//! The feed never states which team is which; the only reliable signal is
//! that a made basket described on the home side was scored by the home
//! team. Resolution scans for the first made basket on each side and
//! reads the shooter's team fields from those rows.

use thiserror::Error;

use crate::classify::EventClass;
use crate::event::Event;

/// Errors that make a game unparseable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// No made basket carried a description on this side.
    #[error("no made basket found for the {0} team")]
    NoMake(Side),

    /// The resolving make was missing the shooter's team fields.
    #[error("made basket {event_num} is missing {side} team identifiers")]
    MissingTeamFields { side: Side, event_num: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Home => "home",
            Self::Away => "away",
        })
    }
}

/// Team identities for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamContext {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_team: String,
    pub away_team: String,
}

impl TeamContext {
    /// Resolves both teams from a prepared event sequence.
    pub fn resolve(events: &[Event]) -> Result<Self, ContextError> {
        let (home_team_id, home_team) = resolve_side(events, Side::Home)?;
        let (away_team_id, away_team) = resolve_side(events, Side::Away)?;
        Ok(Self {
            home_team_id,
            away_team_id,
            home_team,
            away_team,
        })
    }
}

fn resolve_side(events: &[Event], side: Side) -> Result<(i64, String), ContextError> {
    let described = |event: &&Event| match side {
        Side::Home => event.home_description.is_some(),
        Side::Away => event.away_description.is_some(),
    };
    let make = events
        .iter()
        .filter(|event| matches!(event.class, EventClass::Make { .. }))
        .find(described)
        .ok_or(ContextError::NoMake(side))?;
    match (make.player1_team_id, &make.player1_team_abbreviation) {
        (Some(team_id), Some(abbreviation)) => Ok((team_id, abbreviation.clone())),
        _ => Err(ContextError::MissingTeamFields {
            side,
            event_num: make.event_num,
        }),
    }
}
