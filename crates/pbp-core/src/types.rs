//! Core identifier types with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a game id cannot be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameIdError {
    /// The id was not the expected 10-digit string.
    #[error("game id {0:?} is not a 10-digit string")]
    Malformed(String),

    /// The two-character league prefix was not recognized.
    #[error("game id {0} has unrecognized league prefix")]
    UnknownLeague(String),

    /// The season-type digit was not recognized.
    #[error("game id {0} has unrecognized season-type digit")]
    UnknownSeasonType(String),
}

/// League encoded in the game id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    Nba,
    Wnba,
}

impl League {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nba => "nba",
            Self::Wnba => "wnba",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portion of the season a game belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonType {
    #[serde(rename = "Regular Season")]
    RegularSeason,
    #[serde(rename = "Playoffs")]
    Playoffs,
    #[serde(rename = "Play In")]
    PlayIn,
}

impl SeasonType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RegularSeason => "Regular Season",
            Self::Playoffs => "Playoffs",
            Self::PlayIn => "Play In",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-digit years below this are 20xx, at or above are 19xx.
const YEAR_CUTOFF: i32 = 80;

/// A validated upstream game identifier.
///
/// Game ids are 10-digit strings whose leading characters encode the
/// league, season type, and season year. Validation happens once at
/// construction so the accessors are infallible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameId(String);

impl GameId {
    /// Creates a game id after validating its encoded fields.
    pub fn new(id: impl Into<String>) -> Result<Self, GameIdError> {
        let id = id.into();
        if id.len() != 10 || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GameIdError::Malformed(id));
        }
        match &id[..2] {
            "00" | "10" => {}
            _ => return Err(GameIdError::UnknownLeague(id)),
        }
        match &id[2..3] {
            "2" | "4" | "5" => {}
            _ => return Err(GameIdError::UnknownSeasonType(id)),
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// League encoded in the id prefix.
    #[must_use]
    pub fn league(&self) -> League {
        match &self.0[..2] {
            "00" => League::Nba,
            _ => League::Wnba,
        }
    }

    /// Season year encoded in the id.
    ///
    /// NBA seasons span two calendar years and are labeled by the later
    /// one, so the encoded two-digit year is bumped for everything but
    /// the WNBA.
    #[must_use]
    pub fn year(&self) -> i32 {
        let digits: i32 = self.0[3..5].parse().unwrap_or(0);
        let century = if digits < YEAR_CUTOFF { 2000 } else { 1900 };
        let offset = i32::from(self.league() != League::Wnba);
        century + digits + offset
    }

    /// Season type encoded in the third digit.
    #[must_use]
    pub fn season_type(&self) -> SeasonType {
        match &self.0[2..3] {
            "2" => SeasonType::RegularSeason,
            "4" => SeasonType::Playoffs,
            _ => SeasonType::PlayIn,
        }
    }
}

impl TryFrom<String> for GameId {
    type Error = GameIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GameId> for String {
    fn from(id: GameId) -> Self {
        id.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GameId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nba_regular_season_id() {
        let id = GameId::new("0022100001").unwrap();
        assert_eq!(id.league(), League::Nba);
        assert_eq!(id.season_type(), SeasonType::RegularSeason);
        assert_eq!(id.year(), 2022);
    }

    #[test]
    fn wnba_year_has_no_offset() {
        let id = GameId::new("1022100001").unwrap();
        assert_eq!(id.league(), League::Wnba);
        assert_eq!(id.year(), 2021);
    }

    #[test]
    fn century_cutoff_maps_old_seasons() {
        let id = GameId::new("0029900001").unwrap();
        assert_eq!(id.year(), 2000);
        let id = GameId::new("0028500001").unwrap();
        assert_eq!(id.year(), 1986);
    }

    #[test]
    fn playoffs_and_play_in_digits() {
        assert_eq!(
            GameId::new("0042100401").unwrap().season_type(),
            SeasonType::Playoffs
        );
        assert_eq!(
            GameId::new("0052100001").unwrap().season_type(),
            SeasonType::PlayIn
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(
            GameId::new("2210001"),
            Err(GameIdError::Malformed(_))
        ));
        assert!(matches!(
            GameId::new("00221000ab"),
            Err(GameIdError::Malformed(_))
        ));
        assert!(matches!(
            GameId::new("9922100001"),
            Err(GameIdError::UnknownLeague(_))
        ));
        assert!(matches!(
            GameId::new("0032100001"),
            Err(GameIdError::UnknownSeasonType(_))
        ));
    }

    #[test]
    fn serde_roundtrip_validates() {
        let id = GameId::new("0022100001").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0022100001\"");
        let parsed: GameId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);

        let bad: Result<GameId, _> = serde_json::from_str("\"bogus\"");
        assert!(bad.is_err());
    }

    #[test]
    fn season_type_serde_uses_display_strings() {
        let json = serde_json::to_string(&SeasonType::RegularSeason).unwrap();
        assert_eq!(json, "\"Regular Season\"");
        let parsed: SeasonType = serde_json::from_str("\"Play In\"").unwrap();
        assert_eq!(parsed, SeasonType::PlayIn);
    }
}
