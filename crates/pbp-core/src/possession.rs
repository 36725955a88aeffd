//! The possession output record and parser diagnostics.

use serde::{Deserialize, Serialize};

use crate::types::{GameId, League, SeasonType};

/// One reconstructed possession.
///
/// `time` and `period` are the start state (inherited from the event that
/// ended the previous possession); the outcome flags describe how this
/// possession ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Possession {
    pub game_id: GameId,
    pub league: League,
    pub year: i32,
    pub season_type: SeasonType,
    pub home_team: String,
    pub away_team: String,
    /// Seconds remaining in the period when the possession started.
    pub time: u32,
    pub period: u32,
    /// Home score when the possession started.
    pub home_score: u32,
    /// Away score when the possession started.
    pub away_score: u32,
    /// Elapsed game seconds, start state minus terminating event clock.
    pub duration: i64,
    /// Whether the home team had the ball.
    pub home_possession: bool,
    pub turnover: bool,
    pub two_pt_attempt: bool,
    pub three_pt_attempt: bool,
    pub shot_made: bool,
    /// Free throws attempted.
    pub fta: u32,
    /// Free throws made.
    pub ftm: u32,
    /// Whether the possession ended with a live rebound opportunity.
    pub reboundable: bool,
    /// Whether the offense kept the ball off that rebound opportunity.
    pub off_rebound: bool,
}

impl Possession {
    /// Points the offense scored on this possession, reconstructed from
    /// the outcome flags.
    #[must_use]
    pub fn points(&self) -> u32 {
        let field_goal = if !self.shot_made {
            0
        } else if self.three_pt_attempt {
            3
        } else {
            2
        };
        field_goal + self.ftm
    }
}

/// A data-quality irregularity the parser recovered from.
///
/// Anomalies never abort a parse; they are collected alongside the
/// possessions and logged as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Event the anomaly was detected at.
    pub event_num: i64,
    pub period: u32,
    pub seconds_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// A free throw appeared with no foul in flight.
    OrphanFreeThrow,
    /// A free-throw trip was interrupted before its final attempt.
    MissingFinalFreeThrow,
    /// A missed shot was followed by another possession-ender with no
    /// rebound in between.
    MissingRebound,
}

impl AnomalyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrphanFreeThrow => "orphan free throw",
            Self::MissingFinalFreeThrow => "missing final free throw",
            Self::MissingRebound => "missing rebound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameId;

    fn possession() -> Possession {
        let game_id = GameId::new("0022100001").unwrap();
        Possession {
            league: game_id.league(),
            year: game_id.year(),
            season_type: game_id.season_type(),
            game_id,
            home_team: "GSW".into(),
            away_team: "BOS".into(),
            time: 720,
            period: 1,
            home_score: 0,
            away_score: 0,
            duration: 14,
            home_possession: true,
            turnover: false,
            two_pt_attempt: false,
            three_pt_attempt: false,
            shot_made: false,
            fta: 0,
            ftm: 0,
            reboundable: false,
            off_rebound: false,
        }
    }

    #[test]
    fn points_from_outcome_flags() {
        let mut poss = possession();
        assert_eq!(poss.points(), 0);

        poss.three_pt_attempt = true;
        poss.shot_made = true;
        poss.fta = 1;
        poss.ftm = 1;
        assert_eq!(poss.points(), 4);

        poss.three_pt_attempt = false;
        poss.two_pt_attempt = true;
        assert_eq!(poss.points(), 3);

        poss.shot_made = false;
        assert_eq!(poss.points(), 1);
    }

    #[test]
    fn serializes_with_derived_game_fields() {
        let json = serde_json::to_value(possession()).unwrap();
        assert_eq!(json["game_id"], "0022100001");
        assert_eq!(json["league"], "nba");
        assert_eq!(json["year"], 2022);
        assert_eq!(json["season_type"], "Regular Season");
    }
}
