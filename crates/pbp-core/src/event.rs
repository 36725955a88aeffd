//! Raw play-by-play rows and the derived events the state machine reads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::EventClass;

/// Errors raised while deriving event fields from raw rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The period clock was not an `M:SS` / `MM:SS` string.
    #[error("event {event_num} has invalid clock {clock:?}")]
    InvalidClock { event_num: i64, clock: String },

    /// The score was not an `away - home` string.
    #[error("event {event_num} has invalid score {score:?}")]
    InvalidScore { event_num: i64, score: String },
}

/// One row of the upstream play-by-play feed, as deserialized from JSONL.
///
/// Optional fields are genuinely sparse upstream: descriptions only exist
/// on the side that acted, scores only on scoring plays, and the player
/// slots depend on the event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub game_id: String,
    pub event_num: i64,
    pub event_type: i64,
    #[serde(default)]
    pub action_type: i64,
    pub period: u32,
    /// Time remaining in the period, `M:SS` or `MM:SS`.
    pub clock: String,
    /// `"away - home"`, present only on rows that change the score.
    #[serde(default)]
    pub score: Option<String>,
    /// Present exactly when the row changed the score. Its presence is
    /// load-bearing for free throws; see [`EventClass::FreeThrow`].
    #[serde(default)]
    pub score_margin: Option<String>,
    #[serde(default)]
    pub home_description: Option<String>,
    #[serde(default)]
    pub away_description: Option<String>,
    #[serde(default)]
    pub player1_id: Option<i64>,
    #[serde(default)]
    pub player1_team_id: Option<i64>,
    #[serde(default)]
    pub player1_team_abbreviation: Option<String>,
    #[serde(default)]
    pub player2_id: Option<i64>,
    #[serde(default)]
    pub player2_team_id: Option<i64>,
}

/// A raw row with its derived fields, computed once by [`prepare_events`].
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_num: i64,
    pub period: u32,
    /// Seconds remaining in the period.
    pub seconds_remaining: u32,
    /// Forward-filled home score, seeded 0.
    pub home_score: u32,
    /// Forward-filled away score, seeded 0.
    pub away_score: u32,
    pub home_description: Option<String>,
    pub away_description: Option<String>,
    pub player1_id: Option<i64>,
    pub player1_team_id: Option<i64>,
    pub player1_team_abbreviation: Option<String>,
    pub player2_id: Option<i64>,
    pub player2_team_id: Option<i64>,
    pub class: EventClass,
}

/// Derives the fields the state machine needs from a raw row sequence.
///
/// Rows must already be in chronological order. This computes per row:
/// the clock as seconds remaining, the concatenated two-sided
/// description, forward-filled scores seeded at 0-0, and the
/// [`EventClass`] tag. The raw `score_margin` feeds classification but is
/// never forward-filled; a filled margin would make every free throw
/// after the first score look made.
pub fn prepare_events(rows: &[RawEvent]) -> Result<Vec<Event>, EventError> {
    let mut events = Vec::with_capacity(rows.len());
    let mut away_score = 0;
    let mut home_score = 0;
    for row in rows {
        if let Some(score) = &row.score {
            (away_score, home_score) =
                parse_score(score).ok_or_else(|| EventError::InvalidScore {
                    event_num: row.event_num,
                    score: score.clone(),
                })?;
        }
        let seconds_remaining =
            clock_to_seconds(&row.clock).ok_or_else(|| EventError::InvalidClock {
                event_num: row.event_num,
                clock: row.clock.clone(),
            })?;
        let description = concat_descriptions(row);
        let class = EventClass::of(
            row.event_type,
            row.action_type,
            &description,
            row.score_margin.is_some(),
        );
        events.push(Event {
            event_num: row.event_num,
            period: row.period,
            seconds_remaining,
            home_score,
            away_score,
            home_description: row.home_description.clone(),
            away_description: row.away_description.clone(),
            player1_id: row.player1_id,
            player1_team_id: row.player1_team_id,
            player1_team_abbreviation: row.player1_team_abbreviation.clone(),
            player2_id: row.player2_id,
            player2_team_id: row.player2_team_id,
            class,
        });
    }
    Ok(events)
}

fn concat_descriptions(row: &RawEvent) -> String {
    let home = row.home_description.as_deref().unwrap_or_default();
    let away = row.away_description.as_deref().unwrap_or_default();
    let mut description = String::with_capacity(home.len() + away.len());
    description.push_str(home);
    description.push_str(away);
    description
}

/// Parses a period clock (`M:SS` / `MM:SS`) into seconds remaining.
fn clock_to_seconds(clock: &str) -> Option<u32> {
    let (minutes, seconds) = clock.split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    Some(minutes * 60 + seconds)
}

/// Parses an `"away - home"` score string.
fn parse_score(score: &str) -> Option<(u32, u32)> {
    let (away, home) = score.split_once(" - ")?;
    Some((away.trim().parse().ok()?, home.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(event_num: i64, event_type: i64, clock: &str) -> RawEvent {
        RawEvent {
            game_id: "0022100001".into(),
            event_num,
            event_type,
            action_type: 0,
            period: 1,
            clock: clock.into(),
            score: None,
            score_margin: None,
            home_description: None,
            away_description: None,
            player1_id: None,
            player1_team_id: None,
            player1_team_abbreviation: None,
            player2_id: None,
            player2_team_id: None,
        }
    }

    #[test]
    fn clock_parses_both_widths() {
        assert_eq!(clock_to_seconds("12:00"), Some(720));
        assert_eq!(clock_to_seconds("0:07"), Some(7));
        assert_eq!(clock_to_seconds("7:30"), Some(450));
        assert_eq!(clock_to_seconds("bogus"), None);
        assert_eq!(clock_to_seconds("12"), None);
    }

    #[test]
    fn scores_forward_fill_from_zero() {
        let mut scoring = row(2, 1, "11:40");
        scoring.score = Some("0 - 2".into());
        let rows = vec![row(1, 10, "12:00"), scoring, row(3, 4, "11:20")];
        let events = prepare_events(&rows).unwrap();
        assert_eq!((events[0].away_score, events[0].home_score), (0, 0));
        assert_eq!((events[1].away_score, events[1].home_score), (0, 2));
        assert_eq!((events[2].away_score, events[2].home_score), (0, 2));
    }

    #[test]
    fn description_concat_feeds_classification() {
        let mut shot = row(5, 2, "10:00");
        shot.away_description = Some("MISS Doe 25' 3PT Jump Shot".into());
        let events = prepare_events(std::slice::from_ref(&shot)).unwrap();
        assert_eq!(events[0].class, EventClass::Miss { three: true });
    }

    #[test]
    fn score_margin_is_not_filled_forward() {
        let mut made = row(1, 3, "5:00");
        made.action_type = 11;
        made.score = Some("1 - 0".into());
        made.score_margin = Some("-1".into());
        let mut missed = row(2, 3, "5:00");
        missed.action_type = 12;
        let events = prepare_events(&[made, missed]).unwrap();
        assert_eq!(
            events[0].class,
            EventClass::FreeThrow {
                made: true,
                first: true,
                last: false,
                trip: 2,
            }
        );
        assert_eq!(
            events[1].class,
            EventClass::FreeThrow {
                made: false,
                first: false,
                last: true,
                trip: 2,
            }
        );
    }

    #[test]
    fn invalid_clock_is_an_error() {
        let bad = row(9, 4, "late");
        assert_eq!(
            prepare_events(&[bad]),
            Err(EventError::InvalidClock {
                event_num: 9,
                clock: "late".into(),
            })
        );
    }
}
