//! Event classification as the single source of truth for event tags.
//!
//! Every raw row is tagged with one [`EventClass`] during preprocessing,
//! so the state machine dispatches on a closed enum instead of re-deriving
//! predicates from type codes in every phase.

/// Primary event type codes from the upstream feed.
const TYPE_MAKE: i64 = 1;
const TYPE_MISS: i64 = 2;
const TYPE_FREE_THROW: i64 = 3;
const TYPE_REBOUND: i64 = 4;
const TYPE_TURNOVER: i64 = 5;
const TYPE_FOUL: i64 = 6;
const TYPE_JUMP_BALL: i64 = 10;
const TYPE_END_OF_PERIOD: i64 = 13;

/// Free-throw subtypes awarded for technical fouls; these belong to no
/// possession and are invisible to the state machine.
const TECHNICAL_FT_ACTIONS: &[i64] = &[16, 21, 22];

/// Free-throw subtypes that open a trip ("1 of 2", "1 of 3", ...).
const FIRST_FT_ACTIONS: &[i64] = &[10, 11, 13, 18, 20, 21, 25, 27];

/// Free-throw subtypes that close a trip ("1 of 1", "2 of 2", ...).
const LAST_FT_ACTIONS: &[i64] = &[10, 12, 15, 19, 20, 22, 26, 29];

/// Trip sizes by subtype; anything not listed is a 3-shot trip.
const ONE_SHOT_TRIP_ACTIONS: &[i64] = &[10, 20];
const TWO_SHOT_TRIP_ACTIONS: &[i64] = &[11, 12, 18, 19, 21, 22, 25, 26];

/// Shooting foul and shooting block foul.
const SHOOTING_FOUL_ACTIONS: &[i64] = &[2, 29];

/// Charges never award free throws; technicals are ignored outright.
const NO_FT_FOUL_ACTIONS: &[i64] = &[26, 11];

/// Inbound, clear-path, and flagrant 1/2 fouls always award free throws.
const ALWAYS_FT_FOUL_ACTIONS: &[i64] = &[5, 6, 9, 14, 15];

/// Marker in the description text for a three-point attempt. The feed has
/// no numeric flag for shot value, so the text is the only signal.
const THREE_POINT_MARKER: &str = " 3PT ";

/// Marker in the description text for a team-in-the-penalty foul.
const PENALTY_MARKER: &str = ".PN)";

/// Classification of a single play-by-play row.
///
/// Computed once per row by [`EventClass::of`]; total over any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// Made field goal.
    Make { three: bool },
    /// Missed field goal.
    Miss { three: bool },
    /// Non-technical free-throw attempt with its position in the trip.
    ///
    /// `made` reflects the presence of the raw score-margin field: the
    /// upstream feed omits it on misses. This is an encoding quirk of the
    /// source, not a null check.
    FreeThrow {
        made: bool,
        first: bool,
        last: bool,
        trip: u8,
    },
    /// Technical free throw; belongs to no possession.
    TechnicalFreeThrow,
    Rebound,
    Turnover,
    /// Personal foul with its possession-relevant qualities.
    Foul { shooting: bool, awards_fts: bool },
    JumpBall,
    EndOfPeriod,
    /// Anything else (substitutions, timeouts, violations, ...).
    Other,
}

impl EventClass {
    /// Classifies a row from its type code, subtype code, concatenated
    /// description, and whether the raw score-margin field was present.
    #[must_use]
    pub fn of(
        event_type: i64,
        action_type: i64,
        description: &str,
        has_score_margin: bool,
    ) -> Self {
        match event_type {
            TYPE_MAKE => Self::Make {
                three: description.contains(THREE_POINT_MARKER),
            },
            TYPE_MISS => Self::Miss {
                three: description.contains(THREE_POINT_MARKER),
            },
            TYPE_FREE_THROW => {
                if TECHNICAL_FT_ACTIONS.contains(&action_type) {
                    Self::TechnicalFreeThrow
                } else {
                    Self::FreeThrow {
                        made: has_score_margin,
                        first: FIRST_FT_ACTIONS.contains(&action_type),
                        last: LAST_FT_ACTIONS.contains(&action_type),
                        trip: trip_size(action_type),
                    }
                }
            }
            TYPE_REBOUND => Self::Rebound,
            TYPE_TURNOVER => Self::Turnover,
            TYPE_FOUL => Self::Foul {
                shooting: SHOOTING_FOUL_ACTIONS.contains(&action_type),
                awards_fts: foul_awards_free_throws(action_type, description),
            },
            TYPE_JUMP_BALL => Self::JumpBall,
            TYPE_END_OF_PERIOD => Self::EndOfPeriod,
            _ => Self::Other,
        }
    }

    /// Whether this event can terminate a possession.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(
            self,
            Self::Make { .. }
                | Self::Miss { .. }
                | Self::Turnover
                | Self::Foul { shooting: true, .. }
                | Self::Foul {
                    awards_fts: true,
                    ..
                }
                | Self::EndOfPeriod
        )
    }

    /// Whether this is a non-technical free-throw attempt.
    #[must_use]
    pub const fn is_free_throw_attempt(self) -> bool {
        matches!(self, Self::FreeThrow { .. })
    }

    /// Whether this is a shooting foul (including shooting block fouls).
    #[must_use]
    pub const fn is_shooting_foul(self) -> bool {
        matches!(self, Self::Foul { shooting: true, .. })
    }
}

/// Number of free throws in the trip this attempt belongs to.
fn trip_size(action_type: i64) -> u8 {
    if ONE_SHOT_TRIP_ACTIONS.contains(&action_type) {
        1
    } else if TWO_SHOT_TRIP_ACTIONS.contains(&action_type) {
        2
    } else {
        3
    }
}

/// Whether a foul awards free throws without being a shooting foul.
fn foul_awards_free_throws(action_type: i64, description: &str) -> bool {
    if NO_FT_FOUL_ACTIONS.contains(&action_type) {
        return false;
    }
    if ALWAYS_FT_FOUL_ACTIONS.contains(&action_type) {
        return true;
    }
    description.contains(PENALTY_MARKER)
}
