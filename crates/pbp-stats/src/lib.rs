//! Rate-statistic aggregation over parsed possessions.
//!
//! Builds halfgame rows (one per team-offense per game) from the
//! possession records produced by `pbp-core`.

pub mod halfgame;

pub use halfgame::{
    Halfgame, calc_scoring_rate, estimate_shots_per_opp, estimate_shots_per_poss,
    halfgames_from_possessions,
};
