//! Aggregation of possessions into halfgames.
//!
//! A halfgame is one team's offense for one game, so every game yields
//! two rows. Counting stats are summed from the possession flags, then
//! rate statistics and closed-form estimates are derived. Any rate whose
//! denominator is zero is `None` rather than NaN.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use pbp_core::{GameId, League, Possession, SeasonType};

/// One team's offensive half of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Halfgame {
    pub game_id: GameId,
    pub league: League,
    pub year: i32,
    pub season_type: SeasonType,
    pub off_team: String,
    pub def_team: String,
    pub home_offense: bool,
    /// Highest period any possession reached.
    pub periods: u32,
    pub possessions: u32,
    pub turnovers: u32,
    pub threes_attempted: u32,
    pub threes_made: u32,
    pub twos_attempted: u32,
    pub twos_made: u32,
    pub ft_attempted: u32,
    pub ft_made: u32,
    pub off_rebs: u32,
    pub def_rebs: u32,
    pub points_scored: u32,
    /// Total offensive seconds.
    pub duration: i64,

    pub three_make_rate: Option<f64>,
    pub two_make_rate: Option<f64>,
    pub three_attempt_rate: Option<f64>,
    pub ft_attempt_rate: Option<f64>,
    pub ft_make_rate: Option<f64>,
    pub off_reb_rate: Option<f64>,
    pub turnover_rate: Option<f64>,
    /// Seconds per possession.
    pub pace: Option<f64>,
    pub shots_per_opp: Option<f64>,
    pub shots_per_poss: Option<f64>,
    pub scoring_rate: Option<f64>,

    pub shots_per_opp_est: Option<f64>,
    pub shots_per_poss_est: Option<f64>,
    pub scoring_rate_est: Option<f64>,
}

#[derive(Debug, Default)]
struct Totals {
    periods: u32,
    possessions: u32,
    turnovers: u32,
    threes_attempted: u32,
    threes_made: u32,
    twos_attempted: u32,
    twos_made: u32,
    ft_attempted: u32,
    ft_made: u32,
    off_rebs: u32,
    off_opportunities: u32,
    points_scored: u32,
    duration: i64,
}

impl Totals {
    fn add(&mut self, possession: &Possession) {
        self.possessions += 1;
        self.periods = self.periods.max(possession.period);
        self.turnovers += u32::from(possession.turnover);
        self.threes_attempted += u32::from(possession.three_pt_attempt);
        self.threes_made += u32::from(possession.three_pt_attempt && possession.shot_made);
        self.twos_attempted += u32::from(possession.two_pt_attempt);
        self.twos_made += u32::from(possession.two_pt_attempt && possession.shot_made);
        self.ft_attempted += possession.fta;
        self.ft_made += possession.ftm;
        self.off_opportunities += u32::from(possession.reboundable);
        self.off_rebs += u32::from(possession.reboundable && possession.off_rebound);
        self.points_scored += possession.points();
        self.duration += possession.duration;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "durations are small second counts, far below f64 precision limits"
    )]
    fn finish(self, first: &Possession, home_offense: bool) -> Halfgame {
        let (off_team, def_team) = if home_offense {
            (first.home_team.clone(), first.away_team.clone())
        } else {
            (first.away_team.clone(), first.home_team.clone())
        };
        let def_rebs = self.off_opportunities - self.off_rebs;
        let shot_attempts = self.twos_attempted + self.threes_attempted;

        let three_make_rate = ratio(self.threes_made, self.threes_attempted);
        let two_make_rate = ratio(self.twos_made, self.twos_attempted);
        let three_attempt_rate = ratio(self.threes_attempted, shot_attempts);
        let ft_attempt_rate = ratio(self.ft_attempted, self.possessions);
        let ft_make_rate = ratio(self.ft_made, self.ft_attempted);
        let off_reb_rate = ratio(self.off_rebs, self.off_opportunities);
        let turnover_rate = ratio(self.turnovers, self.possessions);
        let pace = if self.possessions == 0 {
            None
        } else {
            Some(self.duration as f64 / f64::from(self.possessions))
        };
        let shots_per_opp = ratio(shot_attempts, self.off_rebs + self.possessions);
        let shots_per_poss = ratio(shot_attempts, self.possessions);
        let scoring_rate = ratio(self.points_scored, self.possessions);

        let shots_per_opp_est = match (turnover_rate, ft_attempt_rate) {
            (Some(tor), Some(ftar)) => Some(estimate_shots_per_opp(tor, ftar)),
            _ => None,
        };
        let shots_per_poss_est = match (
            shots_per_opp_est,
            three_attempt_rate,
            three_make_rate,
            two_make_rate,
            off_reb_rate,
        ) {
            (Some(spo), Some(tar), Some(tmr), Some(wmr), Some(orr)) => {
                Some(estimate_shots_per_poss(spo, tar, tmr, wmr, orr))
            }
            _ => None,
        };
        let scoring_rate_est = match (
            shots_per_poss_est,
            three_make_rate,
            two_make_rate,
            three_attempt_rate,
            ft_attempt_rate,
            ft_make_rate,
        ) {
            (Some(spp), Some(tmr), Some(wmr), Some(tar), Some(ftar), Some(ftmr)) => {
                Some(calc_scoring_rate(spp, tmr, wmr, tar, ftar, ftmr))
            }
            _ => None,
        };

        Halfgame {
            game_id: first.game_id.clone(),
            league: first.league,
            year: first.year,
            season_type: first.season_type,
            off_team,
            def_team,
            home_offense,
            periods: self.periods,
            possessions: self.possessions,
            turnovers: self.turnovers,
            threes_attempted: self.threes_attempted,
            threes_made: self.threes_made,
            twos_attempted: self.twos_attempted,
            twos_made: self.twos_made,
            ft_attempted: self.ft_attempted,
            ft_made: self.ft_made,
            off_rebs: self.off_rebs,
            def_rebs,
            points_scored: self.points_scored,
            duration: self.duration,
            three_make_rate,
            two_make_rate,
            three_attempt_rate,
            ft_attempt_rate,
            ft_make_rate,
            off_reb_rate,
            turnover_rate,
            pace,
            shots_per_opp,
            shots_per_poss,
            scoring_rate,
            shots_per_opp_est,
            shots_per_poss_est,
            scoring_rate_est,
        }
    }
}

fn ratio(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(f64::from(numerator) / f64::from(denominator))
    }
}

/// Groups possessions by game and offense, producing two halfgames per
/// game in first-seen order.
#[must_use]
pub fn halfgames_from_possessions(possessions: &[Possession]) -> Vec<Halfgame> {
    let mut order: Vec<(Totals, &Possession, bool)> = Vec::new();
    let mut index: HashMap<(&str, bool), usize> = HashMap::new();
    for possession in possessions {
        let key = (possession.game_id.as_str(), possession.home_possession);
        let slot = *index.entry(key).or_insert_with(|| {
            order.push((Totals::default(), possession, possession.home_possession));
            order.len() - 1
        });
        order[slot].0.add(possession);
    }
    order
        .into_iter()
        .map(|(totals, first, home_offense)| totals.finish(first, home_offense))
        .collect()
}

/// Estimates shot attempts per opportunity (possessions plus offensive
/// rebounds). Coefficients are rounded from a least-squares regression
/// over regular-season data.
#[must_use]
pub fn estimate_shots_per_opp(turnover_rate: f64, ft_attempt_rate: f64) -> f64 {
    0.4f64.mul_add(-ft_attempt_rate, 0.85f64.mul_add(-turnover_rate, 1.0))
}

/// Estimates shot attempts per possession, accounting for misses the
/// offense rebounds into fresh opportunities.
#[must_use]
pub fn estimate_shots_per_poss(
    shots_per_opp: f64,
    three_attempt_rate: f64,
    three_make_rate: f64,
    two_make_rate: f64,
    off_reb_rate: f64,
) -> f64 {
    let no_shots_per_opp = 1.0 - shots_per_opp;
    let make_rate = three_attempt_rate * three_make_rate + (1.0 - three_attempt_rate) * two_make_rate;
    let miss_rate = 1.0 - make_rate;
    let def_reb_rate = 1.0 - off_reb_rate;

    let restart_possession = shots_per_opp * miss_rate * off_reb_rate;
    let last_shot =
        shots_per_opp * (make_rate + miss_rate * (def_reb_rate + off_reb_rate * no_shots_per_opp));
    last_shot / (1.0 - restart_possession).powi(2)
}

/// Points per possession from underlying rate statistics.
#[must_use]
pub fn calc_scoring_rate(
    shots_per_poss: f64,
    three_make_rate: f64,
    two_make_rate: f64,
    three_attempt_rate: f64,
    ft_attempt_rate: f64,
    ft_make_rate: f64,
) -> f64 {
    let points_per_attempt = 3.0 * three_attempt_rate * three_make_rate
        + 2.0 * (1.0 - three_attempt_rate) * two_make_rate;
    shots_per_poss * points_per_attempt + ft_attempt_rate * ft_make_rate
}
