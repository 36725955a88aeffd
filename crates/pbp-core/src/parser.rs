//! The possession state machine.
//!
//! A single pass over a prepared event slice, yielding possessions as
//! they close. Each possession template inherits its start state (clock,
//! period, scores) from the event that ended the previous possession.
//!
//! The machine holds a pull cursor plus a one-slot held index. Most close
//! paths pull the successor event and hold it for the next possession;
//! the turnover-during-free-throws path instead holds the foul event
//! itself, which sits *behind* the cursor, so the foul is reprocessed as
//! the next possession's opener without rewinding the scan.

use tracing::warn;

use crate::classify::EventClass;
use crate::context::TeamContext;
use crate::event::Event;
use crate::possession::{Anomaly, AnomalyKind, Possession};
use crate::types::GameId;

/// Everything a single game parse produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGame {
    pub possessions: Vec<Possession>,
    pub anomalies: Vec<Anomaly>,
}

/// Runs the state machine over a whole game.
#[must_use]
pub fn parse_game(game_id: &GameId, context: &TeamContext, events: &[Event]) -> ParsedGame {
    let mut parser = PossessionParser::new(game_id.clone(), context, events);
    let possessions = parser.by_ref().collect();
    ParsedGame {
        possessions,
        anomalies: parser.into_anomalies(),
    }
}

/// Lazy possession iterator over one game's prepared events.
pub struct PossessionParser<'a> {
    game_id: GameId,
    context: &'a TeamContext,
    events: &'a [Event],
    /// Next index to pull; only ever advances.
    cursor: usize,
    /// Index to examine before pulling again. May sit behind the cursor.
    held: Option<usize>,
    /// Start state for the possession currently being resolved. `None`
    /// once the stream is exhausted.
    template: Option<Possession>,
    anomalies: Vec<Anomaly>,
}

impl<'a> PossessionParser<'a> {
    #[must_use]
    pub fn new(game_id: GameId, context: &'a TeamContext, events: &'a [Event]) -> Self {
        let mut parser = Self {
            game_id,
            context,
            events,
            cursor: 0,
            held: None,
            template: None,
            anomalies: Vec::new(),
        };
        if !events.is_empty() {
            parser.template = Some(parser.template_at(0));
            parser.held = Some(0);
            parser.cursor = 1;
        }
        parser
    }

    /// Anomalies recorded so far.
    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    #[must_use]
    pub fn into_anomalies(self) -> Vec<Anomaly> {
        self.anomalies
    }

    fn pull(&mut self) -> Option<usize> {
        if self.cursor < self.events.len() {
            self.cursor += 1;
            Some(self.cursor - 1)
        } else {
            None
        }
    }

    fn is_home(&self, team_id: Option<i64>) -> bool {
        team_id == Some(self.context.home_team_id)
    }

    /// A fresh possession starting at `events[index]`'s end state.
    fn template_at(&self, index: usize) -> Possession {
        let event = &self.events[index];
        Possession {
            game_id: self.game_id.clone(),
            league: self.game_id.league(),
            year: self.game_id.year(),
            season_type: self.game_id.season_type(),
            home_team: self.context.home_team.clone(),
            away_team: self.context.away_team.clone(),
            time: event.seconds_remaining,
            period: event.period,
            home_score: event.home_score,
            away_score: event.away_score,
            duration: 0,
            home_possession: false,
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

    fn record(&mut self, kind: AnomalyKind, index: usize) {
        let event = &self.events[index];
        warn!(
            game_id = %self.game_id,
            event_num = event.event_num,
            period = event.period,
            "{}", kind.as_str(),
        );
        self.anomalies.push(Anomaly {
            kind,
            event_num: event.event_num,
            period: event.period,
            seconds_remaining: event.seconds_remaining,
        });
    }

    /// Scans past a made shot for a shooting foul on the same shooter.
    ///
    /// A matching foul continues this possession into the free-throw
    /// sequence; any other actionable event closes the possession at the
    /// shot's clock and opens the next one.
    fn lookahead_and_one(&mut self, shot_index: usize, mut possession: Possession) -> Option<Possession> {
        let shooter = self.events[shot_index].player1_id;
        loop {
            let index = self.pull()?;
            let class = self.events[index].class;
            if class.is_shooting_foul() && self.events[index].player2_id == shooter {
                return self.resolve_free_throws(index, possession);
            }
            if class.is_actionable() {
                assign_duration(&mut possession, &self.events[shot_index]);
                self.held = Some(index);
                self.template = Some(self.template_at(shot_index));
                return Some(possession);
            }
        }
    }

    /// Accumulates the free throws awarded by the foul at `foul_index`.
    fn resolve_free_throws(&mut self, foul_index: usize, mut possession: Possession) -> Option<Possession> {
        let shooter = self.events[foul_index].player2_id;
        let fouler = self.events[foul_index].player1_id;
        // A shooting foul on a missed or uncounted shot carries the shot
        // type in its trip size: three free throws means a three.
        let mut assign_shot_type = self.events[foul_index].class.is_shooting_foul()
            && !(possession.two_pt_attempt || possession.three_pt_attempt);
        loop {
            let index = self.pull()?;
            let class = self.events[index].class;
            match class {
                EventClass::FreeThrow {
                    made,
                    first,
                    last,
                    trip,
                } if self.events[index].player1_id == shooter || shooter.is_none() => {
                    if assign_shot_type && first {
                        let three = trip == 3;
                        possession.three_pt_attempt = three;
                        possession.two_pt_attempt = !three;
                        assign_shot_type = false;
                    }
                    possession.fta += 1;
                    if made {
                        possession.ftm += 1;
                    }
                    if last {
                        if made {
                            assign_duration(&mut possession, &self.events[index]);
                            let next_index = self.pull()?;
                            self.held = Some(next_index);
                            self.template = Some(self.template_at(index));
                            return Some(possession);
                        }
                        return self.resolve_rebound(index, possession);
                    }
                }
                // A foul awarding free throws can precede a turnover by
                // the fouler. The turnover closes this possession and the
                // foul itself reopens as the next possession's trigger.
                EventClass::Turnover if self.events[index].player1_id == fouler => {
                    possession.home_possession = self.is_home(self.events[index].player1_team_id);
                    possession.turnover = true;
                    assign_duration(&mut possession, &self.events[index]);
                    self.held = Some(foul_index);
                    self.template = Some(self.template_at(foul_index));
                    return Some(possession);
                }
                _ if class.is_actionable() => {
                    self.record(AnomalyKind::MissingFinalFreeThrow, foul_index);
                    assign_duration(&mut possession, &self.events[foul_index]);
                    self.held = Some(index);
                    self.template = Some(self.template_at(foul_index));
                    return Some(possession);
                }
                _ => {}
            }
        }
    }

    /// Resolves who ends up with the ball after a missed shot or missed
    /// final free throw. Fouls during the scramble count as the rebound.
    fn resolve_rebound(&mut self, shot_index: usize, mut possession: Possession) -> Option<Possession> {
        let shooting_team = self.events[shot_index].player1_team_id;
        loop {
            let index = self.pull()?;
            let class = self.events[index].class;
            match class {
                EventClass::Rebound => {
                    possession.reboundable = true;
                    possession.off_rebound = self.matches_shooting_team(index, shooting_team);
                    assign_duration(&mut possession, &self.events[index]);
                    let next_index = self.pull()?;
                    self.held = Some(next_index);
                    self.template = Some(self.template_at(index));
                    return Some(possession);
                }
                EventClass::Foul { .. } => {
                    possession.reboundable = true;
                    // The first player slot on a foul is the fouler, so
                    // the other side comes away with the ball.
                    possession.off_rebound = !self.matches_shooting_team(index, shooting_team);
                    assign_duration(&mut possession, &self.events[index]);
                    if class.is_actionable() {
                        // Foul awards free throws: it closes this
                        // possession and triggers the next one.
                        self.held = Some(index);
                    } else {
                        let next_index = self.pull()?;
                        self.held = Some(next_index);
                    }
                    self.template = Some(self.template_at(index));
                    return Some(possession);
                }
                EventClass::EndOfPeriod => {
                    // The possession carries a real shot attempt, so it
                    // is emitted even though the period expired on it.
                    // The next template starts at the first event after
                    // the boundary, never at the boundary itself.
                    assign_duration(&mut possession, &self.events[index]);
                    let next_index = self.pull()?;
                    self.held = Some(next_index);
                    self.template = Some(self.template_at(next_index));
                    return Some(possession);
                }
                _ if class.is_actionable() => {
                    self.record(AnomalyKind::MissingRebound, shot_index);
                    assign_duration(&mut possession, &self.events[shot_index]);
                    self.held = Some(index);
                    self.template = Some(self.template_at(shot_index));
                    return Some(possession);
                }
                _ => {}
            }
        }
    }

    fn matches_shooting_team(&self, index: usize, shooting_team: Option<i64>) -> bool {
        let event = &self.events[index];
        // Team rebounds credit the team id through the player slot.
        shooting_team.is_some()
            && (shooting_team == event.player1_team_id || shooting_team == event.player1_id)
    }
}

impl Iterator for PossessionParser<'_> {
    type Item = Possession;

    fn next(&mut self) -> Option<Possession> {
        let mut possession = self.template.take()?;
        loop {
            let index = match self.held.take() {
                Some(index) => index,
                None => self.pull()?,
            };
            let class = self.events[index].class;
            match class {
                EventClass::Turnover => {
                    possession.turnover = true;
                    possession.home_possession = self.is_home(self.events[index].player1_team_id);
                    assign_duration(&mut possession, &self.events[index]);
                    let next_index = self.pull()?;
                    self.held = Some(next_index);
                    self.template = Some(self.template_at(index));
                    return Some(possession);
                }
                EventClass::Make { three } => {
                    possession.three_pt_attempt = three;
                    possession.two_pt_attempt = !three;
                    possession.shot_made = true;
                    possession.home_possession = self.is_home(self.events[index].player1_team_id);
                    return self.lookahead_and_one(index, possession);
                }
                EventClass::Miss { three } => {
                    possession.three_pt_attempt = three;
                    possession.two_pt_attempt = !three;
                    possession.home_possession = self.is_home(self.events[index].player1_team_id);
                    return self.resolve_rebound(index, possession);
                }
                EventClass::Foul { shooting: true, .. } => {
                    possession.home_possession = self.is_home(self.events[index].player2_team_id);
                    return self.resolve_free_throws(index, possession);
                }
                EventClass::Foul {
                    awards_fts: true, ..
                } => {
                    possession.home_possession = !self.is_home(self.events[index].player1_team_id);
                    return self.resolve_free_throws(index, possession);
                }
                EventClass::EndOfPeriod => {
                    // Possessions closed only by the period are dropped;
                    // restart the template at the next event.
                    let next_index = self.pull()?;
                    possession = self.template_at(next_index);
                    self.held = Some(next_index);
                }
                EventClass::FreeThrow { .. } => {
                    self.record(AnomalyKind::OrphanFreeThrow, index);
                }
                _ => {}
            }
        }
    }
}

fn assign_duration(possession: &mut Possession, event: &Event) {
    possession.duration = i64::from(possession.time) - i64::from(event.seconds_remaining);
}
