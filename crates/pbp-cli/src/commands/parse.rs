//! Parse command: raw play-by-play rows in, possessions out.
//!
//! Rows are grouped by game id in first-seen order and whole games are
//! parsed in parallel. Games that cannot be parsed (bad id, malformed
//! rows, unresolvable team context) are logged and skipped; the batch
//! only fails when nothing parses at all.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use pbp_core::{GameId, ParsedGame, RawEvent, TeamContext, parse_game, prepare_events};

use crate::Config;

pub fn run(input: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    let rows = read_rows(input)?;
    let games = group_by_game(rows);
    if games.is_empty() {
        bail!("no events found in {}", input.display());
    }

    let total_games = games.len();
    let parsed: Vec<ParsedGame> = games
        .par_iter()
        .map(|(game_id, rows)| parse_one(game_id, rows))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();
    if parsed.is_empty() {
        bail!("none of the {total_games} games in {} could be parsed", input.display());
    }

    let path = output.map_or_else(|| config.possessions_path(), Path::to_path_buf);
    let possessions: usize = parsed.iter().map(|game| game.possessions.len()).sum();
    let anomalies: usize = parsed.iter().map(|game| game.anomalies.len()).sum();
    write_possessions(&path, &parsed)?;
    info!(
        games = parsed.len(),
        skipped = total_games - parsed.len(),
        possessions,
        anomalies,
        output = %path.display(),
        "parse complete",
    );
    Ok(())
}

fn parse_one(game_id: &str, rows: &[RawEvent]) -> Option<ParsedGame> {
    let game_id = match GameId::new(game_id) {
        Ok(game_id) => game_id,
        Err(error) => {
            warn!(%error, "skipping game with unrecognized id");
            return None;
        }
    };
    let events = match prepare_events(rows) {
        Ok(events) => events,
        Err(error) => {
            warn!(game_id = %game_id, %error, "skipping game with malformed rows");
            return None;
        }
    };
    let context = match TeamContext::resolve(&events) {
        Ok(context) => context,
        Err(error) => {
            warn!(game_id = %game_id, %error, "skipping game without team context");
            return None;
        }
    };
    let parsed = parse_game(&game_id, &context, &events);
    debug!(
        game_id = %game_id,
        possessions = parsed.possessions.len(),
        anomalies = parsed.anomalies.len(),
        "game parsed",
    );
    Some(parsed)
}

fn read_rows(path: &Path) -> Result<Vec<RawEvent>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: RawEvent = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed event row", path.display(), number + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Groups rows by game id, preserving the order games first appear.
fn group_by_game(rows: Vec<RawEvent>) -> Vec<(String, Vec<RawEvent>)> {
    let mut games: Vec<(String, Vec<RawEvent>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let slot = match index.get(&row.game_id) {
            Some(&slot) => slot,
            None => {
                index.insert(row.game_id.clone(), games.len());
                games.push((row.game_id.clone(), Vec::new()));
                games.len() - 1
            }
        };
        games[slot].1.push(row);
    }
    games
}

fn write_possessions(path: &Path, parsed: &[ParsedGame]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for game in parsed {
        for possession in &game.possessions {
            serde_json::to_writer(&mut writer, possession)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
