//! End-to-end tests for the parse → halfgames pipeline.
//!
//! Drives the compiled binary over a synthetic two-game events file: one
//! parseable game and one whose team context cannot be resolved.

use std::path::Path;
use std::process::Command;

use serde_json::{Value, json};
use tempfile::TempDir;

const HOME_TEAM: i64 = 1_610_612_744;
const AWAY_TEAM: i64 = 1_610_612_738;

fn pbp_binary() -> String {
    env!("CARGO_BIN_EXE_pbp").to_string()
}

fn good_game_rows(game_id: &str) -> Vec<Value> {
    vec![
        json!({
            "game_id": game_id, "event_num": 1, "event_type": 10,
            "period": 1, "clock": "12:00",
        }),
        json!({
            "game_id": game_id, "event_num": 2, "event_type": 1, "action_type": 1,
            "period": 1, "clock": "11:40",
            "home_description": "Doe Layup (2 PTS)",
            "score": "0 - 2", "score_margin": "2",
            "player1_id": 101, "player1_team_id": HOME_TEAM,
            "player1_team_abbreviation": "GSW",
        }),
        json!({
            "game_id": game_id, "event_num": 3, "event_type": 1, "action_type": 1,
            "period": 1, "clock": "11:20",
            "away_description": "Smith Layup (2 PTS)",
            "score": "2 - 2", "score_margin": "TIE",
            "player1_id": 201, "player1_team_id": AWAY_TEAM,
            "player1_team_abbreviation": "BOS",
        }),
        json!({
            "game_id": game_id, "event_num": 4, "event_type": 5, "action_type": 1,
            "period": 1, "clock": "11:00",
            "player1_id": 202, "player1_team_id": AWAY_TEAM,
        }),
        json!({
            "game_id": game_id, "event_num": 5, "event_type": 13,
            "period": 1, "clock": "0:00",
        }),
    ]
}

/// A game with no made baskets, so home/away cannot be resolved.
fn contextless_game_rows(game_id: &str) -> Vec<Value> {
    vec![
        json!({
            "game_id": game_id, "event_num": 1, "event_type": 10,
            "period": 1, "clock": "12:00",
        }),
        json!({
            "game_id": game_id, "event_num": 2, "event_type": 5, "action_type": 1,
            "period": 1, "clock": "11:30",
            "player1_id": 301, "player1_team_id": AWAY_TEAM,
        }),
        json!({
            "game_id": game_id, "event_num": 3, "event_type": 13,
            "period": 1, "clock": "0:00",
        }),
    ]
}

fn write_jsonl(path: &Path, rows: &[Value]) {
    let lines: Vec<String> = rows.iter().map(Value::to_string).collect();
    std::fs::write(path, lines.join("\n") + "\n").unwrap();
}

fn read_jsonl(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn parse_then_halfgames_round_trip() {
    let temp = TempDir::new().unwrap();
    let events_path = temp.path().join("events.jsonl");
    let possessions_path = temp.path().join("possessions.jsonl");
    let halfgames_path = temp.path().join("halfgames.jsonl");

    let mut rows = good_game_rows("0022100001");
    rows.extend(contextless_game_rows("0022100002"));
    write_jsonl(&events_path, &rows);

    let output = Command::new(pbp_binary())
        .arg("parse")
        .arg("--input")
        .arg(&events_path)
        .arg("--output")
        .arg(&possessions_path)
        .output()
        .expect("failed to run pbp parse");
    assert!(
        output.status.success(),
        "parse should succeed despite the contextless game: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let possessions = read_jsonl(&possessions_path);
    assert_eq!(possessions.len(), 3, "one game of three possessions");
    assert!(possessions.iter().all(|p| p["game_id"] == "0022100001"));

    let first = &possessions[0];
    assert_eq!(first["home_possession"], true);
    assert_eq!(first["shot_made"], true);
    assert_eq!(first["two_pt_attempt"], true);
    assert_eq!(first["duration"], 20);
    assert_eq!(first["league"], "nba");
    assert_eq!(first["year"], 2022);

    let last = &possessions[2];
    assert_eq!(last["turnover"], true);
    assert_eq!(last["home_possession"], false);

    let output = Command::new(pbp_binary())
        .arg("halfgames")
        .arg("--input")
        .arg(&possessions_path)
        .arg("--output")
        .arg(&halfgames_path)
        .output()
        .expect("failed to run pbp halfgames");
    assert!(
        output.status.success(),
        "halfgames should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let halfgames = read_jsonl(&halfgames_path);
    assert_eq!(halfgames.len(), 2);

    let home = &halfgames[0];
    assert_eq!(home["off_team"], "GSW");
    assert_eq!(home["def_team"], "BOS");
    assert_eq!(home["possessions"], 1);
    assert_eq!(home["points_scored"], 2);

    let away = &halfgames[1];
    assert_eq!(away["off_team"], "BOS");
    assert_eq!(away["possessions"], 2);
    assert_eq!(away["turnovers"], 1);
    assert_eq!(away["points_scored"], 2);
}

#[test]
fn fully_failed_batch_is_an_error() {
    let temp = TempDir::new().unwrap();
    let events_path = temp.path().join("events.jsonl");
    write_jsonl(&events_path, &contextless_game_rows("0022100002"));

    let output = Command::new(pbp_binary())
        .arg("parse")
        .arg("--input")
        .arg(&events_path)
        .arg("--output")
        .arg(temp.path().join("possessions.jsonl"))
        .output()
        .expect("failed to run pbp parse");
    assert!(!output.status.success());
}

#[test]
fn default_output_follows_configured_data_dir() {
    let temp = TempDir::new().unwrap();
    let events_path = temp.path().join("events.jsonl");
    write_jsonl(&events_path, &good_game_rows("0022100001"));

    let output = Command::new(pbp_binary())
        .env("PBP_DATA_DIR", temp.path())
        .arg("parse")
        .arg("--input")
        .arg(&events_path)
        .output()
        .expect("failed to run pbp parse");
    assert!(
        output.status.success(),
        "parse should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let default_path = temp.path().join("possessions").join("possessions.jsonl");
    assert_eq!(read_jsonl(&default_path).len(), 3);
}
