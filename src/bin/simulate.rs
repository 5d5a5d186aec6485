use chrono::{SecondsFormat, Utc};
use clap::Parser;
use maze_chase_core::constants::{
    GHOST_CENTER_OFFSET, MODE_SCHEDULE, PLAYER_CENTER_OFFSET, POWER_TICKS, STARTING_LIVES,
    TICK_RATE, TUNNEL_ROW,
};
use maze_chase_core::engine::{EngineOptions, GameEngine};
use maze_chase_core::grid::{pixel_to_tile, Grid, Tile};
use maze_chase_core::pathfinding::shortest_path;
use maze_chase_core::types::{Direction, InputEvent, RoundOutcome, RuntimeEvent, Snapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_MAX_TICKS: u64 = TICK_RATE as u64 * 60 * 5;
const MAX_TICKS_CAP: u64 = TICK_RATE as u64 * 60 * 30;
const REPLAN_TICKS: u64 = 45;
const GOAL_CANDIDATES: usize = 4;
const WANDER_CHANCE: f64 = 0.1;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    single: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long)]
    lives: Option<u32>,
    /// Leave the player without input for the single scenario.
    #[arg(long)]
    idle: bool,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Pilot {
    Idle,
    Autopilot,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    seed: u64,
    #[serde(rename = "maxTicks")]
    max_ticks: u64,
    lives: u32,
    pilot: Pilot,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u64,
    pilot: Pilot,
    outcome: String,
    ticks: u64,
    score: u32,
    lives: u32,
    #[serde(rename = "pelletsEaten")]
    pellets_eaten: u32,
    #[serde(rename = "powerPellets")]
    power_pellets: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    deaths: u32,
    #[serde(rename = "modeChanges")]
    mode_changes: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioRunResult {
    #[serde(flatten)]
    result: ScenarioResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
    finished_tick: u64,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

struct Autopilot {
    rng: StdRng,
    goal: Option<(i32, i32)>,
    replan_at: u64,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            goal: None,
            replan_at: 0,
        }
    }

    fn next_input(&mut self, snapshot: &Snapshot, grid: &Grid) -> Option<InputEvent> {
        let center_x = snapshot.player.x + PLAYER_CENTER_OFFSET.x;
        let center_y = snapshot.player.y + PLAYER_CENTER_OFFSET.y;
        let here = pixel_to_tile(center_x, center_y);
        grid.tile_at(here.0, here.1)?;

        if self.goal == Some(here) || snapshot.tick >= self.replan_at {
            self.goal = None;
        }
        if self.goal.is_none() {
            self.goal = self.pick_goal(grid, here);
            self.replan_at = snapshot.tick + REPLAN_TICKS;
        }
        let goal = self.goal?;
        let path = shortest_path(grid, here, goal, false);
        let Some(next) = path.get(1) else {
            self.goal = None;
            return None;
        };
        step_direction(here, *next).map(InputEvent::Press)
    }

    fn pick_goal(&mut self, grid: &Grid, here: (i32, i32)) -> Option<(i32, i32)> {
        let mut items = remaining_item_tiles(grid);
        if items.is_empty() {
            return None;
        }
        if self.rng.random_bool(WANDER_CHANCE) {
            let idx = self.rng.random_range(0..items.len());
            return Some(items[idx]);
        }
        items.sort_by_key(|(col, row)| ((col - here.0).abs() + (row - here.1).abs(), *row, *col));
        let pool = items.len().min(GOAL_CANDIDATES);
        let idx = self.rng.random_range(0..pool);
        Some(items[idx])
    }
}

fn main() {
    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let started_at = now_rfc3339();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed_hint, now_ms()));
    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_ticks = 0u64;
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            None,
            json!({
                "pilot": scenario.pilot,
                "maxTicks": scenario.max_ticks,
                "lives": scenario.lives,
            }),
        );
        let scenario_run = run_scenario(&scenario);

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(&scenario.name),
                Some(scenario.seed),
                Some(anomaly.tick),
                json!({
                    "message": anomaly.message,
                }),
            );
        }

        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        total_ticks += scenario_run.result.ticks;
        *outcome_counts
            .entry(scenario_run.result.outcome.clone())
            .or_insert(0) += 1;

        emit_log(
            "info",
            "scenario_finished",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            Some(scenario_run.finished_tick),
            json!({
                "outcome": scenario_run.result.outcome,
                "score": scenario_run.result.score,
                "pelletsEaten": scenario_run.result.pellets_eaten,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&scenario_run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => emit_log(
                "error",
                "result_encode_failed",
                &run_id,
                Some(&scenario.name),
                Some(scenario.seed),
                None,
                json!({ "error": error.to_string() }),
            ),
        }
        scenario_results.push(scenario_run.result);
    }

    let summary = build_run_summary(
        run_id.clone(),
        started_at,
        now_rfc3339(),
        scenario_results,
        outcome_counts,
        total_anomalies,
        total_ticks,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageTicks": summary.average_ticks,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_scenario(scenario: &Scenario) -> ScenarioRunResult {
    let mut engine = GameEngine::new(EngineOptions {
        starting_lives: scenario.lives,
        ..EngineOptions::default()
    });
    let mut autopilot = match scenario.pilot {
        Pilot::Autopilot => Some(Autopilot::new(scenario.seed)),
        Pilot::Idle => None,
    };
    let total_items = Grid::new().remaining_items();

    let mut power_pellets = 0;
    let mut mode_changes = 0;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut last_tick = 0u64;
    let mut snapshot = engine.build_snapshot(true);

    while !engine.is_paused() && engine.tick() < scenario.max_ticks {
        if let Some(pilot) = autopilot.as_mut() {
            if let Some(input) = pilot.next_input(&snapshot, engine.grid()) {
                engine.queue_input(input);
            }
        }
        engine.step();
        snapshot = engine.build_snapshot(true);
        last_tick = snapshot.tick;
        for message in collect_snapshot_anomalies(&snapshot, total_items, scenario.lives) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }

        for event in &snapshot.events {
            match event {
                RuntimeEvent::PowerPelletEaten { .. } => power_pellets += 1,
                RuntimeEvent::ModeChanged { .. } => mode_changes += 1,
                _ => {}
            }
        }
    }

    let summary = engine.build_summary();
    ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            pilot: scenario.pilot,
            outcome: outcome_key(summary.outcome),
            ticks: summary.ticks,
            score: summary.score,
            lives: summary.lives,
            pellets_eaten: summary.pellets_eaten,
            power_pellets,
            ghosts_eaten: summary.ghosts_eaten,
            deaths: summary.deaths,
            mode_changes,
            anomalies,
        },
        anomaly_records,
        finished_tick: last_tick,
    }
}

fn collect_snapshot_anomalies(snapshot: &Snapshot, total_items: usize, lives: u32) -> Vec<String> {
    let mut anomalies = Vec::new();
    let grid = match Grid::from_codes(&snapshot.grid) {
        Ok(grid) => grid,
        Err(error) => {
            anomalies.push(format!("invalid grid in snapshot: {error}"));
            return anomalies;
        }
    };

    let player_x = snapshot.player.x + PLAYER_CENTER_OFFSET.x;
    let player_y = snapshot.player.y + PLAYER_CENTER_OFFSET.y;
    if !center_on_open_tile(&grid, player_x, player_y, false) {
        anomalies.push(format!("player inside wall at ({player_x},{player_y})"));
    }
    for ghost in &snapshot.ghosts {
        let ghost_x = ghost.x + GHOST_CENTER_OFFSET;
        let ghost_y = ghost.y + GHOST_CENTER_OFFSET;
        if !center_on_open_tile(&grid, ghost_x, ghost_y, true) {
            anomalies.push(format!("{:?} inside wall at ({ghost_x},{ghost_y})", ghost.role));
        }
    }

    let accounted = snapshot.pellets_eaten as usize + snapshot.pellets_remaining;
    if accounted != total_items {
        anomalies.push(format!(
            "pellet accounting mismatch: eaten {} + remaining {} != {total_items}",
            snapshot.pellets_eaten, snapshot.pellets_remaining
        ));
    }
    if snapshot.lives > lives {
        anomalies.push(format!("lives above start: {}", snapshot.lives));
    }
    if snapshot.power_ticks_left > POWER_TICKS {
        anomalies.push(format!("power timer out of range: {}", snapshot.power_ticks_left));
    }
    if snapshot.schedule_index >= MODE_SCHEDULE.len() {
        anomalies.push(format!("schedule index out of range: {}", snapshot.schedule_index));
    }
    anomalies
}

fn center_on_open_tile(grid: &Grid, x: i32, y: i32, gate_access: bool) -> bool {
    let (col, row) = pixel_to_tile(x, y);
    match grid.tile_at(col, row) {
        Some(tile) => tile.is_passable(gate_access),
        None => row == TUNNEL_ROW,
    }
}

fn remaining_item_tiles(grid: &Grid) -> Vec<(i32, i32)> {
    let mut items = Vec::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if matches!(
                grid.tile_at(col, row),
                Some(Tile::Pellet) | Some(Tile::PowerPellet)
            ) {
                items.push((col, row));
            }
        }
    }
    items
}

fn step_direction(from: (i32, i32), to: (i32, i32)) -> Option<Direction> {
    match (to.0 - from.0, to.1 - from.1) {
        (1, 0) => Some(Direction::Right),
        (-1, 0) => Some(Direction::Left),
        (0, -1) => Some(Direction::Up),
        (0, 1) => Some(Direction::Down),
        _ => None,
    }
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = cli.seed.unwrap_or_else(now_ms);
    let max_ticks = cli.max_ticks.unwrap_or(DEFAULT_MAX_TICKS).clamp(1, MAX_TICKS_CAP);
    let lives = cli.lives.unwrap_or(STARTING_LIVES).min(9);

    if cli.single || cli.idle {
        let pilot = if cli.idle {
            Pilot::Idle
        } else {
            Pilot::Autopilot
        };
        return vec![Scenario {
            name: format!("custom-{}", pilot_key(pilot)),
            seed,
            max_ticks,
            lives,
            pilot,
        }];
    }

    vec![
        Scenario {
            name: "idle-baseline".to_string(),
            seed,
            max_ticks,
            lives,
            pilot: Pilot::Idle,
        },
        Scenario {
            name: "autopilot".to_string(),
            seed,
            max_ticks,
            lives,
            pilot: Pilot::Autopilot,
        },
        Scenario {
            name: "autopilot-alt-seed".to_string(),
            seed: seed.wrapping_add(1),
            max_ticks,
            lives,
            pilot: Pilot::Autopilot,
        },
    ]
}

fn pilot_key(pilot: Pilot) -> &'static str {
    match pilot {
        Pilot::Idle => "idle",
        Pilot::Autopilot => "autopilot",
    }
}

fn outcome_key(outcome: Option<RoundOutcome>) -> String {
    match outcome {
        Some(RoundOutcome::Won) => "won",
        Some(RoundOutcome::GameOver) => "game_over",
        None => "tick_limit",
    }
    .to_string()
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u64, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    run_id: String,
    started_at: String,
    finished_at: String,
    scenarios: Vec<ScenarioResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
    total_ticks: u64,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let average_ticks = if scenario_count == 0 {
        0
    } else {
        total_ticks / scenario_count as u64
    };
    RunSummary {
        run_id,
        started_at,
        finished_at,
        scenario_count,
        anomaly_count,
        average_ticks,
        outcome_counts,
        scenarios,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    scenario: Option<&str>,
    seed: Option<u64>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        tick,
        details,
    };
    if let Ok(line) = serde_json::to_string(&log_line) {
        eprintln!("{line}");
    }
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scenario_result(outcome: &str, ticks: u64) -> ScenarioResultLine {
        ScenarioResultLine {
            scenario: "test".to_string(),
            seed: 42,
            pilot: Pilot::Autopilot,
            outcome: outcome.to_string(),
            ticks,
            score: 0,
            lives: 3,
            pellets_eaten: 0,
            power_pellets: 0,
            ghosts_eaten: 0,
            deaths: 0,
            mode_changes: 0,
            anomalies: Vec::new(),
        }
    }

    fn scenario(pilot: Pilot, seed: u64, max_ticks: u64) -> Scenario {
        Scenario {
            name: "test".to_string(),
            seed,
            max_ticks,
            lives: STARTING_LIVES,
            pilot,
        }
    }

    #[test]
    fn default_run_id_contains_seed_and_timestamp() {
        assert_eq!(default_run_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn build_run_summary_calculates_average_ticks() {
        let summary = build_run_summary(
            "sim-42-1".to_string(),
            "2026-01-01T00:00:00.000Z".to_string(),
            "2026-01-01T00:00:01.000Z".to_string(),
            vec![
                make_scenario_result("game_over", 6_000),
                make_scenario_result("won", 9_000),
            ],
            BTreeMap::from([("game_over".to_string(), 1usize), ("won".to_string(), 1usize)]),
            1,
            15_000,
        );
        assert_eq!(summary.average_ticks, 7_500);
        assert_eq!(summary.scenario_count, 2);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("maze-chase-missing-{}", now_ms()))
            .join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            now_rfc3339(),
            now_rfc3339(),
            vec![make_scenario_result("tick_limit", 600)],
            BTreeMap::from([("tick_limit".to_string(), 1usize)]),
            0,
            600,
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn push_anomaly_keeps_records_and_deduplicates_summary_messages() {
        let mut anomalies = Vec::new();
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        push_anomaly(&mut anomalies, &mut records, &mut seen, 10, "same anomaly".to_string());
        push_anomaly(&mut anomalies, &mut records, &mut seen, 11, "same anomaly".to_string());

        assert_eq!(anomalies.len(), 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tick, 10);
        assert_eq!(records[1].tick, 11);
    }

    #[test]
    fn step_direction_maps_neighbours() {
        assert_eq!(step_direction((3, 3), (4, 3)), Some(Direction::Right));
        assert_eq!(step_direction((3, 3), (3, 2)), Some(Direction::Up));
        assert_eq!(step_direction((3, 3), (5, 3)), None);
    }

    #[test]
    fn fresh_snapshot_has_no_anomalies() {
        let mut engine = GameEngine::new(EngineOptions::default());
        let snapshot = engine.build_snapshot(true);
        let total = Grid::new().remaining_items();
        assert!(collect_snapshot_anomalies(&snapshot, total, STARTING_LIVES).is_empty());
    }

    #[test]
    fn pellet_mismatch_is_reported() {
        let mut engine = GameEngine::new(EngineOptions::default());
        let snapshot = engine.build_snapshot(true);
        let total = Grid::new().remaining_items() + 1;
        let anomalies = collect_snapshot_anomalies(&snapshot, total, STARTING_LIVES);
        assert_eq!(anomalies.len(), 1);
        assert!(anomalies[0].starts_with("pellet accounting mismatch"));
    }

    #[test]
    fn autopilot_run_eats_pellets_without_anomalies() {
        let run = run_scenario(&scenario(Pilot::Autopilot, 7, 3_000));
        assert!(run.result.pellets_eaten > 0);
        assert!(run.result.anomalies.is_empty(), "{:?}", run.result.anomalies);
    }

    #[test]
    fn autopilot_runs_are_reproducible() {
        let first = run_scenario(&scenario(Pilot::Autopilot, 11, 1_500));
        let second = run_scenario(&scenario(Pilot::Autopilot, 11, 1_500));
        assert_eq!(first.result.score, second.result.score);
        assert_eq!(first.result.ticks, second.result.ticks);
        assert_eq!(first.result.pellets_eaten, second.result.pellets_eaten);
    }

    #[test]
    fn idle_scenario_respects_tick_limit() {
        let run = run_scenario(&scenario(Pilot::Idle, 1, 120));
        assert!(run.result.ticks <= 120);
        assert!(run.result.anomalies.is_empty());
    }

    #[test]
    fn cli_flags_select_single_idle_scenario() {
        let cli = Cli::parse_from(["simulate", "--idle", "--seed", "5", "--max-ticks", "99"]);
        let scenarios = resolve_scenarios(&cli);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].pilot, Pilot::Idle);
        assert_eq!(scenarios[0].seed, 5);
        assert_eq!(scenarios[0].max_ticks, 99);

        let cli = Cli::parse_from(["simulate", "--seed", "5"]);
        let scenarios = resolve_scenarios(&cli);
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[2].seed, 6);
    }
}
