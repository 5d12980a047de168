use std::io;

use serde::Serialize;

use crate::config::{load_config, load_config_or_default, EngineConfig};
use crate::session::WeekendFormat;
use crate::weekend::{WeekendPlanner, WeekendStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Plan,
    Inventory,
    Tracks,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("plan") => Some(Command::Plan),
        Some("inventory") => Some(Command::Inventory),
        Some("tracks") => Some(Command::Tracks),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Plan) => handle_plan(args),
        Some(Command::Inventory) => handle_inventory(args),
        Some(Command::Tracks) => handle_tracks(),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("usage: tyrestrat <plan|inventory|tracks|validate>");
            2
        }
    }
}

fn load_engine_config() -> Option<EngineConfig> {
    match load_config_or_default() {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("config error: {err}");
            None
        }
    }
}

/// Positional arguments after the command, with flags removed.
fn positionals(args: &[String]) -> Vec<&str> {
    args.iter()
        .skip(2)
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
        .collect()
}

fn parse_format(raw: Option<&str>) -> Result<WeekendFormat, String> {
    match raw {
        None => Ok(WeekendFormat::Standard),
        Some(value) => WeekendFormat::parse(value)
            .ok_or_else(|| format!("unknown weekend format '{value}' (expected standard or sprint)")),
    }
}

fn handle_plan(args: &[String]) -> i32 {
    let positional = positionals(args);
    let Some(track) = positional.first().copied() else {
        eprintln!("usage: tyrestrat plan <track> [standard|sprint] [--csv]");
        return 2;
    };
    let format = match parse_format(positional.get(1).copied()) {
        Ok(format) => format,
        Err(msg) => {
            eprintln!("{msg}");
            return 2;
        }
    };
    let as_csv = args.iter().any(|arg| arg == "--csv");

    let Some(config) = load_engine_config() else {
        return 1;
    };
    let weekend = match WeekendPlanner::new(config).plan_weekend(track, format, None) {
        Ok(weekend) => weekend,
        Err(err) => {
            eprintln!("planning failed: {err}");
            return 1;
        }
    };

    if as_csv {
        match write_strategies_csv(&weekend, io::stdout()) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        }
    } else {
        print_json(&weekend, "weekend plan")
    }
}

fn handle_inventory(args: &[String]) -> i32 {
    let format = match parse_format(positionals(args).first().copied()) {
        Ok(format) => format,
        Err(msg) => {
            eprintln!("{msg}");
            return 2;
        }
    };
    let Some(config) = load_engine_config() else {
        return 1;
    };
    match WeekendPlanner::new(config).issue_inventory(format, None) {
        Ok((_, inventory)) => print_json(&inventory, "inventory"),
        Err(err) => {
            eprintln!("inventory failed: {err}");
            1
        }
    }
}

fn handle_tracks() -> i32 {
    let Some(config) = load_engine_config() else {
        return 1;
    };
    let planner = WeekendPlanner::new(config);
    println!("id\tname\ttotal_laps\tbase_lap_time_s");
    for track in planner.catalog().tracks() {
        println!(
            "{}\t{}\t{}\t{:.3}",
            track.id, track.name, track.total_laps, track.base_lap_time_s
        );
    }
    0
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: tyrestrat validate <config-path>");
        return 2;
    };

    match load_config(path) {
        Ok(_) => {
            println!("validation passed: {path}");
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

#[derive(Debug, Serialize)]
struct StrategyRow<'a> {
    id: &'a str,
    name: &'a str,
    stops: usize,
    pit_laps: String,
    stints: String,
    predicted_total_time: f64,
}

/// One row per race strategy in rank order. Stints render as
/// `COMPOUND#set:laps` joined by `|`.
fn write_strategies_csv<W: io::Write>(weekend: &WeekendStrategy, out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    for strategy in weekend.ranked() {
        let pit_laps: Vec<String> = strategy.pit_laps.iter().map(u32::to_string).collect();
        let stints: Vec<String> = strategy
            .stints
            .iter()
            .map(|stint| format!("{}#{}:{}", stint.compound, stint.tire_set, stint.laps))
            .collect();
        writer.serialize(StrategyRow {
            id: &strategy.id,
            name: &strategy.name,
            stops: strategy.stops(),
            pit_laps: pit_laps.join("|"),
            stints: stints.join("|"),
            predicted_total_time: strategy.predicted_total_time,
        })?;
    }
    writer.flush()?;
    Ok(())
}
