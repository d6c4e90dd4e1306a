use std::error::Error;
use std::fs;
use std::io;
use std::process;

use clap::{App, Arg};
use log::{info, warn};
use typed_arena::Arena;

use pushpull_solver::config::Method;
use pushpull_solver::level::Level;
use pushpull_solver::protocol;
use pushpull_solver::search::{search, Limits, Outcome};
use pushpull_solver::strategy::strategy_for;

fn main() {
    env_logger::init();

    let matches = App::new("pushpull-solver")
        .about("Search client for single-agent push/pull box puzzles")
        .arg(
            Arg::with_name("strategy")
                .short("s")
                .long("strategy")
                .takes_value(true)
                .help("bfs, dfs, astar, wastar or greedy (default: bfs)"),
        )
        .arg(
            Arg::with_name("weight")
                .long("weight")
                .takes_value(true)
                .default_value("5")
                .help("W for weighted A*"),
        )
        .arg(
            Arg::with_name("flood-fill")
                .long("flood-fill")
                .help("wall-aware shortest-path distances instead of Manhattan"),
        )
        .arg(
            Arg::with_name("memory")
                .long("memory")
                .takes_value(true)
                .default_value("2048")
                .help("search memory budget in MiB"),
        )
        .arg(
            Arg::with_name("file")
                .help("solve a level file and print the plan instead of talking to a server on stdin/stdout"),
        )
        .get_matches();

    let method = match matches.value_of("strategy") {
        None => Method::Bfs,
        Some(selector) => Method::from_selector(selector).unwrap_or_else(|| {
            warn!(
                "Unrecognized strategy {:?}, defaulting to bfs. \
                 Use bfs, dfs, astar, wastar or greedy.",
                selector
            );
            Method::Bfs
        }),
    };
    let weight = matches
        .value_of("weight")
        .unwrap()
        .parse()
        .unwrap_or_else(|err| {
            eprintln!("Invalid --weight: {}", err);
            process::exit(1);
        });
    let memory = matches
        .value_of("memory")
        .unwrap()
        .parse()
        .unwrap_or_else(|err| {
            eprintln!("Invalid --memory: {}", err);
            process::exit(1);
        });
    let flood_fill = matches.is_present("flood-fill");
    let limits = Limits::from_megabytes(memory);

    let result = match matches.value_of("file") {
        Some(path) => run_offline(path, method, flood_fill, weight, limits),
        None => run_server(method, flood_fill, weight, limits),
    };
    if let Err(err) = result {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn solve(level: &Level, method: Method, flood_fill: bool, weight: i32, limits: Limits) -> Outcome {
    let arena = Arena::new();
    let mut strategy = strategy_for(method, &level.grid, flood_fill, weight);
    search(&arena, level, &mut strategy, limits)
}

/// Solve a level file and print the plan to stdout, stats to stderr.
fn run_offline(
    path: &str,
    method: Method,
    flood_fill: bool,
    weight: i32,
    limits: Limits,
) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let level: Level = text.parse()?;

    let outcome = solve(&level, method, flood_fill, weight, limits);
    eprintln!("{}", outcome);
    match outcome.plan {
        Some(plan) => print!("{}", plan),
        None => println!("No solution"),
    }
    Ok(())
}

/// Talk to the puzzle server: level in on stdin, actions out on stdout,
/// one acknowledgement line read back per action. Everything human-facing
/// goes to stderr so the protocol stream stays clean.
fn run_server(
    method: Method,
    flood_fill: bool,
    weight: i32,
    limits: Limits,
) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();

    let level = protocol::read_level(&mut reader)?;
    info!("Level read, {} boxes", level.boxes.len());

    let outcome = solve(&level, method, flood_fill, weight, limits);
    eprintln!("{}", outcome);

    if let Some(ref plan) = outcome.plan {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        let accepted = protocol::play(&level, plan, &mut reader, &mut writer)?;
        info!("Server accepted {} of {} actions", accepted, plan.len());
    }
    Ok(())
}
