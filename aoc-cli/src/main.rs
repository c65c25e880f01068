//! `aoc` - run, record, check and start Advent of Code 2023 solvers

mod aggregator;
mod answers;
mod cli;
mod config;
mod error;
mod executor;
mod output;
mod scaffold;
mod store;

// Link the solutions so their plugins are registered
use aoc_2023 as _;

use aggregator::{ResultAggregator, ResultKey};
use answers::AnswerBook;
use aoc_solver::SolverRegistryBuilder;
use clap::Parser;
use cli::Args;
use config::{AnswerMode, Config, SESSION_ENV};
use error::{ArcExecutorError, CliError};
use executor::Executor;
use output::OutputFormatter;
use store::{AnswerStore, InputStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(Config::from_args(args)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` or else by `-v` count
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(config: Config) -> Result<(), CliError> {
    if config.new_day {
        start_new_day(config)
    } else {
        run_solvers(config)
    }
}

fn run_solvers(mut config: Config) -> Result<(), CliError> {
    let registry = build_registry(config.year, &config.tags)?;
    let mut executor = Executor::new(registry, &config).map_err(ArcExecutorError::from)?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    let missing = executor.missing_inputs();
    if !missing.is_empty() {
        println!("Missing {} input file(s):", missing.len());
        for (year, day) in &missing {
            println!("  - {year}/day{day:02}");
        }
        if config.session.is_none() {
            println!();
            let session = config.require_session(&format!(
                "Session token required to fetch missing inputs (or set {})",
                SESSION_ENV
            ))?;
            executor
                .set_session(session)
                .map_err(ArcExecutorError::from)?;
        }
    }

    let expected_keys: Vec<ResultKey> = work_items
        .iter()
        .flat_map(|w| {
            w.parts.clone().map(move |part| ResultKey {
                year: w.year,
                day: w.day,
                part,
            })
        })
        .collect();
    if !config.quiet {
        println!("Running {} solver(s)...", work_items.len());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    let formatter = OutputFormatter::new(config.quiet);
    let mut book = AnswerBook::new(AnswerStore::new(config.answers_dir.clone()), config.answer_mode);
    let mut aggregator = ResultAggregator::new(expected_keys);
    let mut results = Vec::new();

    for result in rx {
        for ready in aggregator.add(result) {
            let check = book.observe(&ready)?;
            formatter.print_result(&ready, check.as_ref());
            results.push(ready);
        }
    }
    for ready in aggregator.drain() {
        let check = book.observe(&ready)?;
        formatter.print_result(&ready, check.as_ref());
        results.push(ready);
    }
    if !aggregator.is_complete() {
        eprintln!("Warning: Not all expected results were received");
    }

    executor_handle
        .join()
        .map_err(|_| CliError::Config("Executor thread panicked".to_string()))??;

    let failed_checks = book.finish()?;
    let checked = config.answer_mode == AnswerMode::Test;
    formatter.print_summary(&results, checked.then_some(failed_checks));

    let failures = results.iter().filter(|r| r.answer.is_err()).count();
    if checked && failed_checks > 0 {
        Err(CliError::AnswerMismatch(failed_checks))
    } else if failures > 0 {
        Err(CliError::SolverFailures(failures))
    } else {
        Ok(())
    }
}

fn start_new_day(mut config: Config) -> Result<(), CliError> {
    let year = config.year;
    let day = match config.day_filter {
        Some(day) => day,
        None => {
            let registry = build_registry(year, &[])?;
            scaffold::next_day(registry.storage().iter_info().map(|info| info.day))?
        }
    };
    info!(year, day, "starting new day");
    println!("https://adventofcode.com/{year}/day/{day}");

    if config.wait_for_unlock {
        scaffold::wait_for_unlock(year, day)?;
    }

    let inputs = InputStore::new(config.inputs_dir.clone());
    if inputs.contains(year, day) {
        debug!(year, day, "input already stored");
    } else {
        let session = config.require_session(&format!(
            "Session token required to download the input (or set {})",
            SESSION_ENV
        ))?;
        let input = aoc_http_client::AocClient::new()?.get_input(year, day, &session)?;
        inputs.put(year, day, &input)?;
    }
    println!("Input: {}", inputs.path(year, day).display());

    let (path, created) = scaffold::scaffold_day(&config.solutions_dir, year, day)?;
    if created {
        println!("Solver: {} (new)", path.display());
    } else {
        println!("Solver: {} (already exists)", path.display());
    }
    Ok(())
}

/// Registry of the year's solvers carrying every tag in `tags`
fn build_registry(year: u16, tags: &[String]) -> Result<aoc_solver::SolverRegistry, CliError> {
    let builder = SolverRegistryBuilder::new().register_solver_plugins(|plugin| {
        plugin.year == year && tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
    })?;
    Ok(builder.build())
}
