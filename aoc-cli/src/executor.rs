//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::store::InputStore;
use aoc_http_client::AocClient;
use aoc_solver::{DynSolver, SolverError, SolverRegistry};
use chrono::TimeDelta;
use itertools::Itertools;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Result from a single solver execution
#[derive(Debug)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, SolverError>,
    /// Parse time of the solver instance that produced this part
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

impl SolverResult {
    fn failed(year: u16, day: u8, part: u8, error: SolverError) -> Self {
        Self {
            year,
            day,
            part,
            answer: Err(error),
            parse_duration: None,
            solve_duration: TimeDelta::zero(),
        }
    }
}

/// Work item representing a solver to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Downloads missing inputs
struct Fetcher {
    client: AocClient,
    session: Zeroizing<String>,
}

impl Fetcher {
    fn new(session: Zeroizing<String>) -> Result<Self, ExecutorError> {
        let client = AocClient::new().map_err(|e| ExecutorError::Client(Box::new(e)))?;
        Ok(Self { client, session })
    }
}

/// Parallel executor for running solvers
pub struct Executor {
    shared: SharedState,
    thread_pool: rayon::ThreadPool,
}

/// Everything worker threads read while solving
struct SharedState {
    registry: SolverRegistry,
    inputs: InputStore,
    fetcher: Option<Fetcher>,
    parallelize_by: ParallelizeBy,
    year: u16,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let fetcher = config.session.clone().map(Fetcher::new).transpose()?;

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            shared: SharedState {
                registry,
                inputs: InputStore::new(config.inputs_dir.clone()),
                fetcher,
                parallelize_by: config.parallelize_by,
                year: config.year,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        })
    }

    /// Download missing inputs with `session` from now on
    pub fn set_session(&mut self, session: Zeroizing<String>) -> Result<(), ExecutorError> {
        self.shared.fetcher = Some(Fetcher::new(session)?);
        Ok(())
    }

    /// (year, day) of selected solvers whose input is not in the store yet
    pub fn missing_inputs(&self) -> Vec<(u16, u8)> {
        self.collect_work_items()
            .iter()
            .filter(|w| !self.shared.inputs.contains(w.year, w.day))
            .map(|w| (w.year, w.day))
            .collect()
    }

    /// Registered solvers matching the year/day/part filters, in (year, day) order
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let cfg = &self.shared;
        cfg.registry
            .storage()
            .iter_info()
            .filter(|info| info.year == cfg.year)
            .filter(|info| cfg.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: filter_parts(cfg.part_filter, info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        info!(
            solvers = work_items.len(),
            threads = self.thread_pool.current_num_threads(),
            mode = ?self.shared.parallelize_by,
            "executing"
        );

        match self.shared.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in work_items {
                    if let Err(e) = run_work_item(&work, &tx, &self.shared) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();
                self.execute_grouped(by_year, &tx)
            }
            ParallelizeBy::Day | ParallelizeBy::Part => {
                self.execute_grouped(work_items.into_iter().map(|w| vec![w]).collect(), &tx)
            }
        }
    }

    /// Run groups in parallel on the pool, items within a group in order
    fn execute_grouped(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let shared = &self.shared;
        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .filter_map(|items| {
                    items.iter().fold(None, |err, work| {
                        match run_work_item(work, tx, shared) {
                            Ok(()) => err,
                            Err(e) => Some(ArcExecutorError::combine_opt(err, e)),
                        }
                    })
                })
                .reduce_with(ArcExecutorError::combine)
                .map_or(Ok(()), Err)
        })
    }
}

#[allow(clippy::reversed_empty_ranges)]
fn filter_parts(part_filter: Option<u8>, max_parts: u8) -> RangeInclusive<u8> {
    match part_filter {
        Some(p) if p <= max_parts => p..=p,
        Some(_) => 1..=0,
        None => 1..=max_parts,
    }
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ArcExecutorError::from(ExecutorError::ChannelSend))
}

/// Report the same parse failure for every selected part
fn fail_all(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    error: aoc_solver::ParseError,
) -> Result<(), ArcExecutorError> {
    work.parts.clone().try_for_each(|part| {
        let error = SolverError::ParseError(error.clone());
        send(tx, SolverResult::failed(work.year, work.day, part, error))
    })
}

/// Load the input and solve every selected part of one day.
///
/// Input and parse failures are reported as failed results for each part,
/// so only channel failures surface as errors.
fn run_work_item(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    shared: &SharedState,
) -> Result<(), ArcExecutorError> {
    let input = match load_input(work.year, work.day, shared) {
        Ok(input) => input,
        Err(e) => {
            return fail_all(work, tx, aoc_solver::ParseError::MissingData(e.to_string()));
        }
    };

    if shared.parallelize_by == ParallelizeBy::Part {
        solve_parts_parallel(work, &input, tx, shared)
    } else {
        solve_parts_sequential(work, &input, tx, shared)
    }
}

/// One instance per part, so parts share nothing but the input
fn solve_parts_parallel(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    shared: &SharedState,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);
    let mut results: Vec<SolverResult> = work
        .parts
        .clone()
        .into_par_iter()
        .map(|part| match shared.registry.create_solver(year, day, input) {
            Ok(mut solver) => solve_part(year, day, part, &mut *solver),
            Err(e) => SolverResult::failed(year, day, part, e),
        })
        .collect();
    results.sort_by_key(|r| r.part);
    results.into_iter().try_for_each(|r| send(tx, r))
}

/// One instance for all parts, in part order
fn solve_parts_sequential(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    shared: &SharedState,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);
    let mut solver = match shared.registry.create_solver(year, day, input) {
        Ok(solver) => solver,
        Err(SolverError::ParseError(e)) => return fail_all(work, tx, e),
        Err(e) => return fail_all(work, tx, aoc_solver::ParseError::Other(e.to_string())),
    };
    for part in work.parts.clone() {
        send(tx, solve_part(year, day, part, &mut *solver))?;
    }
    Ok(())
}

/// Input from the store, downloading and storing it when missing
fn load_input(year: u16, day: u8, shared: &SharedState) -> Result<String, ExecutorError> {
    let input_err = |source: Box<dyn std::error::Error + Send + Sync>| ExecutorError::Input {
        year,
        day,
        source,
    };

    if let Some(input) = shared
        .inputs
        .get(year, day)
        .map_err(|e| input_err(Box::new(e)))?
    {
        debug!(year, day, "input loaded from store");
        return Ok(input);
    }

    let fetcher = shared.fetcher.as_ref().ok_or_else(|| {
        input_err(
            format!(
                "{} is missing and no session is available to download it",
                shared.inputs.path(year, day).display()
            )
            .into(),
        )
    })?;

    info!(year, day, "downloading input");
    let input = fetcher
        .client
        .get_input(year, day, &fetcher.session)
        .map_err(|e| input_err(Box::new(e)))?;

    if let Err(e) = shared.inputs.put(year, day, &input) {
        warn!(year, day, error = %e, "failed to store downloaded input");
    }
    Ok(input)
}

fn solve_part(year: u16, day: u8, part: u8, solver: &mut dyn DynSolver) -> SolverResult {
    let parse_duration = Some(solver.parse_duration());
    match solver.solve(part) {
        Ok(result) => SolverResult {
            year,
            day,
            part,
            solve_duration: result.duration(),
            answer: Ok(result.answer),
            parse_duration,
        },
        Err(e) => SolverResult {
            parse_duration,
            ..SolverResult::failed(year, day, part, e.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_filtering() {
        assert_eq!(filter_parts(None, 2), 1..=2);
        assert_eq!(filter_parts(Some(2), 2), 2..=2);
        assert!(filter_parts(Some(2), 1).is_empty());
    }
}
