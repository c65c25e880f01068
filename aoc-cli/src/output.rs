//! Output formatting for solver results

use crate::answers::Check;
use crate::executor::SolverResult;
use chrono::TimeDelta;
use std::time::Instant;

pub struct OutputFormatter {
    quiet: bool,
    start_time: Instant,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: Instant::now(),
        }
    }

    pub fn print_result(&self, result: &SolverResult, check: Option<&Check>) {
        if self.quiet {
            match &result.answer {
                Ok(answer) => println!("{answer}"),
                Err(e) => eprintln!("Error: {e}"),
            }
        } else {
            self.print_full(result, check);
        }
    }

    fn print_full(&self, result: &SolverResult, check: Option<&Check>) {
        let prefix = format!("{}/{:02} Part {}", result.year, result.day, result.part);
        let check = check.map(format_check).unwrap_or_default();

        match &result.answer {
            Ok(answer) => {
                let parse_timing = result
                    .parse_duration
                    .map(|d| format!("parse: {}, ", format_duration(d)))
                    .unwrap_or_default();
                println!(
                    "{prefix}: {answer} ({parse_timing}solve: {}){check}",
                    format_duration(result.solve_duration)
                );
            }
            Err(e) => eprintln!("{prefix}: Error - {e}{check}"),
        }
    }

    /// Totals plus wall-clock time against summed compute time
    pub fn print_summary(&self, results: &[SolverResult], failed_checks: Option<usize>) {
        if self.quiet {
            return;
        }

        let total = results.len();
        let successes = results.iter().filter(|r| r.answer.is_ok()).count();
        let failures = total - successes;

        // Each day's parse time is counted once, not once per part.
        let total_parse_time: TimeDelta = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .filter_map(|r| r.parse_duration.map(|d| ((r.year, r.day), d)))
            .collect::<std::collections::BTreeMap<_, _>>()
            .into_values()
            .sum();
        let total_solve_time: TimeDelta = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .map(|r| r.solve_duration)
            .sum();
        let total_compute_time = total_parse_time + total_solve_time;
        let elapsed_time = self.start_time.elapsed();

        println!();
        println!("--- Summary ---");
        println!("Parts: {successes} solved, {failures} failed");
        if let Some(failed) = failed_checks {
            println!("Checks: {} passed, {failed} failed", total - failed);
        }
        println!("Total parse time: {}", format_duration(total_parse_time));
        println!("Total solve time: {}", format_duration(total_solve_time));
        println!("Elapsed wall-clock time: {}", format_std_duration(elapsed_time));
        if !elapsed_time.is_zero() {
            let total_compute_secs =
                total_compute_time.num_microseconds().unwrap_or(0) as f64 / 1_000_000.0;
            println!(
                "Speedup factor: {:.2}x",
                total_compute_secs / elapsed_time.as_secs_f64()
            );
        }
    }
}

fn format_check(check: &Check) -> String {
    match check {
        Check::Correct => " ✓".to_string(),
        Check::Wrong { expected } => format!(" ✗ expected {expected}"),
        Check::Unrecorded => " ? not recorded".to_string(),
        Check::Failed => " ✗".to_string(),
    }
}

fn format_micros(micros: u128) -> String {
    if micros < 1000 {
        format!("{micros}µs")
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}

fn format_duration(d: TimeDelta) -> String {
    match d.num_microseconds() {
        None => "N/A".to_string(),
        Some(micros) if micros < 0 => format!("-{}", format_duration(-d)),
        Some(micros) => format_micros(micros.unsigned_abs().into()),
    }
}

fn format_std_duration(d: std::time::Duration) -> String {
    format_micros(d.as_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(TimeDelta::microseconds(999)), "999µs");
        assert_eq!(format_duration(TimeDelta::microseconds(1500)), "1.50ms");
        assert_eq!(format_duration(TimeDelta::milliseconds(2500)), "2.50s");
        assert_eq!(format_duration(TimeDelta::microseconds(-20)), "-20µs");
        assert_eq!(format_std_duration(std::time::Duration::from_millis(3)), "3.00ms");
    }

    #[test]
    fn checks() {
        assert_eq!(format_check(&Check::Correct), " ✓");
        assert_eq!(
            format_check(&Check::Wrong {
                expected: "42".into()
            }),
            " ✗ expected 42"
        );
    }
}
