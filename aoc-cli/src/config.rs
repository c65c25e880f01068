//! Configuration resolution from CLI args

use crate::cli::{Args, ParallelizeBy};
use crate::error::CliError;
use std::path::{Path, PathBuf};
use tracing::info;
use zeroize::Zeroizing;

pub const SESSION_ENV: &str = "AOC_SESSION";

/// What a run should do with the answers once computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    Print,
    Record,
    Test,
}

/// Resolved runtime configuration
pub struct Config {
    pub year: u16,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    pub tags: Vec<String>,
    pub inputs_dir: PathBuf,
    pub answers_dir: PathBuf,
    pub solutions_dir: PathBuf,
    pub answer_mode: AnswerMode,
    pub thread_count: usize,
    pub parallelize_by: ParallelizeBy,
    /// Session cookie from the environment, if set (zeroized on drop)
    pub session: Option<Zeroizing<String>>,
    pub quiet: bool,
    pub new_day: bool,
    pub wait_for_unlock: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let answer_mode = if args.record {
            AnswerMode::Record
        } else if args.test {
            AnswerMode::Test
        } else {
            AnswerMode::Print
        };

        Config {
            year: args.year,
            day_filter: args.day,
            part_filter: args.part,
            tags: args.tags,
            inputs_dir: expand_tilde(&args.inputs_dir),
            answers_dir: expand_tilde(&args.answers_dir),
            solutions_dir: expand_tilde(&args.solutions_dir),
            answer_mode,
            thread_count: args.threads.unwrap_or_else(num_cpus),
            parallelize_by: args.parallelize_by,
            session: session_from_env(),
            quiet: args.quiet,
            new_day: args.new,
            wait_for_unlock: !args.no_wait,
        }
    }

    /// The session from the environment, or a verified one typed in by the user
    pub fn require_session(&mut self, reason: &str) -> Result<Zeroizing<String>, CliError> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }
        let session = prompt_session(reason)?;
        verify_session(&session)?;
        self.session = Some(session.clone());
        Ok(session)
    }
}

fn session_from_env() -> Option<Zeroizing<String>> {
    std::env::var(SESSION_ENV)
        .ok()
        .map(|s| Zeroizing::new(s.trim().to_string()))
        .filter(|s| !s.is_empty())
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Prompt user for session token
fn prompt_session(reason: &str) -> Result<Zeroizing<String>, CliError> {
    println!("{reason}");
    let s = rpassword::prompt_password("Enter AOC session key: ")
        .map_err(|e| CliError::Config(format!("Failed to read session: {e}")))?;
    let s = Zeroizing::new(s);
    if s.trim().is_empty() {
        return Err(CliError::Config("Session token is required.".to_string()));
    }
    Ok(Zeroizing::new(s.trim().to_string()))
}

/// Check the session against adventofcode.com, returning the user id
fn verify_session(session: &str) -> Result<u64, CliError> {
    let client = aoc_http_client::AocClient::new()?;
    let user_id = client
        .verify_session(session)?
        .user_id
        .ok_or_else(|| CliError::Config("Invalid session: could not fetch user ID".to_string()))?;
    info!(user_id, "session verified");
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/aoc/inputs")), home.join("aoc/inputs"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
        assert_eq!(expand_tilde(Path::new("inputs")), PathBuf::from("inputs"));
        assert_eq!(expand_tilde(Path::new("/a/~b")), PathBuf::from("/a/~b"));
    }

    #[test]
    fn answer_modes() {
        let config = Config::from_args(Args::parse_from(["aoc", "--record"]));
        assert_eq!(config.answer_mode, AnswerMode::Record);
        let config = Config::from_args(Args::parse_from(["aoc", "-t"]));
        assert_eq!(config.answer_mode, AnswerMode::Test);
        let config = Config::from_args(Args::parse_from(["aoc", "--threads", "3"]));
        assert_eq!(config.answer_mode, AnswerMode::Print);
        assert_eq!(config.thread_count, 3);
        assert!(config.wait_for_unlock);
    }
}
