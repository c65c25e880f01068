//! Recording answers and checking them against earlier recordings

use crate::config::AnswerMode;
use crate::error::StoreError;
use crate::executor::SolverResult;
use crate::store::{AnswerStore, Answers};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Outcome of checking one answer against the recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Correct,
    Wrong { expected: String },
    /// Nothing recorded for this part
    Unrecorded,
    /// The solver produced no answer
    Failed,
}

impl Check {
    pub fn passed(&self) -> bool {
        matches!(self, Check::Correct)
    }
}

pub struct AnswerBook {
    store: AnswerStore,
    mode: AnswerMode,
    /// Recordings read so far (test) or answers to write (record), per (year, day)
    days: BTreeMap<(u16, u8), Answers>,
    failed_checks: usize,
}

impl AnswerBook {
    pub fn new(store: AnswerStore, mode: AnswerMode) -> Self {
        Self {
            store,
            mode,
            days: BTreeMap::new(),
            failed_checks: 0,
        }
    }

    /// Take note of a result; in test mode, returns how it compares to the recording
    pub fn observe(&mut self, result: &SolverResult) -> Result<Option<Check>, StoreError> {
        let day = (result.year, result.day);
        match self.mode {
            AnswerMode::Print => Ok(None),
            AnswerMode::Record => {
                if let Ok(answer) = &result.answer {
                    self.days
                        .entry(day)
                        .or_default()
                        .insert(result.part, answer.clone());
                }
                Ok(None)
            }
            AnswerMode::Test => {
                if !self.days.contains_key(&day) {
                    let recorded = self.store.load(result.year, result.day)?;
                    debug!(year = result.year, day = result.day, parts = recorded.len(), "loaded recorded answers");
                    self.days.insert(day, recorded);
                }
                let expected = self.days.get(&day).and_then(|a| a.get(&result.part));
                let check = match (&result.answer, expected) {
                    (Err(_), _) => Check::Failed,
                    (Ok(_), None) => Check::Unrecorded,
                    (Ok(answer), Some(expected)) if answer == expected => Check::Correct,
                    (Ok(_), Some(expected)) => Check::Wrong {
                        expected: expected.clone(),
                    },
                };
                if !check.passed() {
                    self.failed_checks += 1;
                }
                Ok(Some(check))
            }
        }
    }

    /// Write out recordings; returns how many checks did not pass
    pub fn finish(self) -> Result<usize, StoreError> {
        if self.mode == AnswerMode::Record {
            for (&(year, day), answers) in &self.days {
                self.store.record(year, day, answers)?;
                info!(year, day, parts = answers.len(), path = %self.store.path(year, day).display(), "recorded answers");
            }
        }
        Ok(self.failed_checks)
    }
}
