//! Puzzle inputs and recorded answers on disk
//!
//! Both stores share the layout `{base}/{year}/day{dd}.txt`.

use crate::error::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

fn day_path(base: &Path, year: u16, day: u8) -> PathBuf {
    base.join(year.to_string()).join(format!("day{day:02}.txt"))
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_creating_dirs(path: &Path, content: &str) -> Result<(), StoreError> {
    let io = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io)?;
    }
    fs::write(path, content).map_err(io)
}

/// Puzzle inputs, one file per day
pub struct InputStore {
    base: PathBuf,
}

impl InputStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn path(&self, year: u16, day: u8) -> PathBuf {
        day_path(&self.base, year, day)
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.path(year, day).is_file()
    }

    pub fn get(&self, year: u16, day: u8) -> Result<Option<String>, StoreError> {
        read_optional(&self.path(year, day))
    }

    pub fn put(&self, year: u16, day: u8, input: &str) -> Result<(), StoreError> {
        let path = self.path(year, day);
        debug!(path = %path.display(), bytes = input.len(), "storing input");
        write_creating_dirs(&path, input)
    }
}

/// Recorded answers per day, stored as `part<N>: <answer>` lines
pub struct AnswerStore {
    base: PathBuf,
}

pub type Answers = BTreeMap<u8, String>;

impl AnswerStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn path(&self, year: u16, day: u8) -> PathBuf {
        day_path(&self.base, year, day)
    }

    /// Recorded answers, empty when nothing was recorded for the day
    pub fn load(&self, year: u16, day: u8) -> Result<Answers, StoreError> {
        let path = self.path(year, day);
        let Some(content) = read_optional(&path)? else {
            return Ok(Answers::new());
        };
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                parse_answer_line(line).ok_or_else(|| StoreError::Malformed {
                    path: path.clone(),
                    line: idx + 1,
                })
            })
            .collect()
    }

    /// Record `answers`, keeping previously recorded parts that are not overwritten
    pub fn record(&self, year: u16, day: u8, answers: &Answers) -> Result<(), StoreError> {
        let mut merged = self.load(year, day)?;
        merged.extend(answers.iter().map(|(&part, answer)| (part, answer.clone())));
        let content: String = merged
            .iter()
            .map(|(part, answer)| format!("part{part}: {answer}\n"))
            .collect();
        write_creating_dirs(&self.path(year, day), &content)
    }
}

fn parse_answer_line(line: &str) -> Option<(u8, String)> {
    let (part, answer) = line.split_once(':')?;
    let part = part.trim().strip_prefix("part")?.parse().ok()?;
    Some((part, answer.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn input_path_layout() {
        let store = InputStore::new(PathBuf::from("inputs"));
        assert_eq!(store.path(2023, 1), Path::new("inputs/2023/day01.txt"));
        assert_eq!(store.path(2023, 25), Path::new("inputs/2023/day25.txt"));
    }

    #[test]
    fn input_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = InputStore::new(temp.path().to_path_buf());

        assert!(!store.contains(2023, 1));
        assert!(store.get(2023, 1).unwrap().is_none());

        let input = "1abc2\npqr3stu8vwx\n";
        store.put(2023, 1, input).unwrap();

        assert!(store.contains(2023, 1));
        assert_eq!(store.get(2023, 1).unwrap().as_deref(), Some(input));
    }

    #[test]
    fn answers_merge_on_record() {
        let temp = TempDir::new().unwrap();
        let store = AnswerStore::new(temp.path().to_path_buf());
        assert!(store.load(2023, 4).unwrap().is_empty());

        store
            .record(2023, 4, &Answers::from([(1, "13".to_string())]))
            .unwrap();
        store
            .record(2023, 4, &Answers::from([(2, "30".to_string())]))
            .unwrap();

        let content = fs::read_to_string(store.path(2023, 4)).unwrap();
        assert_eq!(content, "part1: 13\npart2: 30\n");

        store
            .record(2023, 4, &Answers::from([(1, "14".to_string())]))
            .unwrap();
        let answers = store.load(2023, 4).unwrap();
        assert_eq!(answers.get(&1).map(String::as_str), Some("14"));
        assert_eq!(answers.get(&2).map(String::as_str), Some("30"));
    }

    #[test]
    fn malformed_answers() {
        let temp = TempDir::new().unwrap();
        let store = AnswerStore::new(temp.path().to_path_buf());
        write_creating_dirs(&store.path(2023, 2), "part1: 8\n\nthe answer\n").unwrap();
        match store.load(2023, 2) {
            Err(StoreError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected a malformed line, got {other:?}"),
        }
    }

    #[test]
    fn answer_lines() {
        assert_eq!(parse_answer_line("part2: 467835"), Some((2, "467835".to_string())));
        assert_eq!(parse_answer_line(" part1:x "), Some((1, "x".to_string())));
        assert_eq!(parse_answer_line("part: 1"), None);
        assert_eq!(parse_answer_line("1: 2"), None);
    }
}
