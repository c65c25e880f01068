//! Starting a new day: wait for the unlock, fetch the input, stub the solver

use crate::error::CliError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const DAY_TEMPLATE: &str = include_str!("../templates/day.rs");

/// Puzzles are sometimes not served at the exact unlock second.
const UNLOCK_GRACE: Duration = Duration::from_millis(300);

/// The day after the latest registered one
pub fn next_day(registered: impl IntoIterator<Item = u8>) -> Result<u8, CliError> {
    let day = registered.into_iter().max().map_or(1, |d| d + 1);
    if day > 25 {
        return Err(CliError::Config(
            "every day is already registered; pass --day explicitly".to_string(),
        ));
    }
    Ok(day)
}

/// Block until the puzzle for `year`/`day` is available
pub fn wait_for_unlock(year: u16, day: u8) -> Result<(), CliError> {
    let unlock = aoc_http_client::unlock_time(year, day)?;
    let wait = aoc_http_client::time_until_unlock(year, day, chrono::Utc::now())?;
    if wait.is_zero() {
        debug!(year, day, "puzzle already unlocked");
        return Ok(());
    }
    println!("Waiting until {}", unlock.to_rfc3339());
    std::thread::sleep(wait + UNLOCK_GRACE);
    Ok(())
}

/// Source for a new solver module
pub fn render_template(year: u16, day: u8) -> String {
    DAY_TEMPLATE
        .replace("__YEAR__", &year.to_string())
        .replace("__DAY__", &day.to_string())
}

/// Create `day_{day}.rs` in `solutions_dir` and declare it in `mod.rs`.
///
/// An existing solver file is left untouched. Returns the solver path and
/// whether it was created.
pub fn scaffold_day(solutions_dir: &Path, year: u16, day: u8) -> Result<(PathBuf, bool), CliError> {
    let module = format!("day_{day}");
    let path = solutions_dir.join(format!("{module}.rs"));
    let created = if path.exists() {
        debug!(path = %path.display(), "solver already exists");
        false
    } else {
        fs::create_dir_all(solutions_dir)?;
        fs::write(&path, render_template(year, day))?;
        info!(path = %path.display(), "created solver");
        true
    };

    let mod_path = solutions_dir.join("mod.rs");
    let mod_rs = match fs::read_to_string(&mod_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if let Some(updated) = declare_module(&mod_rs, &module) {
        fs::write(&mod_path, updated)?;
        info!(path = %mod_path.display(), module = %module, "declared module");
    }
    Ok((path, created))
}

/// `mod_rs` with `pub mod {module};` added after the last module declaration,
/// or `None` if it is already declared
fn declare_module(mod_rs: &str, module: &str) -> Option<String> {
    let declaration = format!("pub mod {module};");
    let lines: Vec<&str> = mod_rs.lines().collect();
    if lines.iter().any(|l| l.trim() == declaration) {
        return None;
    }
    let insert_at = lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("pub mod "))
        .map_or(lines.len(), |i| i + 1);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend(&lines[..insert_at]);
    out.push(&declaration);
    out.extend(&lines[insert_at..]);
    Some(out.join("\n") + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn next_day_after_latest() {
        assert_eq!(next_day(std::iter::empty()).unwrap(), 1);
        assert_eq!(next_day([3, 1, 2]).unwrap(), 4);
        assert!(next_day([25]).is_err());
    }

    #[test]
    fn template_is_filled_in() {
        let source = render_template(2023, 25);
        assert!(source.contains("#[aoc(year = 2023, day = 25, tags = [])]"));
        assert!(!source.contains("__"));
    }

    #[test]
    fn module_declared_after_the_others() {
        let mod_rs = "//! Days\n\npub mod day_1;\npub mod day_2;\n\n#[cfg(test)]\nfn helper() {}\n";
        let updated = declare_module(mod_rs, "day_3").unwrap();
        assert_eq!(
            updated,
            "//! Days\n\npub mod day_1;\npub mod day_2;\npub mod day_3;\n\n#[cfg(test)]\nfn helper() {}\n"
        );
        assert_eq!(declare_module(&updated, "day_3"), None);
        assert_eq!(declare_module("", "day_1").as_deref(), Some("pub mod day_1;\n"));
    }

    #[test]
    fn scaffolding_keeps_existing_solvers() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("solutions");

        let (path, created) = scaffold_day(&dir, 2023, 5).unwrap();
        assert!(created);
        assert_eq!(path, dir.join("day_5.rs"));
        assert_eq!(fs::read_to_string(dir.join("mod.rs")).unwrap(), "pub mod day_5;\n");

        fs::write(&path, "// edited").unwrap();
        let (_, created) = scaffold_day(&dir, 2023, 5).unwrap();
        assert!(!created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "// edited");
        assert_eq!(fs::read_to_string(dir.join("mod.rs")).unwrap(), "pub mod day_5;\n");
    }
}
