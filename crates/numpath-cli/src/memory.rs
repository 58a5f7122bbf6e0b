//! State kept between runs so consecutive mazes open differently.

use numpath_core::{BuiltMaze, PathPrefix};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What the CLI remembers between invocations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMemory {
    /// Opening of the most recently built maze
    pub last_prefix: Option<PathPrefix>,
    /// Number of mazes built with this state file
    pub mazes_built: u64,
    /// Number of those that used the straight-line fallback
    pub fallbacks: u64,
}

impl SessionMemory {
    /// Default state file location
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("numpath_state.json")
    }

    /// Load state from `path`; a missing or unreadable file starts fresh
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save state to `path`
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)
    }

    /// Remember a freshly built maze
    pub fn record(&mut self, built: &BuiltMaze) {
        self.last_prefix = Some(built.prefix.clone());
        self.mazes_built += 1;
        if built.maze.origin == numpath_core::MazeOrigin::Fallback {
            self.fallbacks += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numpath_core::{build_maze, ArithmeticQuestions, Grade, Operation, SimpleRng};

    fn scratch_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "numpath-test-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join("state.json")
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let path = scratch_file("missing");
        assert_eq!(SessionMemory::load(&path), SessionMemory::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_file("roundtrip");
        let mut rng = SimpleRng::with_seed(4);
        let built = build_maze(
            Grade::default(),
            Operation::Mixed,
            None,
            &mut rng,
            &mut ArithmeticQuestions,
        );

        let mut memory = SessionMemory::default();
        memory.record(&built);
        memory.save(&path).unwrap();

        let loaded = SessionMemory::load(&path);
        assert_eq!(loaded.last_prefix, Some(built.prefix));
        assert_eq!(loaded.mazes_built, 1);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let path = scratch_file("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(SessionMemory::load(&path), SessionMemory::default());
    }
}
