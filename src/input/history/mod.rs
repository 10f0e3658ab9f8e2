mod file_ops;

use std::path::PathBuf;

use self::file_ops::FileOps;

#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<std::io::Error> for HistoryError {
    fn from(e: std::io::Error) -> Self {
        HistoryError::Io(e)
    }
}

/// File-backed command history. Loaded once at startup and written
/// back on exit, keeping only the most recent `max_entries` lines.
pub struct HistoryStore {
    file_ops: FileOps,
    max_entries: usize,
}

impl HistoryStore {
    pub fn new(history_file: PathBuf, max_entries: usize) -> Self {
        HistoryStore {
            file_ops: FileOps::new(history_file),
            max_entries,
        }
    }

    /// A missing history file is not an error; it reads as empty.
    pub fn load(&self) -> Result<Vec<String>, HistoryError> {
        self.file_ops.load_lines()
    }

    pub fn save(&self, lines: &[String]) -> Result<(), HistoryError> {
        let start = lines.len().saturating_sub(self.max_entries);
        self.file_ops.save_lines(&lines[start..])
    }
}
