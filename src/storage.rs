use crate::display::storage_line;
use crate::parser::parse_storage_line;
use crate::types::{BotError, Task};
use crate::utils::{get_data_path, read_lossy_line};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Line-oriented persistence. Implementations know nothing about tasks.
pub trait Storage {
    /// All stored lines; a missing store reads as empty.
    fn load(&self) -> io::Result<Vec<String>>;

    /// Replaces the whole store with `lines`.
    fn save(&mut self, lines: &[String]) -> io::Result<()>;
}

pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    /// Storage at the conventional `~/.bingy/tasks.txt`.
    pub fn open_default() -> Result<Self, BotError> {
        Ok(FileStorage::new(get_data_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    /// Bytes that are not UTF-8 are replaced line by line, so one damaged
    /// line never hides the rest of the file.
    fn load(&self) -> io::Result<Vec<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        while let Some(line) = read_lossy_line(&mut reader)? {
            lines.push(line);
        }
        Ok(lines)
    }

    fn save(&mut self, lines: &[String]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut contents = String::new();
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        fs::write(&self.path, contents)
    }
}

/// Reads every line and keeps the ones that parse back into tasks.
pub fn load_tasks(storage: &impl Storage) -> io::Result<Vec<Task>> {
    let lines = storage.load()?;
    let total = lines.len();

    let tasks: Vec<Task> = lines
        .iter()
        .filter_map(|line| {
            let parsed = parse_storage_line(line);
            if parsed.is_none() {
                debug!(line = %line, "skipping malformed task line");
            }
            parsed
        })
        .collect();

    info!(loaded = tasks.len(), skipped = total - tasks.len(), "tasks loaded");
    Ok(tasks)
}

pub fn save_tasks(storage: &mut impl Storage, tasks: &[Task]) -> io::Result<()> {
    let lines: Vec<String> = tasks.iter().map(storage_line).collect();
    storage.save(&lines)?;
    debug!(count = lines.len(), "tasks saved");
    Ok(())
}
