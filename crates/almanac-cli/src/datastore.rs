use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use almanac_core::store::{TaskStore, decode_tasks, encode_tasks};
use almanac_core::task::{Task, TaskId};
use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const TASKS_FILE: &str = "tasks.json";

/// JSON-file backed task store. Changes are held in memory until
/// [`DataStore::commit`].
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub tasks_path: PathBuf,
    tasks: Vec<Task>,
    dirty: bool,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let tasks_path = data_dir.join(TASKS_FILE);
        let tasks = if tasks_path.exists() {
            let raw = fs::read_to_string(&tasks_path)
                .with_context(|| format!("failed reading {}", tasks_path.display()))?;
            decode_tasks(&raw)
                .with_context(|| format!("failed parsing {}", tasks_path.display()))?
        } else {
            Vec::new()
        };

        info!(
            data_dir = %data_dir.display(),
            tasks = %tasks_path.display(),
            count = tasks.len(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            tasks_path,
            tasks,
            dirty: false,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Resolves a full id or a unique id prefix.
    pub fn resolve_id(&self, raw: &str) -> anyhow::Result<TaskId> {
        let needle = raw.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(anyhow!("empty task id"));
        }

        let matches: Vec<TaskId> = self
            .tasks
            .iter()
            .map(|task| task.id)
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(anyhow!("task not found: {raw}")),
            _ => Err(anyhow!(
                "task id prefix '{raw}' is ambiguous ({} matches)",
                matches.len()
            )),
        }
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    #[tracing::instrument(skip(self), fields(count = self.tasks.len()))]
    pub fn commit(&mut self) -> anyhow::Result<()> {
        if !self.dirty {
            debug!("no task changes to write");
            return Ok(());
        }
        save_atomic(&self.tasks_path, &self.tasks)
            .with_context(|| format!("failed to save {}", self.tasks_path.display()))?;
        self.dirty = false;
        Ok(())
    }
}

impl TaskStore for DataStore {
    fn get_tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.dirty = true;
    }
}

#[tracing::instrument(skip(path, tasks))]
fn save_atomic(path: &Path, tasks: &[Task]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = tasks.len(), "saving tasks atomically");

    let payload = encode_tasks(tasks)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(payload.as_bytes())?;
    writeln!(temp)?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
