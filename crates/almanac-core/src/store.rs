use std::collections::HashSet;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{
  debug,
  warn
};

use crate::datetime::add_days;
use crate::task::{
  Category,
  Task
};

pub const STORAGE_KEY: &str =
  "almanac.tasks.v1";

/// Owner of the task list. Every
/// mutation hands over a whole new list.
pub trait TaskStore {
  fn get_tasks(&self) -> &[Task];

  fn set_tasks(
    &mut self,
    tasks: Vec<Task>
  );
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tasks: Vec<Task>
}

impl MemoryStore {
  pub fn new(tasks: Vec<Task>) -> Self {
    Self {
      tasks
    }
  }
}

impl TaskStore for MemoryStore {
  fn get_tasks(&self) -> &[Task] {
    &self.tasks
  }

  fn set_tasks(
    &mut self,
    tasks: Vec<Task>
  ) {
    self.tasks = tasks;
  }
}

#[tracing::instrument(skip(tasks), fields(count = tasks.len()))]
pub fn encode_tasks(
  tasks: &[Task]
) -> anyhow::Result<String> {
  serde_json::to_string_pretty(tasks)
    .context("failed to serialize tasks")
}

/// Parses persisted tasks. Records that
/// do not parse, have `end < start` or
/// repeat an earlier id are dropped.
#[tracing::instrument(skip(raw))]
pub fn decode_tasks(
  raw: &str
) -> anyhow::Result<Vec<Task>> {
  if raw.trim().is_empty() {
    return Ok(Vec::new());
  }

  let records: Vec<serde_json::Value> =
    serde_json::from_str(raw).context(
      "stored tasks are not a JSON array"
    )?;

  let mut seen = HashSet::new();
  let mut tasks =
    Vec::with_capacity(records.len());
  for (idx, record) in
    records.into_iter().enumerate()
  {
    let task = match serde_json::from_value::<
      Task
    >(record)
    {
      | Ok(task) => task,
      | Err(error) => {
        warn!(
          index = idx,
          %error,
          "dropping unreadable task record"
        );
        continue;
      }
    };

    if !task.is_valid() {
      warn!(
        task = %task.id,
        start = %task.start,
        end = %task.end,
        "dropping task that ends before it starts"
      );
      continue;
    }
    if !seen.insert(task.id) {
      warn!(task = %task.id, "dropping duplicate task id");
      continue;
    }
    tasks.push(task);
  }

  debug!(count = tasks.len(), "decoded tasks");
  Ok(tasks)
}

/// Demo tasks offered to an empty store,
/// placed relative to `today`.
pub fn seed_tasks(
  today: NaiveDate
) -> Vec<Task> {
  let entries = [
    (
      "Project Kickoff",
      0_i64,
      0_i64,
      Category::Work
    ),
    (
      "Doctor Appointment",
      5,
      5,
      Category::Personal
    ),
    ("Conference", 8, 10, Category::Work),
    (
      "Renew passport",
      3,
      3,
      Category::Reminder
    )
  ];

  entries
    .into_iter()
    .filter_map(
      |(title, from, to, category)| {
        Task::new(
          title,
          add_days(today, from),
          add_days(today, to)
        )
        .ok()
        .map(|task| {
          task.with_category(Some(category))
        })
      }
    )
    .collect()
}
