use chrono::NaiveDate;
use tracing::{
  debug,
  info
};

use crate::task::{
  Category,
  Task
};

/// What the edit form was opened for.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub enum EditRequest {
  Create {
    start: NaiveDate,
    end:   NaiveDate
  },
  Edit(Task)
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub enum EditOutcome {
  Submit {
    title:       String,
    description: Option<String>,
    category:    Option<Category>
  },
  Delete,
  Cancel
}

impl EditRequest {
  pub fn range(
    &self
  ) -> (NaiveDate, NaiveDate) {
    match self {
      | EditRequest::Create {
        start,
        end
      } => (*start, *end),
      | EditRequest::Edit(task) => {
        (task.start, task.end)
      }
    }
  }

  pub fn is_create(&self) -> bool {
    matches!(
      self,
      EditRequest::Create { .. }
    )
  }
}

fn clean_description(
  description: Option<String>
) -> Option<String> {
  description
    .map(|text| text.trim().to_string())
    .filter(|text| !text.is_empty())
}

/// Applies the form result and returns
/// the replacement task list.
pub fn apply_edit(
  tasks: &[Task],
  request: &EditRequest,
  outcome: EditOutcome
) -> anyhow::Result<Vec<Task>> {
  match (request, outcome) {
    | (_, EditOutcome::Cancel) => {
      debug!("edit cancelled");
      Ok(tasks.to_vec())
    }
    | (
      EditRequest::Create { .. },
      EditOutcome::Delete
    ) => Ok(tasks.to_vec()),
    | (
      EditRequest::Edit(task),
      EditOutcome::Delete
    ) => {
      let before = tasks.len();
      let next = tasks
        .iter()
        .filter(|t| t.id != task.id)
        .cloned()
        .collect::<Vec<_>>();
      if next.len() == before {
        anyhow::bail!(
          "task not found: {}",
          task.id
        );
      }
      info!(task = %task.id, "deleted task");
      Ok(next)
    }
    | (
      request,
      EditOutcome::Submit {
        title,
        description,
        category
      }
    ) => {
      let title = title.trim();
      if title.is_empty() {
        anyhow::bail!("title is required");
      }
      let description =
        clean_description(description);

      match request {
        | EditRequest::Create {
          start,
          end
        } => {
          let mut task =
            Task::new(title, *start, *end)?
              .with_category(category);
          task.description = description;
          info!(
            task = %task.id,
            start = %task.start,
            end = %task.end,
            "created task"
          );
          let mut next = tasks.to_vec();
          next.push(task);
          Ok(next)
        }
        | EditRequest::Edit(original) => {
          let idx = tasks
            .iter()
            .position(|t| t.id == original.id)
            .ok_or_else(|| {
              anyhow::anyhow!(
                "task not found: {}",
                original.id
              )
            })?;
          let mut next = tasks.to_vec();
          let task = &mut next[idx];
          task.title = title.to_string();
          task.description = description;
          task.category = category;
          info!(task = %task.id, "updated task");
          Ok(next)
        }
      }
    }
  }
}
