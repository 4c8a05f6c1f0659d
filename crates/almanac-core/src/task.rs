use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

use crate::datetime::date_serde;

pub type TaskId = Uuid;

pub const DEFAULT_TASK_COLOR: &str =
  "#3b82f6";

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Work,
  Personal,
  Reminder
}

impl Category {
  pub const ALL: [Category; 3] = [
    Category::Work,
    Category::Personal,
    Category::Reminder
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Category::Work => "work",
      | Category::Personal => "personal",
      | Category::Reminder => "reminder"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Category::Work => "Work",
      | Category::Personal => "Personal",
      | Category::Reminder => "Reminder"
    }
  }

  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "work" => Some(Category::Work),
      | "personal" => {
        Some(Category::Personal)
      }
      | "reminder" => {
        Some(Category::Reminder)
      }
      | _ => None
    }
  }

  pub fn default_color(
    self
  ) -> &'static str {
    match self {
      | Category::Work => "#e91e63",
      | Category::Personal => "#4caf50",
      | Category::Reminder => "#ff9800"
    }
  }
}

impl std::str::FromStr for Category {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Category::from_key(s).ok_or_else(
      || {
        anyhow::anyhow!(
          "unknown category '{s}' \
           (expected work, personal \
           or reminder)"
        )
      }
    )
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum Edge {
  Start,
  End
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Task {
  pub id:          TaskId,
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(with = "date_serde")]
  pub start:       NaiveDate,
  #[serde(with = "date_serde")]
  pub end:         NaiveDate,
  #[serde(default = "default_all_day")]
  pub all_day:     bool,
  #[serde(default)]
  pub category:    Option<Category>,
  #[serde(default)]
  pub color:       Option<String>
}

fn default_all_day() -> bool {
  true
}

impl Task {
  pub fn new(
    title: impl Into<String>,
    start: NaiveDate,
    end: NaiveDate
  ) -> anyhow::Result<Self> {
    if end < start {
      anyhow::bail!(
        "task end {end} precedes start \
         {start}"
      );
    }

    Ok(Self {
      id: Uuid::new_v4(),
      title: title.into(),
      description: None,
      start,
      end,
      all_day: true,
      category: None,
      color: None
    })
  }

  pub fn with_category(
    mut self,
    category: Option<Category>
  ) -> Self {
    self.category = category;
    self
  }

  pub fn with_color(
    mut self,
    color: impl Into<String>
  ) -> Self {
    self.color = Some(color.into());
    self
  }

  pub fn is_valid(&self) -> bool {
    self.end >= self.start
  }

  /// Moves one edge to `date`. The
  /// moved edge never crosses the
  /// other one.
  pub fn move_edge(
    &mut self,
    edge: Edge,
    date: NaiveDate
  ) {
    match edge {
      | Edge::Start => {
        self.start = date.min(self.end);
      }
      | Edge::End => {
        self.end = date.max(self.start);
      }
    }
  }
}
