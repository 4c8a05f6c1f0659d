use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::trace;

use crate::datetime::add_days;
use crate::task::{
  Category,
  Task
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum TimeWindow {
  #[default]
  All,
  Weeks(u32)
}

impl TimeWindow {
  pub fn as_key(self) -> String {
    match self {
      | TimeWindow::All => String::new(),
      | TimeWindow::Weeks(1) => {
        "1week".to_string()
      }
      | TimeWindow::Weeks(n) => {
        format!("{n}weeks")
      }
    }
  }

  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
      || trimmed == "all"
    {
      return Some(TimeWindow::All);
    }

    let digits = trimmed
      .strip_suffix("weeks")
      .or_else(|| {
        trimmed.strip_suffix("week")
      })?;
    match digits.parse::<u32>() {
      | Ok(0) | Err(_) => None,
      | Ok(n) => Some(TimeWindow::Weeks(n))
    }
  }

  pub fn label(self) -> String {
    match self {
      | TimeWindow::All => {
        "All tasks".to_string()
      }
      | TimeWindow::Weeks(1) => {
        "Tasks within 1 week".to_string()
      }
      | TimeWindow::Weeks(n) => {
        format!("Tasks within {n} weeks")
      }
    }
  }

  /// Inclusive `[today, today + N weeks]`
  /// bounds, or `None` for no window.
  pub fn bounds(
    self,
    today: NaiveDate
  ) -> Option<(NaiveDate, NaiveDate)> {
    match self {
      | TimeWindow::All => None,
      | TimeWindow::Weeks(n) => {
        Some((
          today,
          add_days(today, i64::from(n) * 7)
        ))
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct TaskFilter {
  pub search:     String,
  pub categories: BTreeSet<Category>,
  pub window:     TimeWindow
}

impl TaskFilter {
  pub fn is_empty(&self) -> bool {
    self.search.trim().is_empty()
      && self.categories.is_empty()
      && self.window == TimeWindow::All
  }

  pub fn toggle_category(
    &mut self,
    category: Category
  ) {
    if !self.categories.remove(&category)
    {
      self.categories.insert(category);
    }
  }

  pub fn matches(
    &self,
    task: &Task,
    today: NaiveDate
  ) -> bool {
    let query =
      self.search.trim().to_lowercase();
    if !query.is_empty()
      && !task
        .title
        .to_lowercase()
        .contains(&query)
    {
      return false;
    }

    if !self.categories.is_empty() {
      let Some(category) = task.category
      else {
        return false;
      };
      if !self.categories.contains(&category)
      {
        return false;
      }
    }

    if let Some((from, to)) =
      self.window.bounds(today)
    {
      let within = |date: NaiveDate| {
        from <= date && date <= to
      };
      if !within(task.start)
        && !within(task.end)
      {
        return false;
      }
    }

    true
  }

  pub fn apply(
    &self,
    tasks: &[Task],
    today: NaiveDate
  ) -> Vec<Task> {
    let visible = tasks
      .iter()
      .filter(|task| {
        self.matches(task, today)
      })
      .cloned()
      .collect::<Vec<_>>();
    trace!(
      total = tasks.len(),
      visible = visible.len(),
      "applied task filter"
    );
    visible
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    TaskFilter,
    TimeWindow
  };
  use crate::task::{
    Category,
    Task
  };

  fn ymd(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d)
      .expect("valid date")
  }

  fn sample() -> Vec<Task> {
    vec![
      Task::new("Alpha", ymd(20), ymd(20))
        .expect("valid task")
        .with_category(Some(Category::Work)),
      Task::new("Beta", ymd(21), ymd(21))
        .expect("valid task")
        .with_category(Some(
          Category::Personal
        )),
    ]
  }

  fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks
      .iter()
      .map(|task| task.title.as_str())
      .collect()
  }

  #[test]
  fn search_is_case_insensitive() {
    let filter = TaskFilter {
      search: "al".to_string(),
      ..TaskFilter::default()
    };
    assert_eq!(
      titles(&filter.apply(&sample(), ymd(1))),
      vec!["Alpha"]
    );
  }

  #[test]
  fn category_set_restricts() {
    let mut filter = TaskFilter::default();
    filter.toggle_category(Category::Personal);
    assert_eq!(
      titles(&filter.apply(&sample(), ymd(1))),
      vec!["Beta"]
    );

    filter.toggle_category(Category::Personal);
    assert!(filter.is_empty());
    assert_eq!(
      filter.apply(&sample(), ymd(1)).len(),
      2
    );
  }

  #[test]
  fn window_checks_either_endpoint() {
    let today = ymd(10);
    let filter = TaskFilter {
      window: TimeWindow::Weeks(1),
      ..TaskFilter::default()
    };

    let ends_inside =
      Task::new("a", ymd(1), ymd(12))
        .expect("valid task");
    let starts_inside =
      Task::new("b", ymd(17), ymd(30))
        .expect("valid task");
    let after =
      Task::new("c", ymd(18), ymd(19))
        .expect("valid task");
    let before =
      Task::new("d", ymd(1), ymd(9))
        .expect("valid task");

    assert!(filter.matches(&ends_inside, today));
    assert!(filter.matches(&starts_inside, today));
    assert!(!filter.matches(&after, today));
    assert!(!filter.matches(&before, today));
  }

  #[test]
  fn applying_twice_is_idempotent() {
    let filter = TaskFilter {
      search:     "a".to_string(),
      categories: [Category::Work]
        .into_iter()
        .collect(),
      window:     TimeWindow::Weeks(3)
    };
    let today = ymd(15);
    let once = filter.apply(&sample(), today);
    let twice = filter.apply(&once, today);
    assert_eq!(once, twice);
  }

  #[test]
  fn window_keys_round_trip_labels() {
    assert_eq!(
      TimeWindow::from_key("2weeks"),
      Some(TimeWindow::Weeks(2))
    );
    assert_eq!(
      TimeWindow::from_key("1week"),
      Some(TimeWindow::Weeks(1))
    );
    assert_eq!(
      TimeWindow::from_key(""),
      Some(TimeWindow::All)
    );
    assert_eq!(TimeWindow::from_key("0weeks"), None);
    assert_eq!(TimeWindow::Weeks(3).as_key(), "3weeks");
  }
}
