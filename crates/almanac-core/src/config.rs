use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::datetime::today_in_timezone;
use crate::filter::TimeWindow;
use crate::store::STORAGE_KEY;
use crate::task::{
  Category,
  DEFAULT_TASK_COLOR,
  Task
};

pub const DEFAULT_TIMEZONE: &str = "UTC";

fn default_version() -> u32 {
  1
}

fn default_storage_key() -> String {
  STORAGE_KEY.to_string()
}

fn default_true() -> bool {
  true
}

fn default_window_weeks() -> Vec<u32> {
  vec![1, 2, 3]
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct AlmanacConfig {
  #[serde(default = "default_version")]
  pub version:         u32,
  #[serde(default)]
  pub timezone:        Option<String>,
  #[serde(
    default = "default_storage_key"
  )]
  pub storage_key:     String,
  #[serde(default = "default_true")]
  pub seed_demo_tasks: bool,
  #[serde(default)]
  pub colors:          ColorConfig,
  #[serde(default)]
  pub filters:         FilterConfig
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct ColorConfig {
  pub default:  Option<String>,
  pub work:     Option<String>,
  pub personal: Option<String>,
  pub reminder: Option<String>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct FilterConfig {
  #[serde(
    default = "default_window_weeks"
  )]
  pub window_weeks: Vec<u32>
}

impl Default for FilterConfig {
  fn default() -> Self {
    Self {
      window_weeks: default_window_weeks()
    }
  }
}

impl Default for AlmanacConfig {
  fn default() -> Self {
    Self {
      version:         default_version(),
      timezone:        None,
      storage_key:     default_storage_key(),
      seed_demo_tasks: true,
      colors:          ColorConfig::default(),
      filters:         FilterConfig::default()
    }
  }
}

impl AlmanacConfig {
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<AlmanacConfig>(raw)
        .context(
          "failed to parse almanac config"
        )?;
    config.sanitize();
    Ok(config)
  }

  /// Parses `raw`, falling back to the
  /// defaults when it is malformed.
  pub fn from_toml_or_default(
    raw: &str
  ) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(config) => {
        info!(
          version = config.version,
          timezone = ?config.timezone,
          storage_key = %config.storage_key,
          "loaded almanac config"
        );
        config
      }
      | Err(error) => {
        error!(error = %format!("{error:#}"), "failed parsing almanac config; using defaults");
        Self::default()
      }
    }
  }

  #[tracing::instrument]
  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    Self::from_toml_str(&text).with_context(
      || {
        format!(
          "invalid config in {}",
          path.display()
        )
      }
    )
  }

  fn sanitize(&mut self) {
    if self.storage_key.trim().is_empty()
    {
      self.storage_key =
        default_storage_key();
    }

    for slot in [
      &mut self.colors.default,
      &mut self.colors.work,
      &mut self.colors.personal,
      &mut self.colors.reminder
    ] {
      if slot
        .as_deref()
        .is_some_and(|color| {
          !is_hex_color(color)
        })
      {
        warn!(color = ?slot, "ignoring invalid color");
        *slot = None;
      }
    }

    self
      .filters
      .window_weeks
      .retain(|weeks| *weeks > 0);
    self.filters.window_weeks.sort_unstable();
    self.filters.window_weeks.dedup();
    if self.filters.window_weeks.is_empty()
    {
      self.filters.window_weeks =
        default_window_weeks();
    }

    if let Some(raw) =
      self.timezone.as_deref()
      && parse_timezone(raw).is_none()
    {
      self.timezone = None;
    }
  }

  pub fn timezone(&self) -> Tz {
    self
      .timezone
      .as_deref()
      .and_then(parse_timezone)
      .or_else(|| {
        parse_timezone(DEFAULT_TIMEZONE)
      })
      .unwrap_or(chrono_tz::UTC)
  }

  pub fn today(&self) -> NaiveDate {
    today_in_timezone(self.timezone())
  }

  /// Windows offered by filter controls,
  /// starting with "all tasks".
  pub fn time_windows(
    &self
  ) -> Vec<TimeWindow> {
    std::iter::once(TimeWindow::All)
      .chain(
        self
          .filters
          .window_weeks
          .iter()
          .map(|weeks| {
            TimeWindow::Weeks(*weeks)
          })
      )
      .collect()
  }

  pub fn category_color(
    &self,
    category: Category
  ) -> String {
    let configured = match category {
      | Category::Work => &self.colors.work,
      | Category::Personal => {
        &self.colors.personal
      }
      | Category::Reminder => {
        &self.colors.reminder
      }
    };
    configured.clone().unwrap_or_else(
      || category.default_color().to_string()
    )
  }

  /// Explicit task color, then category
  /// color, then the fallback. Task colors
  /// that are not `#rgb`/`#rrggbb` are
  /// ignored.
  pub fn color_for(
    &self,
    task: &Task
  ) -> String {
    if let Some(color) = task.color.as_deref()
    {
      let color = color.trim();
      if is_hex_color(color) {
        return color.to_string();
      }
      if !color.is_empty() {
        warn!(task = %task.id, color, "ignoring invalid task color");
      }
    }
    match task.category {
      | Some(category) => {
        self.category_color(category)
      }
      | None => self
        .colors
        .default
        .clone()
        .unwrap_or_else(|| {
          DEFAULT_TASK_COLOR.to_string()
        })
    }
  }
}

fn parse_timezone(raw: &str) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      debug!(timezone = %tz, "resolved timezone");
      Some(tz)
    }
    | Err(error) => {
      error!(
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}

fn is_hex_color(raw: &str) -> bool {
  let Some(hex) = raw.strip_prefix('#')
  else {
    return false;
  };
  matches!(hex.len(), 3 | 6)
    && hex
      .chars()
      .all(|ch| ch.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::AlmanacConfig;
  use crate::filter::TimeWindow;
  use crate::store::STORAGE_KEY;
  use crate::task::{
    Category,
    Task
  };

  #[test]
  fn sanitizes_bad_values() {
    let config = AlmanacConfig::from_toml_str(
      r##"
        storage_key = "  "
        timezone = "Mars/Olympus"

        [colors]
        work = "pink"
        personal = "#123456"

        [filters]
        window_weeks = [0, 2, 2, 1]
      "##
    )
    .expect("parse config");

    assert_eq!(config.storage_key, STORAGE_KEY);
    assert_eq!(config.timezone, None);
    assert_eq!(config.colors.work, None);
    assert_eq!(
      config.time_windows(),
      vec![
        TimeWindow::All,
        TimeWindow::Weeks(1),
        TimeWindow::Weeks(2)
      ]
    );
    assert_eq!(
      config.category_color(Category::Personal),
      "#123456"
    );
    assert_eq!(
      config.category_color(Category::Work),
      "#e91e63"
    );
  }

  #[test]
  fn malformed_toml_falls_back() {
    let config =
      AlmanacConfig::from_toml_or_default("version = [");
    assert_eq!(config, AlmanacConfig::default());
  }

  #[test]
  fn task_color_precedence() {
    let config = AlmanacConfig::from_toml_str(
      "[colors]\ndefault = \"#abc\"\n"
    )
    .expect("parse config");
    let day = NaiveDate::from_ymd_opt(2026, 10, 17)
      .expect("valid date");
    let task = Task::new("x", day, day)
      .expect("valid task");

    assert_eq!(config.color_for(&task), "#abc");
    let task = task.with_color("#000");
    assert_eq!(config.color_for(&task), "#000");
  }

  #[test]
  fn invalid_task_colors_fall_back() {
    let config = AlmanacConfig::default();
    let day = NaiveDate::from_ymd_opt(2026, 10, 17)
      .expect("valid date");
    let task = Task::new("x", day, day)
      .expect("valid task")
      .with_category(Some(Category::Reminder));

    for bad in [
      "red; background-image: url(x)",
      "#12345g",
      "#1234"
    ] {
      let painted = task.clone().with_color(bad);
      assert_eq!(config.color_for(&painted), "#ff9800");
    }

    let plain = Task::new("y", day, day)
      .expect("valid task")
      .with_color("javascript:1");
    assert_eq!(config.color_for(&plain), "#3b82f6");
  }

  #[test]
  fn known_timezone_is_kept() {
    let config = AlmanacConfig::from_toml_str(
      "timezone = \"America/Chicago\"\n"
    )
    .expect("parse config");
    assert_eq!(
      config.timezone(),
      chrono_tz::America::Chicago
    );
  }
}
