//! Pointer gesture interpretation over
//! the month grid.
//!
//! One gesture is tracked at a time:
//! down starts it, moves update it and
//! up finishes it. Clicks arrive after
//! the up event and are swallowed when
//! the up ended a drag.

use chrono::NaiveDate;
use tracing::{
  debug,
  trace
};

use crate::grid::{
  GRID_COLUMNS,
  GRID_ROWS,
  MonthGrid
};
use crate::task::{
  Edge,
  Task,
  TaskId
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum PointerButton {
  Primary,
  Other
}

impl PointerButton {
  /// Maps a DOM `MouseEvent.button`
  /// value.
  pub fn from_dom(button: i16) -> Self {
    if button == 0 {
      PointerButton::Primary
    } else {
      PointerButton::Other
    }
  }
}

/// Screen-space bounds of the grid.
/// Rows may have different heights
/// because each row grows with its lane
/// count.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
  left:  f64,
  width: f64,
  rows:  Vec<(f64, f64)>
}

impl GridGeometry {
  pub fn uniform(
    left: f64,
    top: f64,
    width: f64,
    height: f64
  ) -> Self {
    let row_height =
      height / GRID_ROWS as f64;
    let rows = (0..GRID_ROWS)
      .map(|row| {
        let row_top =
          top + row as f64 * row_height;
        (row_top, row_top + row_height)
      })
      .collect();
    Self {
      left,
      width,
      rows
    }
  }

  /// Builds geometry from measured
  /// `(top, bottom)` bounds, one pair
  /// per grid row.
  pub fn from_row_bounds(
    left: f64,
    width: f64,
    rows: Vec<(f64, f64)>
  ) -> Self {
    Self {
      left,
      width,
      rows
    }
  }

  pub fn cell_at(
    &self,
    x: f64,
    y: f64
  ) -> Option<(usize, usize)> {
    if self.width <= 0.0
      || x < self.left
      || x >= self.left + self.width
    {
      return None;
    }

    let column = ((x - self.left)
      / (self.width
        / GRID_COLUMNS as f64))
      .floor() as usize;
    let row = self.rows.iter().position(
      |&(top, bottom)| {
        y >= top && y < bottom
      }
    )?;

    Some((
      row,
      column.min(GRID_COLUMNS - 1)
    ))
  }

  pub fn date_at(
    &self,
    grid: &MonthGrid,
    x: f64,
    y: f64
  ) -> Option<NaiveDate> {
    let (row, column) =
      self.cell_at(x, y)?;
    grid.date_at_cell(row, column)
  }
}

/// Where a pointer-down landed on a task
/// bar, in bar-local pixels.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
)]
pub struct BarHit {
  pub task_id:   TaskId,
  pub offset_x:  f64,
  pub bar_width: f64
}

impl BarHit {
  pub fn edge(&self) -> Edge {
    if self.offset_x < self.bar_width / 2.0
    {
      Edge::Start
    } else {
      Edge::End
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
)]
pub struct PointerPress {
  pub x:      f64,
  pub y:      f64,
  pub button: PointerButton,
  pub bar:    Option<BarHit>
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
)]
pub enum ClickTarget {
  Bar(TaskId),
  Point { x: f64, y: f64 }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum GestureState {
  Idle,
  Selecting {
    anchor:  NaiveDate,
    current: NaiveDate,
    moved:   bool
  },
  Resizing {
    task_id: TaskId,
    edge:    Edge,
    current: NaiveDate,
    moved:   bool
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum GestureOutcome {
  Nothing,
  ProposeRange {
    start: NaiveDate,
    end:   NaiveDate
  },
  EditTask(TaskId),
  Resized(TaskId)
}

/// A new range may only start today or
/// later.
pub fn creation_allowed(
  start: NaiveDate,
  today: NaiveDate
) -> bool {
  start >= today
}

fn ordered(
  a: NaiveDate,
  b: NaiveDate
) -> (NaiveDate, NaiveDate) {
  if a <= b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone)]
pub struct GestureMachine {
  state:          GestureState,
  suppress_click: bool
}

impl Default for GestureMachine {
  fn default() -> Self {
    Self::new()
  }
}

impl GestureMachine {
  pub fn new() -> Self {
    Self {
      state:          GestureState::Idle,
      suppress_click: false
    }
  }

  pub fn state(&self) -> GestureState {
    self.state
  }

  pub fn is_active(&self) -> bool {
    self.state != GestureState::Idle
  }

  /// Normalised range of an in-flight
  /// selection, for highlighting.
  pub fn selection(
    &self
  ) -> Option<(NaiveDate, NaiveDate)> {
    match self.state {
      | GestureState::Selecting {
        anchor,
        current,
        ..
      } => Some(ordered(anchor, current)),
      | _ => None
    }
  }

  pub fn resizing_task(
    &self
  ) -> Option<TaskId> {
    match self.state {
      | GestureState::Resizing {
        task_id,
        ..
      } => Some(task_id),
      | _ => None
    }
  }

  /// Starts a gesture. Returns `false`
  /// when the press is ignored.
  pub fn pointer_down(
    &mut self,
    grid: &MonthGrid,
    geometry: &GridGeometry,
    press: &PointerPress
  ) -> bool {
    if self.is_active()
      || press.button
        != PointerButton::Primary
    {
      trace!(
        state = ?self.state,
        button = ?press.button,
        "ignoring pointer down"
      );
      return false;
    }

    let Some(date) =
      geometry.date_at(grid, press.x, press.y)
    else {
      trace!(
        x = press.x,
        y = press.y,
        "pointer down outside grid"
      );
      return false;
    };

    // a fresh press means any earlier
    // suppression is stale
    self.suppress_click = false;

    self.state = match press.bar {
      | Some(hit) => {
        let edge = hit.edge();
        debug!(
          task = %hit.task_id,
          ?edge,
          %date,
          "resize started"
        );
        GestureState::Resizing {
          task_id: hit.task_id,
          edge,
          current: date,
          moved: false
        }
      }
      | None => {
        debug!(%date, "selection started");
        GestureState::Selecting {
          anchor:  date,
          current: date,
          moved:   false
        }
      }
    };
    true
  }

  /// Tracks the pointer. While resizing,
  /// returns the replacement task list
  /// whenever the dragged edge moved.
  pub fn pointer_move(
    &mut self,
    grid: &MonthGrid,
    geometry: &GridGeometry,
    x: f64,
    y: f64,
    tasks: &[Task]
  ) -> Option<Vec<Task>> {
    if !self.is_active() {
      return None;
    }
    let date =
      geometry.date_at(grid, x, y)?;

    match &mut self.state {
      | GestureState::Idle => None,
      | GestureState::Selecting {
        current,
        moved,
        ..
      } => {
        if *current != date {
          *current = date;
          *moved = true;
          trace!(%date, "selection moved");
        }
        None
      }
      | GestureState::Resizing {
        task_id,
        edge,
        current,
        moved
      } => {
        if *current == date {
          return None;
        }
        *current = date;
        *moved = true;
        resize_task(
          tasks, *task_id, *edge, date
        )
      }
    }
  }

  /// Ends the gesture.
  pub fn pointer_up(
    &mut self,
    today: NaiveDate
  ) -> GestureOutcome {
    let state = std::mem::replace(
      &mut self.state,
      GestureState::Idle
    );

    match state {
      | GestureState::Idle => {
        GestureOutcome::Nothing
      }
      | GestureState::Selecting {
        moved: false,
        ..
      }
      | GestureState::Resizing {
        moved: false,
        ..
      } => {
        // no drag happened: the click
        // that follows decides
        GestureOutcome::Nothing
      }
      | GestureState::Selecting {
        anchor,
        current,
        moved: true
      } => {
        self.suppress_click = true;
        let (start, end) =
          ordered(anchor, current);
        if !creation_allowed(start, today)
        {
          debug!(
            %start,
            %today,
            "discarding selection in the past"
          );
          return GestureOutcome::Nothing;
        }
        debug!(%start, %end, "selection finished");
        GestureOutcome::ProposeRange {
          start,
          end
        }
      }
      | GestureState::Resizing {
        task_id,
        moved: true,
        ..
      } => {
        self.suppress_click = true;
        debug!(task = %task_id, "resize finished");
        GestureOutcome::Resized(task_id)
      }
    }
  }

  pub fn click(
    &mut self,
    grid: &MonthGrid,
    geometry: &GridGeometry,
    target: ClickTarget,
    today: NaiveDate
  ) -> GestureOutcome {
    if std::mem::take(
      &mut self.suppress_click
    ) {
      trace!("click after drag suppressed");
      return GestureOutcome::Nothing;
    }
    if self.is_active() {
      return GestureOutcome::Nothing;
    }

    match target {
      | ClickTarget::Bar(task_id) => {
        GestureOutcome::EditTask(task_id)
      }
      | ClickTarget::Point {
        x,
        y
      } => {
        let Some(date) =
          geometry.date_at(grid, x, y)
        else {
          return GestureOutcome::Nothing;
        };
        if !creation_allowed(date, today) {
          debug!(
            %date,
            "ignoring click on a past day"
          );
          return GestureOutcome::Nothing;
        }
        GestureOutcome::ProposeRange {
          start: date,
          end:   date
        }
      }
    }
  }
}

/// Copy-on-write edge move. `None` when
/// the task is gone or nothing changed.
pub fn resize_task(
  tasks: &[Task],
  task_id: TaskId,
  edge: Edge,
  date: NaiveDate
) -> Option<Vec<Task>> {
  let idx = tasks
    .iter()
    .position(|task| task.id == task_id)?;

  let mut updated = tasks[idx].clone();
  updated.move_edge(edge, date);
  if updated == tasks[idx] {
    return None;
  }

  trace!(
    task = %task_id,
    start = %updated.start,
    end = %updated.end,
    "resized task"
  );
  let mut next = tasks.to_vec();
  next[idx] = updated;
  Some(next)
}
