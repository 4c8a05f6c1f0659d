use crate::grid::{
  GRID_COLUMNS,
  GRID_ROWS,
  MonthGrid
};
use crate::task::{
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
pub struct Segment {
  pub task_id:          TaskId,
  pub row:              usize,
  pub start_col:        usize,
  pub end_col:          usize,
  pub continues_before: bool,
  pub continues_after:  bool
}

impl Segment {
  pub fn span(&self) -> usize {
    self.end_col - self.start_col + 1
  }

  pub fn overlaps(
    &self,
    other: &Segment
  ) -> bool {
    self.row == other.row
      && self.start_col <= other.end_col
      && other.start_col <= self.end_col
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub struct PlacedBar {
  pub segment: Segment,
  pub lane:    usize
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct MonthLayout {
  pub bars:       Vec<PlacedBar>,
  pub lane_count: [usize; GRID_ROWS]
}

impl MonthLayout {
  pub fn row_bars(
    &self,
    row: usize
  ) -> impl Iterator<Item = &PlacedBar>
  {
    self
      .bars
      .iter()
      .filter(move |bar| {
        bar.segment.row == row
      })
  }
}

/// Splits a task into one segment per
/// grid row it crosses. Tasks with an
/// endpoint outside the grid produce no
/// segments.
pub fn task_segments(
  grid: &MonthGrid,
  task: &Task
) -> Vec<Segment> {
  let (Some(first), Some(last)) = (
    grid.index_of(task.start),
    grid.index_of(task.end)
  ) else {
    return Vec::new();
  };
  if last < first {
    return Vec::new();
  }

  let mut segments = Vec::new();
  let mut index = first;
  while index <= last {
    let row = index / GRID_COLUMNS;
    let row_end =
      row * GRID_COLUMNS + GRID_COLUMNS
        - 1;
    let seg_end = last.min(row_end);
    segments.push(Segment {
      task_id: task.id,
      row,
      start_col: index % GRID_COLUMNS,
      end_col: seg_end % GRID_COLUMNS,
      continues_before: index > first,
      continues_after: seg_end < last
    });
    index = seg_end + 1;
  }

  segments
}

/// First-fit lane assignment for the
/// segments of a single row. Returns one
/// lane per input segment, in input
/// order.
pub fn assign_lanes(
  segments: &[Segment]
) -> Vec<usize> {
  let mut order =
    (0..segments.len()).collect::<Vec<_>>();
  order.sort_by_key(|&idx| {
    segments[idx].start_col
  });

  let mut lane_ends: Vec<usize> =
    Vec::new();
  let mut lanes =
    vec![0_usize; segments.len()];

  for idx in order {
    let segment = &segments[idx];
    let free = lane_ends
      .iter()
      .position(|&rightmost| {
        rightmost < segment.start_col
      });
    let lane = match free {
      | Some(lane) => {
        lane_ends[lane] = segment.end_col;
        lane
      }
      | None => {
        lane_ends.push(segment.end_col);
        lane_ends.len() - 1
      }
    };
    lanes[idx] = lane;
  }

  lanes
}

/// Maps every task onto the grid and
/// packs each row into lanes.
pub fn layout_month(
  grid: &MonthGrid,
  tasks: &[Task]
) -> MonthLayout {
  let mut per_row: Vec<Vec<Segment>> =
    vec![Vec::new(); GRID_ROWS];
  for task in tasks {
    for segment in
      task_segments(grid, task)
    {
      per_row[segment.row].push(segment);
    }
  }

  let mut layout = MonthLayout::default();
  for (row, segments) in
    per_row.into_iter().enumerate()
  {
    let lanes = assign_lanes(&segments);
    layout.lane_count[row] = lanes
      .iter()
      .max()
      .map(|max| max + 1)
      .unwrap_or(0);
    layout.bars.extend(
      segments
        .into_iter()
        .zip(lanes)
        .map(|(segment, lane)| {
          PlacedBar {
            segment,
            lane
          }
        })
    );
  }

  tracing::trace!(
    tasks = tasks.len(),
    bars = layout.bars.len(),
    "laid out month"
  );
  layout
}
