//! The 6×7 month grid shown by every
//! surface.

use chrono::{
  Datelike,
  NaiveDate,
  Weekday
};

use crate::datetime::{
  add_days,
  first_day_of_month,
  start_of_week
};

pub const GRID_COLUMNS: usize = 7;
pub const GRID_ROWS: usize = 6;
pub const GRID_CELLS: usize =
  GRID_COLUMNS * GRID_ROWS;
pub const WEEK_START: Weekday =
  Weekday::Sun;

pub const WEEKDAY_LABELS: [&str;
  GRID_COLUMNS] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat"
];

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub struct GridCell {
  pub date:     NaiveDate,
  pub in_month: bool,
  pub is_today: bool
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub struct MonthGrid {
  year:  i32,
  month: u32,
  cells: Vec<GridCell>
}

impl MonthGrid {
  /// Builds the grid for the month
  /// containing `reference`. The first
  /// cell is the Sunday on or before the
  /// 1st, and the grid always holds
  /// exactly six full weeks.
  pub fn build(
    reference: NaiveDate,
    today: NaiveDate
  ) -> Self {
    let year = reference.year();
    let month = reference.month();
    let first =
      first_day_of_month(year, month);
    let grid_start =
      start_of_week(first, WEEK_START);

    let cells = (0..GRID_CELLS as i64)
      .map(|offset| {
        let date =
          add_days(grid_start, offset);
        GridCell {
          date,
          in_month: date.year() == year
            && date.month() == month,
          is_today: date == today
        }
      })
      .collect::<Vec<_>>();

    tracing::trace!(
      year,
      month,
      first = %grid_start,
      "built month grid"
    );

    Self {
      year,
      month,
      cells
    }
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn month(&self) -> u32 {
    self.month
  }

  pub fn cells(&self) -> &[GridCell] {
    &self.cells
  }

  pub fn rows(
    &self
  ) -> impl Iterator<Item = &[GridCell]>
  {
    self.cells.chunks(GRID_COLUMNS)
  }

  pub fn first_date(&self) -> NaiveDate {
    self.cells[0].date
  }

  pub fn last_date(&self) -> NaiveDate {
    self.cells[GRID_CELLS - 1].date
  }

  pub fn contains(
    &self,
    date: NaiveDate
  ) -> bool {
    self.index_of(date).is_some()
  }

  pub fn index_of(
    &self,
    date: NaiveDate
  ) -> Option<usize> {
    let offset = (date
      - self.first_date())
    .num_days();
    if offset < 0
      || offset >= GRID_CELLS as i64
    {
      return None;
    }
    Some(offset as usize)
  }

  pub fn date_at(
    &self,
    index: usize
  ) -> Option<NaiveDate> {
    self
      .cells
      .get(index)
      .map(|cell| cell.date)
  }

  pub fn date_at_cell(
    &self,
    row: usize,
    column: usize
  ) -> Option<NaiveDate> {
    if row >= GRID_ROWS
      || column >= GRID_COLUMNS
    {
      return None;
    }
    self.date_at(
      row * GRID_COLUMNS + column
    )
  }

  pub fn title(&self) -> String {
    first_day_of_month(
      self.year, self.month
    )
    .format("%B %Y")
    .to_string()
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    Datelike,
    NaiveDate,
    Weekday
  };

  use super::{
    GRID_CELLS,
    MonthGrid
  };
  use crate::datetime::{
    add_days,
    last_day_of_month
  };

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn every_month_yields_six_full_weeks()
  {
    let today = ymd(2026, 10, 17);
    for year in [2024, 2025, 2026, 2027] {
      for month in 1..=12 {
        let reference =
          ymd(year, month, 15);
        let grid =
          MonthGrid::build(reference, today);
        let cells = grid.cells();

        assert_eq!(cells.len(), GRID_CELLS);
        assert_eq!(
          grid.first_date().weekday(),
          Weekday::Sun
        );
        assert_eq!(
          grid.last_date().weekday(),
          Weekday::Sat
        );
        for pair in cells.windows(2) {
          assert_eq!(
            add_days(pair[0].date, 1),
            pair[1].date
          );
        }
        assert!(
          grid.contains(ymd(year, month, 1))
        );
        assert!(grid.contains(
          last_day_of_month(year, month)
        ));
      }
    }
  }

  #[test]
  fn february_grid_starts_in_january() {
    // 2026-02-01 is a Sunday, 2027-02-01
    // is a Monday
    let today = ymd(2026, 10, 17);
    let grid = MonthGrid::build(
      ymd(2027, 2, 20),
      today
    );
    assert_eq!(
      grid.first_date(),
      ymd(2027, 1, 31)
    );

    let grid = MonthGrid::build(
      ymd(2026, 2, 20),
      today
    );
    assert_eq!(
      grid.first_date(),
      ymd(2026, 2, 1)
    );
  }

  #[test]
  fn year_boundary_and_flags() {
    let today = ymd(2027, 1, 1);
    let grid = MonthGrid::build(
      ymd(2027, 1, 9),
      today
    );
    assert_eq!(
      grid.first_date(),
      ymd(2026, 12, 27)
    );

    let first = grid.cells()[0];
    assert!(!first.in_month);
    let new_year = grid.cells()[grid
      .index_of(today)
      .expect("today in grid")];
    assert!(new_year.in_month);
    assert!(new_year.is_today);
    assert_eq!(
      grid
        .cells()
        .iter()
        .filter(|cell| cell.is_today)
        .count(),
      1
    );
  }

  #[test]
  fn lookups_by_row_and_index() {
    let grid = MonthGrid::build(
      ymd(2026, 10, 1),
      ymd(2026, 10, 17)
    );
    assert_eq!(
      grid.date_at_cell(0, 0),
      Some(ymd(2026, 9, 27))
    );
    assert_eq!(
      grid.date_at_cell(2, 6),
      Some(ymd(2026, 10, 17))
    );
    assert_eq!(grid.date_at_cell(6, 0), None);
    assert_eq!(
      grid.index_of(ymd(2026, 9, 26)),
      None
    );
    assert_eq!(grid.rows().count(), 6);
    assert_eq!(grid.title(), "October 2026");
  }
}
