use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Utc,
  Weekday
};
use chrono_tz::Tz;

pub const DATE_FORMAT: &str =
  "%Y-%m-%d";

pub fn parse_date(
  raw: &str
) -> anyhow::Result<NaiveDate> {
  let trimmed = raw.trim();
  NaiveDate::parse_from_str(
    trimmed,
    DATE_FORMAT
  )
  .map_err(|err| {
    anyhow::anyhow!(
      "invalid date '{trimmed}' \
       (expected YYYY-MM-DD): {err}"
    )
  })
}

pub fn format_date(
  date: NaiveDate
) -> String {
  date.format(DATE_FORMAT).to_string()
}

pub fn today_in_timezone(
  timezone: Tz
) -> NaiveDate {
  Utc::now()
    .with_timezone(&timezone)
    .date_naive()
}

pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1)
    } else {
      (year, month + 1)
    };

  NaiveDate::from_ymd_opt(
    next_year, next_month, 1
  )
  .and_then(|date| date.pred_opt())
  .unwrap_or(NaiveDate::MAX)
}

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(
      Duration::days(days)
    )
    .unwrap_or(date)
}

pub fn start_of_week(
  date: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let offset = (7
    + date.weekday().num_days_from_monday()
    - week_start.num_days_from_monday())
    % 7;
  add_days(date, -(offset as i64))
}

pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

pub fn shift_years(
  date: NaiveDate,
  years: i32
) -> NaiveDate {
  let year =
    date.year().saturating_add(years);
  let month = date.month();
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    Weekday
  };

  use super::{
    last_day_of_month,
    parse_date,
    shift_months,
    shift_years,
    start_of_week
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
  fn month_shift_clamps_day() {
    assert_eq!(
      shift_months(ymd(2026, 1, 31), 1),
      ymd(2026, 2, 28)
    );
    assert_eq!(
      shift_months(ymd(2026, 1, 15), -1),
      ymd(2025, 12, 15)
    );
  }

  #[test]
  fn year_shift_handles_leap_day() {
    assert_eq!(
      shift_years(ymd(2028, 2, 29), 1),
      ymd(2029, 2, 28)
    );
  }

  #[test]
  fn last_day_handles_december() {
    assert_eq!(
      last_day_of_month(2026, 12),
      ymd(2026, 12, 31)
    );
    assert_eq!(
      last_day_of_month(2028, 2),
      ymd(2028, 2, 29)
    );
  }

  #[test]
  fn sunday_week_start() {
    // 2026-10-01 is a Thursday
    assert_eq!(
      start_of_week(
        ymd(2026, 10, 1),
        Weekday::Sun
      ),
      ymd(2026, 9, 27)
    );
    assert_eq!(
      start_of_week(
        ymd(2026, 9, 27),
        Weekday::Sun
      ),
      ymd(2026, 9, 27)
    );
  }

  #[test]
  fn rejects_malformed_dates() {
    assert!(parse_date("2026-13-01").is_err());
    assert_eq!(
      parse_date(" 2026-10-17 ")
        .expect("parse date"),
      ymd(2026, 10, 17)
    );
  }
}

pub mod date_serde {
  use chrono::NaiveDate;
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  use super::DATE_FORMAT;

  pub fn serialize<S>(
    date: &NaiveDate,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer.serialize_str(
      &date.format(DATE_FORMAT).to_string()
    )
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<NaiveDate, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw = String::deserialize(
      deserializer
    )?;
    NaiveDate::parse_from_str(
      raw.trim(),
      DATE_FORMAT
    )
    .map_err(serde::de::Error::custom)
  }
}
