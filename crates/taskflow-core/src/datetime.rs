use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Datelike,
  Duration,
  Local,
  NaiveDate,
  Utc,
  Weekday
};
use chrono_tz::Tz;
use regex::Regex;

const TIMEZONE_ENV_VAR: &str =
  "TASKFLOW_TIMEZONE";

/// Source of "today" for every
/// deadline classification.
///
/// Only calendar dates leave this type,
/// so the time of day can never shift a
/// task across the overdue/upcoming
/// boundary.
#[derive(Debug, Clone, Default)]
pub struct Clock {
  timezone:    Option<Tz>,
  fixed_today: Option<NaiveDate>
}

impl Clock {
  #[must_use]
  pub fn new(
    timezone: Option<Tz>
  ) -> Self {
    Self {
      timezone,
      fixed_today: None
    }
  }

  #[must_use]
  pub fn fixed(
    today: NaiveDate
  ) -> Self {
    Self {
      timezone:    None,
      fixed_today: Some(today)
    }
  }

  #[must_use]
  pub fn with_fixed_today(
    mut self,
    today: Option<NaiveDate>
  ) -> Self {
    self.fixed_today = today;
    self
  }

  pub fn today(&self) -> NaiveDate {
    if let Some(today) =
      self.fixed_today
    {
      return today;
    }

    let now = Utc::now();
    match self.timezone {
      | Some(tz) => {
        now.with_timezone(&tz).date_naive()
      }
      | None => {
        now
          .with_timezone(&Local)
          .date_naive()
      }
    }
  }

  pub fn timezone_label(
    &self
  ) -> String {
    self
      .timezone
      .map(|tz| tz.name().to_string())
      .unwrap_or_else(|| {
        "local".to_string()
      })
  }
}

/// Resolves the timezone used for
/// "today": the environment wins over
/// the config file, and anything
/// unparseable falls through to the
/// system local time.
#[tracing::instrument]
pub fn resolve_timezone(
  configured: Option<&str>
) -> Option<Tz> {
  if let Ok(raw) =
    std::env::var(TIMEZONE_ENV_VAR)
    && let Some(tz) = parse_timezone(
      &raw,
      TIMEZONE_ENV_VAR
    )
  {
    return Some(tz);
  }

  if let Some(raw) = configured
    && let Some(tz) =
      parse_timezone(raw, "config")
  {
    return Some(tz);
  }

  tracing::debug!(
    "no timezone configured; using \
     system local time"
  );
  None
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "configured timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[must_use]
pub fn format_date(
  date: NaiveDate
) -> String {
  date.format("%Y-%m-%d").to_string()
}

/// Parses a due-date expression into a
/// calendar date relative to `today`.
#[tracing::instrument(skip(today), fields(input = input))]
pub fn parse_due_date(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<NaiveDate> {
  let token = input.trim();
  if token.is_empty() {
    return Err(anyhow!(
      "due date is empty"
    ));
  }
  let lower =
    token.to_ascii_lowercase();

  match lower.as_str() {
    | "today" => return Ok(today),
    | "tomorrow" => {
      return shift_days(today, 1);
    }
    | "yesterday" => {
      return shift_days(today, -1);
    }
    | _ => {}
  }

  if let Some(target_weekday) =
    parse_weekday_name(&lower)
  {
    return Ok(next_weekday_date(
      today,
      target_weekday
    ));
  }

  if let Some(target_month) =
    parse_month_name(&lower)
  {
    let mut year = today.year();
    let this_year =
      NaiveDate::from_ymd_opt(
        year,
        target_month,
        1
      )
      .ok_or_else(|| {
        anyhow!(
          "invalid month value: \
           {target_month}"
        )
      })?;
    if this_year <= today {
      year = year.saturating_add(1);
    }
    return NaiveDate::from_ymd_opt(
      year,
      target_month,
      1
    )
    .ok_or_else(|| {
      anyhow!(
        "invalid month/year candidate"
      )
    });
  }

  let rel_re = Regex::new(
    r"^(?P<sign>[+-])(?P<num>\d+)(?P<unit>[dw])$"
  )
  .map_err(|e| {
    anyhow!(
      "internal regex compile \
       failure: {e}"
    )
  })?;

  if let Some(caps) =
    rel_re.captures(&lower)
  {
    let sign = caps
      .name("sign")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!("missing relative sign")
      })?;
    let num: i64 = caps
      .name("num")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!(
          "missing relative amount"
        )
      })?
      .parse()
      .context(
        "invalid relative number"
      )?;
    let days = match caps
      .name("unit")
      .map(|m| m.as_str())
    {
      | Some("d") => num,
      | Some("w") => {
        num.saturating_mul(7)
      }
      | other => {
        return Err(anyhow!(
          "unknown relative unit: \
           {other:?}"
        ));
      }
    };

    return shift_days(
      today,
      if sign == "-" {
        -days
      } else {
        days
      }
    );
  }

  for fmt in ["%Y-%m-%d", "%Y%m%d"] {
    if let Ok(date) =
      NaiveDate::parse_from_str(
        token, fmt
      )
    {
      return Ok(date);
    }
  }

  Err(anyhow!(
    "unrecognized due date: {input}"
  ))
  .with_context(|| {
    "supported formats: \
     today/tomorrow/yesterday, \
     weekday names (e.g. friday), \
     month names (e.g. march), \
     +Nd/-Nd/+Nw, YYYY-MM-DD, \
     YYYYMMDD"
  })
}

fn shift_days(
  from: NaiveDate,
  days: i64
) -> anyhow::Result<NaiveDate> {
  Duration::try_days(days)
    .and_then(|delta| {
      from.checked_add_signed(delta)
    })
    .ok_or_else(|| {
      anyhow!(
        "date offset out of range: \
         {days} days"
      )
    })
}

fn parse_weekday_name(
  token: &str
) -> Option<Weekday> {
  match token.trim() {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

fn next_weekday_date(
  from: NaiveDate,
  target: Weekday
) -> NaiveDate {
  let from_idx = from
    .weekday()
    .num_days_from_monday()
    as i64;
  let target_idx = target
    .num_days_from_monday()
    as i64;
  let mut delta =
    (7 + target_idx - from_idx) % 7;
  if delta == 0 {
    delta = 7;
  }
  from
    .checked_add_signed(Duration::days(
      delta
    ))
    .unwrap_or(from)
}

fn parse_month_name(
  token: &str
) -> Option<u32> {
  match token.trim() {
    | "january" | "jan" => Some(1),
    | "february" | "feb" => Some(2),
    | "march" | "mar" => Some(3),
    | "april" | "apr" => Some(4),
    | "may" => Some(5),
    | "june" | "jun" => Some(6),
    | "july" | "jul" => Some(7),
    | "august" | "aug" => Some(8),
    | "september" | "sep" | "sept" => {
      Some(9)
    }
    | "october" | "oct" => Some(10),
    | "november" | "nov" => Some(11),
    | "december" | "dec" => Some(12),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    Clock,
    parse_due_date
  };

  fn day(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn parses_iso_and_compact_dates() {
    let today = day(2024, 1, 11);
    assert_eq!(
      parse_due_date(
        "2024-02-01",
        today
      )
      .expect("iso date"),
      day(2024, 2, 1)
    );
    assert_eq!(
      parse_due_date("20240201", today)
        .expect("compact date"),
      day(2024, 2, 1)
    );
  }

  #[test]
  fn parses_relative_words() {
    let today = day(2024, 1, 11);
    assert_eq!(
      parse_due_date("Today", today)
        .expect("today"),
      today
    );
    assert_eq!(
      parse_due_date("tomorrow", today)
        .expect("tomorrow"),
      day(2024, 1, 12)
    );
    assert_eq!(
      parse_due_date("+2w", today)
        .expect("two weeks"),
      day(2024, 1, 25)
    );
    assert_eq!(
      parse_due_date("-3d", today)
        .expect("three days ago"),
      day(2024, 1, 8)
    );
  }

  #[test]
  fn parses_weekday_name_as_next_occurrence()
  {
    // 2024-01-11 is a Thursday.
    let today = day(2024, 1, 11);
    assert_eq!(
      parse_due_date("friday", today)
        .expect("friday"),
      day(2024, 1, 12)
    );
    assert_eq!(
      parse_due_date("thu", today)
        .expect("thursday"),
      day(2024, 1, 18)
    );
  }

  #[test]
  fn parses_month_name() {
    let today = day(2024, 3, 1);
    assert_eq!(
      parse_due_date("april", today)
        .expect("april"),
      day(2024, 4, 1)
    );
    assert_eq!(
      parse_due_date("march", today)
        .expect("march"),
      day(2025, 3, 1)
    );
  }

  #[test]
  fn rejects_garbage_and_empty() {
    let today = day(2024, 1, 11);
    assert!(
      parse_due_date("", today).is_err()
    );
    assert!(
      parse_due_date("soonish", today)
        .is_err()
    );
    assert!(
      parse_due_date(
        "2024-02-30",
        today
      )
      .is_err()
    );
  }

  #[test]
  fn rejects_offsets_past_the_calendar()
  {
    let today = day(2024, 1, 11);
    for input in [
      "+999999999999999d",
      "+99999999999999w",
      "-999999999999999d",
      "+99999999999999999999d"
    ] {
      assert!(
        parse_due_date(input, today)
          .is_err(),
        "{input} should be rejected"
      );
    }
  }

  #[test]
  fn fixed_clock_ignores_wall_time() {
    let clock =
      Clock::fixed(day(2024, 1, 11));
    assert_eq!(
      clock.today(),
      day(2024, 1, 11)
    );
  }
}
